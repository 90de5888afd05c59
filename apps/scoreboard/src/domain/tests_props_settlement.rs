//! Property-based tests for the settlement reducer.

use proptest::prelude::*;

use crate::domain::{settle, test_gens, test_prelude};

proptest! {
    #![proptest_config(test_prelude::proptest_config())]

    /// Property: applying the emitted transactions clears every balance.
    #[test]
    fn prop_settlement_is_complete(balances in test_gens::zero_sum_balances()) {
        let txs = settle(&balances).expect("zero-sum balances settle");
        let mut after = balances.clone();
        for t in &txs {
            prop_assert!(t.amount > 0, "transaction amounts are positive: {:?}", t);
            prop_assert_ne!(t.from, t.to);
            *after.get_mut(&t.from).expect("payer present") += t.amount;
            *after.get_mut(&t.to).expect("payee present") -= t.amount;
        }
        prop_assert!(after.iter().all(|(_, v)| v == 0), "residual: {:?}", after);
    }

    /// Property: at most debtors + creditors - 1 transactions.
    #[test]
    fn prop_transaction_count_bound(balances in test_gens::zero_sum_balances()) {
        let debtors = balances.iter().filter(|(_, v)| *v < 0).count();
        let creditors = balances.iter().filter(|(_, v)| *v > 0).count();
        let txs = settle(&balances).expect("zero-sum balances settle");
        prop_assert!(txs.len() <= (debtors + creditors).saturating_sub(1));
    }

    /// Property: shifting any balance by a non-zero amount is refused.
    #[test]
    fn prop_unbalanced_is_refused(
        balances in test_gens::zero_sum_balances(),
        skew in prop_oneof![-50i64..=-1, 1i64..=50],
    ) {
        let mut skewed = balances.clone();
        *skewed.get_mut(&0).expect("key 0 exists") += skew;
        let err = settle(&skewed).expect_err("unbalanced input");
        prop_assert!(err.is_consistency());
    }
}
