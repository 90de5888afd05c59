//! Property-based tests for ledger aggregation.

use proptest::prelude::*;

use crate::domain::{test_gens, test_prelude, SessionState};

proptest! {
    #![proptest_config(test_prelude::proptest_config())]

    /// Property: recomputing totals on unchanged history is idempotent.
    #[test]
    fn prop_totals_idempotent(state in test_gens::session()) {
        let first = state.compute_totals().expect("generated session is consistent");
        let second = state.compute_totals().expect("generated session is consistent");
        prop_assert_eq!(first, second);
    }

    /// Property: totals and net balances are both zero-sum.
    #[test]
    fn prop_balances_conserved(state in test_gens::session()) {
        prop_assert_eq!(state.compute_totals().expect("totals").sum(), 0);
        prop_assert_eq!(state.compute_net_balances().expect("net").sum(), 0);
        prop_assert!(state.settle_net_balances().is_ok());
    }

    /// Property: a serde round-trip yields the same balances.
    #[test]
    fn prop_serde_round_trip_preserves_balances(state in test_gens::session()) {
        let json = serde_json::to_string(&state).expect("serialize");
        let restored: SessionState = serde_json::from_str(&json).expect("deserialize");
        prop_assert_eq!(&restored, &state);
        prop_assert_eq!(
            restored.compute_net_balances().expect("restored net"),
            state.compute_net_balances().expect("original net")
        );
    }
}
