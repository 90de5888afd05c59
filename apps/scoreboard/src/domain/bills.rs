//! Ad-hoc bills: money paid by one player on behalf of others.

use std::collections::{BTreeMap, HashSet};

use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::domain::players::ProfileId;
use crate::domain::round::Points;
use crate::errors::domain::{DomainError, ValidationKind};

/// One debtor's share of a bill. Amounts are in currency units.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Bill {
    pub debtor: ProfileId,
    pub payer: ProfileId,
    pub amount: Points,
}

/// Bills grouped by transaction id.
pub type BillTable = BTreeMap<String, Vec<Bill>>;

/// Fresh transaction id for a bill paid by `payer`.
pub fn new_transaction_id(payer: &str) -> String {
    format!("{payer}-{}", Uuid::new_v4())
}

/// Split `total` evenly across `debtors`, rounding each share half up.
///
/// The payer may be listed as a debtor; that entry marks the payer's own
/// share and is never charged.
pub fn split_bill(
    payer: &str,
    debtors: &[ProfileId],
    total: Points,
) -> Result<Vec<Bill>, DomainError> {
    if total < 0 {
        return Err(DomainError::validation(
            ValidationKind::NegativeAmount,
            format!("bill total is negative ({total})"),
        ));
    }
    if debtors.is_empty() {
        return Err(DomainError::validation(
            ValidationKind::EmptyBill,
            "a bill needs at least one debtor",
        ));
    }
    let n = debtors.len() as Points;
    let share = total.saturating_add(n / 2) / n;
    let bills: Vec<Bill> = debtors
        .iter()
        .map(|d| Bill {
            debtor: d.clone(),
            payer: payer.to_string(),
            amount: share,
        })
        .collect();
    check_bill_group(&bills)?;
    Ok(bills)
}

/// Shape rules for one transaction group: non-empty, single payer,
/// unique debtors, non-negative amounts, and a total that fits in
/// [`Points`].
pub fn check_bill_group(bills: &[Bill]) -> Result<(), DomainError> {
    let Some(first) = bills.first() else {
        return Err(DomainError::validation(
            ValidationKind::EmptyBill,
            "a bill needs at least one debtor",
        ));
    };
    let mut seen: HashSet<&str> = HashSet::with_capacity(bills.len());
    let mut total: Points = 0;
    for bill in bills {
        if bill.payer != first.payer {
            return Err(DomainError::validation(
                ValidationKind::MixedPayers,
                format!("bill names payers {} and {}", first.payer, bill.payer),
            ));
        }
        if bill.amount < 0 {
            return Err(DomainError::validation(
                ValidationKind::NegativeAmount,
                format!("share of {} is negative ({})", bill.debtor, bill.amount),
            ));
        }
        if !seen.insert(bill.debtor.as_str()) {
            return Err(DomainError::validation(
                ValidationKind::DuplicateDebtor,
                format!("{} listed twice", bill.debtor),
            ));
        }
        total = total.checked_add(bill.amount).ok_or_else(|| {
            DomainError::validation(
                ValidationKind::Overflow,
                format!("bill paid by {} overflows", first.payer),
            )
        })?;
    }
    Ok(())
}

/// Net effect of one group on `profile`: the payer is credited every other
/// debtor's share, a debtor is debited their own share, anyone else is
/// untouched.
pub fn bill_flow(group: &[Bill], profile: &str) -> Result<Points, DomainError> {
    if group.iter().any(|b| b.payer == profile) {
        return group
            .iter()
            .filter(|b| b.debtor != profile)
            .try_fold(0 as Points, |acc, b| acc.checked_add(b.amount))
            .ok_or_else(|| {
                DomainError::validation(
                    ValidationKind::Overflow,
                    format!("bill flow of {profile} overflows"),
                )
            });
    }
    Ok(group
        .iter()
        .find(|b| b.debtor == profile)
        .map(|b| -b.amount)
        .unwrap_or(0))
}
