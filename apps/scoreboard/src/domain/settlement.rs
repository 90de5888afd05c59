//! Settlement reducer: turn signed balances into point-to-point payments.

use std::collections::VecDeque;
use std::fmt::Debug;

use serde::{Deserialize, Serialize};
use tracing::error;

use crate::domain::round::Points;
use crate::errors::domain::{ConsistencyKind, DomainError, ValidationKind};

/// Insertion-ordered balances. Positive = owed money, negative = owes money.
///
/// The order is significant: it is the tie-break order of [`settle`].
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Balances<K> {
    entries: Vec<(K, Points)>,
}

impl<K> Default for Balances<K> {
    fn default() -> Self {
        Self {
            entries: Vec::new(),
        }
    }
}

impl<K: PartialEq> Balances<K> {
    pub fn new() -> Self {
        Self::default()
    }

    /// Append an entry, or add to it when `key` is already present.
    ///
    /// A merge that leaves the `i64` range is refused and the entry keeps
    /// its previous value.
    pub fn credit(&mut self, key: K, amount: Points) -> Result<(), DomainError> {
        match self.entries.iter_mut().find(|(k, _)| *k == key) {
            Some((_, v)) => {
                *v = v.checked_add(amount).ok_or_else(|| {
                    DomainError::validation(ValidationKind::Overflow, "balance overflow")
                })?;
            }
            None => self.entries.push((key, amount)),
        }
        Ok(())
    }

    pub fn get(&self, key: &K) -> Option<Points> {
        self.entries
            .iter()
            .find(|(k, _)| k == key)
            .map(|(_, v)| *v)
    }

    pub fn get_mut(&mut self, key: &K) -> Option<&mut Points> {
        self.entries
            .iter_mut()
            .find(|(k, _)| k == key)
            .map(|(_, v)| v)
    }

    pub fn iter(&self) -> impl Iterator<Item = (&K, Points)> {
        self.entries.iter().map(|(k, v)| (k, *v))
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    pub fn sum(&self) -> i128 {
        self.entries.iter().map(|(_, v)| *v as i128).sum()
    }

    pub fn into_entries(self) -> Vec<(K, Points)> {
        self.entries
    }
}

/// Collecting merges duplicate keys with saturating addition. A saturated
/// entry breaks the zero sum, so [`settle`] refuses the result; use
/// [`Balances::credit`] to see the overflow directly.
impl<K: PartialEq> FromIterator<(K, Points)> for Balances<K> {
    fn from_iter<I: IntoIterator<Item = (K, Points)>>(iter: I) -> Self {
        let mut out = Self::new();
        for (key, amount) in iter {
            match out.get_mut(&key) {
                Some(v) => *v = v.saturating_add(amount),
                None => out.entries.push((key, amount)),
            }
        }
        out
    }
}

/// One payment that clears part of a debt.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Transaction<K> {
    pub from: K,
    pub to: K,
    pub amount: Points,
}

/// Greedy first-debtor/first-creditor matching.
///
/// Debtors and creditors keep their encounter order from `balances`; each
/// step pays `min(debt, credit)` from the front debtor to the front creditor
/// and drops whichever side reaches zero. This is deterministic, not an
/// optimal minimum-transaction solver. Output length is at most
/// `debtors + creditors - 1`.
///
/// Balances that do not sum to zero are refused outright, as is a debt of
/// `i64::MIN`, which has no positive counterpart.
pub fn settle<K>(balances: &Balances<K>) -> Result<Vec<Transaction<K>>, DomainError>
where
    K: Clone + PartialEq + Debug,
{
    let residual = balances.sum();
    if residual != 0 {
        error!(residual, ?balances, "Refusing to settle unbalanced ledger");
        return Err(DomainError::consistency(
            ConsistencyKind::UnbalancedLedger,
            format!("balances sum to {residual}"),
        ));
    }

    let mut debtors: VecDeque<(K, Points)> = VecDeque::new();
    for (key, value) in balances.iter().filter(|(_, v)| *v < 0) {
        let Some(debt) = value.checked_neg() else {
            error!(?key, value, "Refusing to settle unrepresentable debt");
            return Err(DomainError::validation(
                ValidationKind::Overflow,
                format!("debt of {key:?} does not fit in a payment ({value})"),
            ));
        };
        debtors.push_back((key.clone(), debt));
    }
    let mut creditors: VecDeque<(K, Points)> = balances
        .iter()
        .filter(|(_, v)| *v > 0)
        .map(|(k, v)| (k.clone(), v))
        .collect();

    let mut transactions = Vec::with_capacity(debtors.len() + creditors.len());
    while !debtors.is_empty() && !creditors.is_empty() {
        let amount = debtors[0].1.min(creditors[0].1);
        transactions.push(Transaction {
            from: debtors[0].0.clone(),
            to: creditors[0].0.clone(),
            amount,
        });
        debtors[0].1 -= amount;
        creditors[0].1 -= amount;
        if debtors[0].1 == 0 {
            debtors.pop_front();
        }
        if creditors[0].1 == 0 {
            creditors.pop_front();
        }
    }

    debug_assert!(debtors.is_empty() && creditors.is_empty());
    Ok(transactions)
}
