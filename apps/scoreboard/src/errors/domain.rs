//! Domain-level error type used across the ledger, the session service and adapters.
//!
//! This error type is IO- and transport-agnostic. Boundary code should return
//! `Result<T, crate::error::AppError>` and convert from `DomainError`
//! using the provided `From<DomainError> for AppError` implementation.

use std::error::Error;
use std::fmt::{Display, Formatter, Result as FmtResult};

/// Rejected user input. State is never mutated when one of these is raised.
#[derive(Debug, Clone, PartialEq, Eq)]
#[non_exhaustive]
pub enum ValidationKind {
    TooFewPlayers,
    DuplicatePlayer,
    UnknownPlayer,
    InvalidWinner,
    NegativeAmount,
    MissingRemainingPoints,
    UnbalancedRound,
    MalformedRound,
    EmptyName,
    DuplicateName,
    DuplicateDebtor,
    DuplicateTransaction,
    MixedPayers,
    EmptyBill,
    Overflow,
    Other(String),
}

/// Domain-level not found entities
#[derive(Debug, Clone, PartialEq, Eq)]
#[non_exhaustive]
pub enum NotFoundKind {
    Round,
    Player,
    Bill,
    Other(String),
}

/// Upstream corruption detected while folding stored state
#[derive(Debug, Clone, PartialEq, Eq)]
#[non_exhaustive]
pub enum ConsistencyKind {
    /// A stored round whose scores do not sum to zero.
    UnbalancedRound,
    /// A stored round whose per-player arrays disagree in length.
    MalformedRound,
    /// Balances handed to the settlement reducer do not sum to zero.
    UnbalancedLedger,
    Other(String),
}

/// Central domain error type
#[derive(Debug, Clone, PartialEq)]
pub enum DomainError {
    /// Input validation or business rule violation
    Validation(ValidationKind, String),
    /// Missing round, player or bill
    NotFound(NotFoundKind, String),
    /// Stored state violates the zero-sum invariant
    Consistency(ConsistencyKind, String),
}

impl Display for DomainError {
    fn fmt(&self, f: &mut Formatter<'_>) -> FmtResult {
        match self {
            DomainError::Validation(kind, d) => write!(f, "validation error {kind:?}: {d}"),
            DomainError::NotFound(kind, d) => write!(f, "not found {kind:?}: {d}"),
            DomainError::Consistency(kind, d) => write!(f, "consistency violation {kind:?}: {d}"),
        }
    }
}

impl Error for DomainError {}

impl DomainError {
    pub fn validation(kind: ValidationKind, detail: impl Into<String>) -> Self {
        Self::Validation(kind, detail.into())
    }
    pub fn not_found(kind: NotFoundKind, detail: impl Into<String>) -> Self {
        Self::NotFound(kind, detail.into())
    }
    pub fn consistency(kind: ConsistencyKind, detail: impl Into<String>) -> Self {
        Self::Consistency(kind, detail.into())
    }

    /// True for corruption of stored state, as opposed to a rejected input.
    pub fn is_consistency(&self) -> bool {
        matches!(self, DomainError::Consistency(..))
    }
}
