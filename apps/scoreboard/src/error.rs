use thiserror::Error;

use crate::errors::domain::{ConsistencyKind, DomainError, NotFoundKind, ValidationKind};
use crate::errors::ErrorCode;

/// Boundary error for the session service, its ports and adapters.
#[derive(Error, Debug)]
pub enum AppError {
    #[error("{0}")]
    Domain(#[from] DomainError),
    #[error("Storage error: {detail}")]
    Storage {
        detail: String,
        #[source]
        source: Box<dyn std::error::Error + Send + Sync>,
    },
    #[error("Serialization error: {0}")]
    Serialization(#[from] serde_json::Error),
    #[error("Configuration error: {detail}")]
    Config { detail: String },
    #[error("Session closed")]
    Closed,
}

impl AppError {
    /// Canonical code for this error, suitable for the UI layer.
    pub fn code(&self) -> ErrorCode {
        match self {
            AppError::Domain(de) => domain_code(de),
            AppError::Storage { .. } => ErrorCode::StorageError,
            AppError::Serialization(_) => ErrorCode::SerializationError,
            AppError::Config { .. } => ErrorCode::ConfigError,
            AppError::Closed => ErrorCode::SessionClosed,
        }
    }

    /// The wrapped domain error, if any.
    pub fn as_domain(&self) -> Option<&DomainError> {
        match self {
            AppError::Domain(de) => Some(de),
            _ => None,
        }
    }

    pub fn storage(
        detail: impl Into<String>,
        source: impl std::error::Error + Send + Sync + 'static,
    ) -> Self {
        Self::Storage {
            detail: detail.into(),
            source: Box::new(source),
        }
    }

    pub fn config(detail: impl Into<String>) -> Self {
        Self::Config {
            detail: detail.into(),
        }
    }
}

fn domain_code(err: &DomainError) -> ErrorCode {
    match err {
        DomainError::Validation(kind, _) => match kind {
            ValidationKind::TooFewPlayers => ErrorCode::TooFewPlayers,
            ValidationKind::DuplicatePlayer => ErrorCode::DuplicatePlayer,
            ValidationKind::UnknownPlayer => ErrorCode::UnknownPlayer,
            ValidationKind::InvalidWinner => ErrorCode::InvalidWinner,
            ValidationKind::NegativeAmount => ErrorCode::NegativeAmount,
            ValidationKind::MissingRemainingPoints => ErrorCode::MissingRemainingPoints,
            ValidationKind::UnbalancedRound => ErrorCode::UnbalancedRound,
            ValidationKind::MalformedRound => ErrorCode::RoundShapeMismatch,
            ValidationKind::EmptyName => ErrorCode::EmptyName,
            ValidationKind::DuplicateName => ErrorCode::DuplicateName,
            ValidationKind::DuplicateDebtor => ErrorCode::DuplicateDebtor,
            ValidationKind::DuplicateTransaction => ErrorCode::DuplicateTransaction,
            ValidationKind::MixedPayers => ErrorCode::MixedPayers,
            ValidationKind::EmptyBill => ErrorCode::EmptyBill,
            ValidationKind::Overflow => ErrorCode::PointsOverflow,
            ValidationKind::Other(_) => ErrorCode::ValidationError,
        },
        DomainError::NotFound(kind, _) => match kind {
            NotFoundKind::Round => ErrorCode::RoundNotFound,
            NotFoundKind::Player => ErrorCode::PlayerNotFound,
            NotFoundKind::Bill => ErrorCode::BillNotFound,
            NotFoundKind::Other(_) => ErrorCode::NotFound,
        },
        DomainError::Consistency(kind, _) => match kind {
            ConsistencyKind::UnbalancedRound => ErrorCode::CorruptRound,
            ConsistencyKind::MalformedRound => ErrorCode::MalformedRound,
            ConsistencyKind::UnbalancedLedger => ErrorCode::UnbalancedLedger,
            ConsistencyKind::Other(_) => ErrorCode::DataCorruption,
        },
    }
}

impl From<std::io::Error> for AppError {
    fn from(e: std::io::Error) -> Self {
        AppError::storage(format!("io error: {e}"), e)
    }
}
