//! Error codes for the scoreboard core.
//!
//! Add new codes here; never pass ad-hoc strings as error codes.
//!
//! All error codes are SCREAMING_SNAKE_CASE and map 1:1 to the strings
//! handed to the UI layer when an operation is rejected.

use core::fmt;

/// Centralized error codes for rejected session operations.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ErrorCode {
    // Input Validation
    /// Round needs at least two players
    TooFewPlayers,
    /// Same player listed twice in a round or roster
    DuplicatePlayer,
    /// Input references a player outside the round or roster
    UnknownPlayer,
    /// Winner is not one of the round's players
    InvalidWinner,
    /// Negative contribution, remaining points or bill amount
    NegativeAmount,
    /// A non-winner has no remaining points entered
    MissingRemainingPoints,
    /// Scored round does not sum to zero
    UnbalancedRound,
    /// Round arrays disagree in length with its players
    RoundShapeMismatch,
    /// Player name empty after trimming
    EmptyName,
    /// Player name already used in the session
    DuplicateName,
    /// Same debtor listed twice in one bill
    DuplicateDebtor,
    /// Bill transaction id already recorded
    DuplicateTransaction,
    /// Entries of one bill name different payers
    MixedPayers,
    /// Bill without debtors
    EmptyBill,
    /// Points arithmetic overflowed
    PointsOverflow,
    /// General validation error
    ValidationError,

    // Resource Not Found
    /// Round index out of range
    RoundNotFound,
    /// Player not in roster
    PlayerNotFound,
    /// Bill transaction id unknown
    BillNotFound,
    /// General not found error
    NotFound,

    // Consistency Violations
    /// Stored round scores do not sum to zero
    CorruptRound,
    /// Stored round arrays disagree in length
    MalformedRound,
    /// Balances do not sum to zero
    UnbalancedLedger,
    /// Data corruption detected
    DataCorruption,

    // System Errors
    /// Persistence layer failure
    StorageError,
    /// Document could not be (de)serialized
    SerializationError,
    /// Configuration error
    ConfigError,
    /// Session service has shut down
    SessionClosed,
}

impl ErrorCode {
    /// Returns the canonical SCREAMING_SNAKE_CASE string for this error code.
    pub const fn as_str(&self) -> &'static str {
        match self {
            // Input Validation
            Self::TooFewPlayers => "TOO_FEW_PLAYERS",
            Self::DuplicatePlayer => "DUPLICATE_PLAYER",
            Self::UnknownPlayer => "UNKNOWN_PLAYER",
            Self::InvalidWinner => "INVALID_WINNER",
            Self::NegativeAmount => "NEGATIVE_AMOUNT",
            Self::MissingRemainingPoints => "MISSING_REMAINING_POINTS",
            Self::UnbalancedRound => "UNBALANCED_ROUND",
            Self::RoundShapeMismatch => "ROUND_SHAPE_MISMATCH",
            Self::EmptyName => "EMPTY_NAME",
            Self::DuplicateName => "DUPLICATE_NAME",
            Self::DuplicateDebtor => "DUPLICATE_DEBTOR",
            Self::DuplicateTransaction => "DUPLICATE_TRANSACTION",
            Self::MixedPayers => "MIXED_PAYERS",
            Self::EmptyBill => "EMPTY_BILL",
            Self::PointsOverflow => "POINTS_OVERFLOW",
            Self::ValidationError => "VALIDATION_ERROR",

            // Resource Not Found
            Self::RoundNotFound => "ROUND_NOT_FOUND",
            Self::PlayerNotFound => "PLAYER_NOT_FOUND",
            Self::BillNotFound => "BILL_NOT_FOUND",
            Self::NotFound => "NOT_FOUND",

            // Consistency Violations
            Self::CorruptRound => "CORRUPT_ROUND",
            Self::MalformedRound => "MALFORMED_ROUND",
            Self::UnbalancedLedger => "UNBALANCED_LEDGER",
            Self::DataCorruption => "DATA_CORRUPTION",

            // System Errors
            Self::StorageError => "STORAGE_ERROR",
            Self::SerializationError => "SERIALIZATION_ERROR",
            Self::ConfigError => "CONFIG_ERROR",
            Self::SessionClosed => "SESSION_CLOSED",
        }
    }
}

impl fmt::Display for ErrorCode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.as_str())
    }
}
