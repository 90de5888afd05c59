// Unit tests for error mapping - pure domain logic without storage or sync dependencies
use crate::errors::domain::{ConsistencyKind, DomainError, NotFoundKind, ValidationKind};
use crate::{AppError, ErrorCode};

#[test]
fn maps_validation_kinds() {
    let de = DomainError::validation(ValidationKind::UnbalancedRound, "sum is 3");
    let app: AppError = de.into();
    assert_eq!(app.code(), ErrorCode::UnbalancedRound);

    let de = DomainError::validation(ValidationKind::MalformedRound, "3 players but scores=2");
    let app: AppError = de.into();
    assert_eq!(app.code().as_str(), "ROUND_SHAPE_MISMATCH");

    let de = DomainError::validation(ValidationKind::Overflow, "too big");
    let app: AppError = de.into();
    assert_eq!(app.code().as_str(), "POINTS_OVERFLOW");

    // Generic validation fallback
    let other = DomainError::validation(ValidationKind::Other("x".into()), "bad field");
    let app: AppError = other.into();
    assert_eq!(app.code(), ErrorCode::ValidationError);
}

#[test]
fn maps_not_found() {
    let nf = DomainError::not_found(NotFoundKind::Round, "round 7");
    let app: AppError = nf.into();
    assert_eq!(app.code().as_str(), "ROUND_NOT_FOUND");

    let nf = DomainError::not_found(NotFoundKind::Bill, "tx-1");
    let app: AppError = nf.into();
    assert_eq!(app.code().as_str(), "BILL_NOT_FOUND");
}

#[test]
fn maps_consistency() {
    let corrupt = DomainError::consistency(ConsistencyKind::UnbalancedRound, "round 0");
    assert!(corrupt.is_consistency());
    let app: AppError = corrupt.into();
    assert_eq!(app.code(), ErrorCode::CorruptRound);
    assert!(matches!(app, AppError::Domain(DomainError::Consistency(..))));

    let ledger = DomainError::consistency(ConsistencyKind::UnbalancedLedger, "residual 1");
    let app: AppError = ledger.into();
    assert_eq!(app.code().as_str(), "UNBALANCED_LEDGER");

    let other = DomainError::consistency(ConsistencyKind::Other("?".into()), "other");
    let app: AppError = other.into();
    assert_eq!(app.code(), ErrorCode::DataCorruption);
}

#[test]
fn maps_boundary_errors() {
    let io = std::io::Error::new(std::io::ErrorKind::PermissionDenied, "denied");
    let app: AppError = io.into();
    assert_eq!(app.code(), ErrorCode::StorageError);
    assert!(app.as_domain().is_none());

    let json = serde_json::from_str::<serde_json::Value>("{").unwrap_err();
    let app: AppError = json.into();
    assert_eq!(app.code(), ErrorCode::SerializationError);

    assert_eq!(AppError::config("bad unit").code(), ErrorCode::ConfigError);
    assert_eq!(AppError::Closed.code(), ErrorCode::SessionClosed);
}

#[test]
fn display_carries_detail() {
    let de = DomainError::not_found(NotFoundKind::Player, "index 4");
    assert_eq!(de.to_string(), "not found Player: index 4");
    let app: AppError = de.into();
    assert_eq!(app.to_string(), "not found Player: index 4");
}
