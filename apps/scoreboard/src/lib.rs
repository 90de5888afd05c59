#![deny(clippy::wildcard_imports)]
#![cfg_attr(test, allow(clippy::wildcard_imports))]

pub mod adapters;
pub mod config;
pub mod display;
pub mod domain;
pub mod error;
pub mod errors;
pub mod protocol;
pub mod repos;
pub mod services;
pub mod telemetry;

#[cfg(test)]
pub mod test_bootstrap;

// Re-exports for public API
pub use adapters::json_file::JsonFileStore;
pub use adapters::memory::{MemoryStore, MemorySync};
pub use config::session::SessionConfig;
pub use display::currency::format_currency;
pub use domain::{
    score_round, settle, Balances, Bill, GameResult, GameSetting, Player, PlayerIndex, RoundInput,
    SessionState, Transaction,
};
pub use error::AppError;
pub use errors::{DomainError, ErrorCode};
pub use protocol::board::BoardView;
pub use repos::{SessionStore, SessionSync};
pub use services::session::SessionService;
pub use services::subscribers::{SessionEvent, SubscriberRegistry};

// Prelude for test convenience
pub mod prelude {
    pub use super::adapters::*;
    pub use super::domain::*;
    pub use super::error::*;
    pub use super::protocol::*;
    pub use super::repos::*;
    pub use super::services::*;
}

// Auto-initialize logging for unit tests
#[cfg(test)]
#[ctor::ctor]
fn init_test_logging() {
    test_bootstrap::logging::init();
}
