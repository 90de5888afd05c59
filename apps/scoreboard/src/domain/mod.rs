//! Domain layer: pure scoring, ledger and settlement logic.

pub mod bills;
pub mod ledger;
pub mod players;
pub mod round;
pub mod scoring;
pub mod settlement;
pub mod state;

#[cfg(test)]
mod test_state_helpers;
#[cfg(test)]
mod tests_props_ledger;
#[cfg(test)]
mod tests_props_scoring;
#[cfg(test)]
mod tests_props_settlement;
#[cfg(test)]
mod tests_scoring;

// Re-exports for ergonomics
pub use bills::{new_transaction_id, split_bill, Bill, BillTable};
pub use players::{normalize_name, Player, PlayerIndex, PlayerSnapshot, ProfileId};
pub use round::{GameResult, Penalty, Points, RoundInput};
pub use scoring::score_round;
pub use settlement::{settle, Balances, Transaction};
pub use state::{GameSetting, SessionState};
