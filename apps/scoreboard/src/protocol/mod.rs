//! Serializable views handed to the UI layer.

pub mod board;

pub use board::{BoardView, PlayerLine, TransactionLine};
