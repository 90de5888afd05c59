//! Implementations of the persistence and sync ports.

pub mod json_file;
pub mod memory;

pub use json_file::JsonFileStore;
pub use memory::{MemoryStore, MemorySync};
