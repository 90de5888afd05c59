//! Shared setup for unit tests.

pub mod logging;
