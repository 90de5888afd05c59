//! In-process store and sync, used by tests and single-device sessions.

use std::io;
use std::sync::atomic::{AtomicBool, Ordering};

use async_trait::async_trait;
use parking_lot::Mutex;

use crate::domain::SessionState;
use crate::error::AppError;
use crate::repos::{SessionStore, SessionSync};

#[derive(Debug, Default)]
pub struct MemoryStore {
    state: Mutex<Option<SessionState>>,
    failing: AtomicBool,
}

impl MemoryStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Store pre-seeded with a document, as if persisted by an earlier run.
    pub fn with_state(state: SessionState) -> Self {
        Self {
            state: Mutex::new(Some(state)),
            failing: AtomicBool::new(false),
        }
    }

    /// Make every subsequent load and persist fail.
    pub fn set_failing(&self, failing: bool) {
        self.failing.store(failing, Ordering::SeqCst);
    }

    pub fn stored(&self) -> Option<SessionState> {
        self.state.lock().clone()
    }

    fn check(&self, op: &str) -> Result<(), AppError> {
        if self.failing.load(Ordering::SeqCst) {
            return Err(AppError::storage(
                format!("memory store {op} failed"),
                io::Error::other("injected failure"),
            ));
        }
        Ok(())
    }
}

#[async_trait]
impl SessionStore for MemoryStore {
    async fn load(&self) -> Result<Option<SessionState>, AppError> {
        self.check("load")?;
        Ok(self.state.lock().clone())
    }

    async fn persist(&self, state: &SessionState) -> Result<(), AppError> {
        self.check("persist")?;
        *self.state.lock() = Some(state.clone());
        Ok(())
    }
}

/// Records every pushed state in order.
#[derive(Debug, Default)]
pub struct MemorySync {
    pushes: Mutex<Vec<SessionState>>,
    failing: AtomicBool,
}

impl MemorySync {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn set_failing(&self, failing: bool) {
        self.failing.store(failing, Ordering::SeqCst);
    }

    pub fn push_count(&self) -> usize {
        self.pushes.lock().len()
    }

    pub fn last(&self) -> Option<SessionState> {
        self.pushes.lock().last().cloned()
    }
}

#[async_trait]
impl SessionSync for MemorySync {
    async fn push(&self, state: &SessionState) -> Result<(), AppError> {
        if self.failing.load(Ordering::SeqCst) {
            return Err(AppError::storage(
                "memory sync push failed",
                io::Error::other("injected failure"),
            ));
        }
        self.pushes.lock().push(state.clone());
        Ok(())
    }
}
