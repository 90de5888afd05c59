//! Ports for persisting and syncing the session document.

use async_trait::async_trait;

use crate::domain::SessionState;
use crate::error::AppError;

/// Local durable copy of the session.
#[async_trait]
pub trait SessionStore: Send + Sync {
    /// `Ok(None)` when nothing has been stored yet.
    async fn load(&self) -> Result<Option<SessionState>, AppError>;

    async fn persist(&self, state: &SessionState) -> Result<(), AppError>;
}

/// Remote replica receiving every committed state.
#[async_trait]
pub trait SessionSync: Send + Sync {
    async fn push(&self, state: &SessionState) -> Result<(), AppError>;
}
