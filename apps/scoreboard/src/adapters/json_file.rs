//! Session document kept as pretty JSON on the local filesystem.
//!
//! Writes go to `<path>.tmp` and are renamed into place while holding an
//! exclusive lock on `<path>.lock`, so readers never see a half-written file.

use std::fs::{self, OpenOptions};
use std::io::{self, Write};
use std::path::{Path, PathBuf};

use async_trait::async_trait;
use tracing::debug;

use crate::config::session::SessionConfig;
use crate::domain::SessionState;
use crate::error::AppError;
use crate::repos::SessionStore;

#[derive(Debug, Clone)]
pub struct JsonFileStore {
    path: PathBuf,
}

impl JsonFileStore {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }

    /// Store at `config.state_path`; a config error when no path is set.
    pub fn from_config(config: &SessionConfig) -> Result<Self, AppError> {
        config
            .state_path
            .as_ref()
            .map(|path| Self::new(path.clone()))
            .ok_or_else(|| AppError::config("SCOREBOARD_STATE_PATH is not set"))
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    fn sibling(&self, suffix: &str) -> PathBuf {
        let mut name = self.path.as_os_str().to_owned();
        name.push(suffix);
        PathBuf::from(name)
    }
}

#[async_trait]
impl SessionStore for JsonFileStore {
    async fn load(&self) -> Result<Option<SessionState>, AppError> {
        let raw = match tokio::fs::read_to_string(&self.path).await {
            Ok(raw) => raw,
            Err(e) if e.kind() == io::ErrorKind::NotFound => return Ok(None),
            Err(e) => {
                return Err(AppError::storage(
                    format!("failed to read {}", self.path.display()),
                    e,
                ))
            }
        };
        let state: SessionState = serde_json::from_str(&raw)?;
        debug!(
            path = %self.path.display(),
            players = state.players.len(),
            rounds = state.results.len(),
            "Loaded session document"
        );
        Ok(Some(state))
    }

    async fn persist(&self, state: &SessionState) -> Result<(), AppError> {
        let body = serde_json::to_vec_pretty(state)?;
        let path = self.path.clone();
        let tmp_path = self.sibling(".tmp");
        let lock_path = self.sibling(".lock");

        tokio::task::spawn_blocking(move || write_locked(&path, &tmp_path, &lock_path, &body))
            .await
            .map_err(|e| AppError::storage("persist task aborted", e))?
    }
}

fn write_locked(path: &Path, tmp_path: &Path, lock_path: &Path, body: &[u8]) -> Result<(), AppError> {
    use fs4::fs_std::FileExt;

    if let Some(parent) = path.parent().filter(|p| !p.as_os_str().is_empty()) {
        fs::create_dir_all(parent).map_err(|e| {
            AppError::storage(format!("failed to create {}", parent.display()), e)
        })?;
    }

    let lock = OpenOptions::new()
        .create(true)
        .truncate(true)
        .read(true)
        .write(true)
        .open(lock_path)
        .map_err(|e| AppError::storage("failed to open lock file", e))?;

    // Ok(false) means another process holds the lock.
    match lock.try_lock_exclusive() {
        Ok(true) => {}
        Ok(false) => {
            return Err(AppError::storage(
                format!("{} is locked by another writer", path.display()),
                io::Error::from(io::ErrorKind::WouldBlock),
            ))
        }
        Err(e) => return Err(AppError::storage("failed to lock session document", e)),
    }

    let mut tmp = fs::File::create(tmp_path)
        .map_err(|e| AppError::storage("failed to create temp file", e))?;
    tmp.write_all(body)?;
    tmp.sync_all()?;
    drop(tmp);
    fs::rename(tmp_path, path)
        .map_err(|e| AppError::storage(format!("failed to replace {}", path.display()), e))?;

    debug!(path = %path.display(), bytes = body.len(), "Persisted session document");
    Ok(())
}
