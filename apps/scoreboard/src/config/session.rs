use std::env;
use std::path::PathBuf;

use crate::domain::{GameSetting, Points};
use crate::error::AppError;

const DEFAULT_OUTBOX_CAPACITY: usize = 64;

/// Settings for opening a session.
#[derive(Debug, Clone, PartialEq)]
pub struct SessionConfig {
    /// Points-to-currency multiplier for a fresh session
    pub unit_multiplier: Points,
    /// Device id recorded as the session's server device
    pub device_id: Option<String>,
    /// Where `JsonFileStore` keeps the session document
    pub state_path: Option<PathBuf>,
    /// Queued snapshots awaiting persistence before mutations wait
    pub outbox_capacity: usize,
}

impl SessionConfig {
    pub fn new() -> Self {
        Self {
            unit_multiplier: 1,
            device_id: None,
            state_path: None,
            outbox_capacity: DEFAULT_OUTBOX_CAPACITY,
        }
    }

    /// Reads `SCOREBOARD_UNIT`, `SCOREBOARD_DEVICE_ID`, `SCOREBOARD_STATE_PATH`
    /// and `SCOREBOARD_OUTBOX_CAPACITY`. Unset variables keep their defaults.
    pub fn from_env() -> Result<Self, AppError> {
        let mut config = Self::new();
        if let Some(unit) = optional_var("SCOREBOARD_UNIT") {
            config.unit_multiplier = parse_positive("SCOREBOARD_UNIT", &unit)?;
        }
        config.device_id = optional_var("SCOREBOARD_DEVICE_ID");
        config.state_path = optional_var("SCOREBOARD_STATE_PATH").map(PathBuf::from);
        if let Some(capacity) = optional_var("SCOREBOARD_OUTBOX_CAPACITY") {
            let parsed = parse_positive("SCOREBOARD_OUTBOX_CAPACITY", &capacity)?;
            config.outbox_capacity = usize::try_from(parsed).map_err(|_| {
                AppError::config(format!(
                    "SCOREBOARD_OUTBOX_CAPACITY is out of range: '{capacity}'"
                ))
            })?;
        }
        Ok(config)
    }

    pub fn with_unit(mut self, unit_multiplier: Points) -> Self {
        self.unit_multiplier = unit_multiplier;
        self
    }

    pub fn with_device_id(mut self, device_id: impl Into<String>) -> Self {
        self.device_id = Some(device_id.into());
        self
    }

    pub fn with_state_path(mut self, path: impl Into<PathBuf>) -> Self {
        self.state_path = Some(path.into());
        self
    }

    pub fn with_outbox_capacity(mut self, capacity: usize) -> Self {
        self.outbox_capacity = capacity.max(1);
        self
    }

    /// Setting stamped on a session that starts empty.
    pub fn initial_setting(&self) -> GameSetting {
        GameSetting {
            unit_multiplier: self.unit_multiplier,
            server_device_id: self.device_id.clone().unwrap_or_default(),
        }
    }
}

impl Default for SessionConfig {
    fn default() -> Self {
        Self::new()
    }
}

/// Unset and blank values both count as absent.
fn optional_var(name: &str) -> Option<String> {
    env::var(name)
        .ok()
        .map(|v| v.trim().to_string())
        .filter(|v| !v.is_empty())
}

fn parse_positive(name: &str, raw: &str) -> Result<Points, AppError> {
    match raw.parse::<Points>() {
        Ok(v) if v > 0 => Ok(v),
        _ => Err(AppError::config(format!(
            "{name} must be a positive integer, but got: '{raw}'"
        ))),
    }
}
