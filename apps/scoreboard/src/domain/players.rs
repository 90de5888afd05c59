//! Roster types and player-name normalisation.

use serde::{Deserialize, Serialize};
use unicode_normalization::UnicodeNormalization;

/// Stable identifier of a player within one session.
pub type PlayerIndex = u32;

/// Identifier of the device profile a player joined with.
pub type ProfileId = String;

/// A session participant.
///
/// Players are never removed from the roster; `active = false` marks someone
/// who left, so their historical round scores keep contributing to totals.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Player {
    pub index: PlayerIndex,
    pub name: String,
    pub profile_id: ProfileId,
    #[serde(default)]
    pub avatar: String,
    #[serde(default = "default_active")]
    pub active: bool,
}

fn default_active() -> bool {
    true
}

impl Player {
    pub fn new(
        index: PlayerIndex,
        name: impl Into<String>,
        profile_id: impl Into<ProfileId>,
        avatar: impl Into<String>,
    ) -> Self {
        Self {
            index,
            name: name.into(),
            profile_id: profile_id.into(),
            avatar: avatar.into(),
            active: true,
        }
    }

    pub fn snapshot(&self) -> PlayerSnapshot {
        PlayerSnapshot {
            index: self.index,
            name: self.name.clone(),
        }
    }
}

/// Identity of a player as recorded in one round.
///
/// Rounds keep their own copy so they stay readable after the roster changes.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PlayerSnapshot {
    pub index: PlayerIndex,
    pub name: String,
}

impl From<&Player> for PlayerSnapshot {
    fn from(p: &Player) -> Self {
        p.snapshot()
    }
}

/// Canonical form used to compare player names (trimmed, NFKC, lowercased).
pub fn normalize_name(name: &str) -> String {
    name.trim().nfkc().collect::<String>().to_lowercase()
}
