//! Round inputs and the stored per-round result.

use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};

use crate::domain::players::{Player, PlayerIndex, PlayerSnapshot};
use crate::errors::domain::{ConsistencyKind, DomainError};

/// Points in the abstract game unit. Scaled to currency only for display.
pub type Points = i64;

/// A forced transfer from `payer` to `receiver`, scaled like common points.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Penalty {
    pub payer_index: PlayerIndex,
    pub receiver_index: PlayerIndex,
    pub amount: Points,
}

impl Penalty {
    pub fn new(payer_index: PlayerIndex, receiver_index: PlayerIndex, amount: Points) -> Self {
        Self {
            payer_index,
            receiver_index,
            amount,
        }
    }

    /// Self-targeted and non-positive penalties carry no transfer.
    pub fn is_effective(&self) -> bool {
        self.amount > 0 && self.payer_index != self.receiver_index
    }
}

/// Raw inputs for one round as collected by the UI.
///
/// `players` fixes the positional order of every array in the resulting
/// [`GameResult`]. Maps are keyed by player index.
#[derive(Debug, Clone, PartialEq, Default)]
pub struct RoundInput {
    pub players: Vec<PlayerSnapshot>,
    pub winner_index: PlayerIndex,
    pub common_points: BTreeMap<PlayerIndex, Points>,
    pub penalties: Vec<Penalty>,
    pub remaining_points: BTreeMap<PlayerIndex, Points>,
}

impl RoundInput {
    pub fn new<'a>(players: impl IntoIterator<Item = &'a Player>, winner_index: PlayerIndex) -> Self {
        Self {
            players: players.into_iter().map(PlayerSnapshot::from).collect(),
            winner_index,
            ..Self::default()
        }
    }

    pub fn with_common(mut self, player: PlayerIndex, amount: Points) -> Self {
        self.common_points.insert(player, amount);
        self
    }

    pub fn with_penalty(mut self, payer: PlayerIndex, receiver: PlayerIndex, amount: Points) -> Self {
        self.penalties.push(Penalty::new(payer, receiver, amount));
        self
    }

    pub fn with_remaining(mut self, player: PlayerIndex, points: Points) -> Self {
        self.remaining_points.insert(player, points);
        self
    }
}

/// One scored round.
///
/// Every per-player array is aligned with `players`, the identity snapshot
/// taken when the round was recorded.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct GameResult {
    pub player_count: u32,
    pub players: Vec<PlayerSnapshot>,
    pub winner_index: PlayerIndex,
    pub scores: Vec<Points>,
    #[serde(default)]
    pub common_points: Vec<Points>,
    #[serde(default)]
    pub penalties: Vec<Penalty>,
    #[serde(default)]
    pub remaining_points: Vec<Points>,
}

impl GameResult {
    /// Position of `index` in this round's own snapshot.
    pub fn position_of(&self, index: PlayerIndex) -> Option<usize> {
        self.players.iter().position(|p| p.index == index)
    }

    /// Score of a player in this round, resolved by identity.
    pub fn score_of(&self, index: PlayerIndex) -> Option<Points> {
        self.position_of(index)
            .and_then(|pos| self.scores.get(pos).copied())
    }

    pub fn score_sum(&self) -> i128 {
        self.scores.iter().map(|&s| s as i128).sum()
    }

    /// Structural check of a stored round at `position` in the history.
    pub fn check_consistency(&self, position: usize) -> Result<(), DomainError> {
        let n = self.players.len();
        let aligned = self.player_count as usize == n
            && self.scores.len() == n
            && (self.common_points.is_empty() || self.common_points.len() == n)
            && (self.remaining_points.is_empty() || self.remaining_points.len() == n);
        if !aligned {
            return Err(DomainError::consistency(
                ConsistencyKind::MalformedRound,
                format!(
                    "round {position}: {n} players but player_count={} scores={}",
                    self.player_count,
                    self.scores.len()
                ),
            ));
        }
        let sum = self.score_sum();
        if sum != 0 {
            return Err(DomainError::consistency(
                ConsistencyKind::UnbalancedRound,
                format!("round {position}: scores sum to {sum}"),
            ));
        }
        Ok(())
    }
}
