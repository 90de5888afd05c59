use std::collections::HashSet;

use serde::{Deserialize, Serialize};
use tracing::info;

use crate::domain::bills::{check_bill_group, Bill, BillTable};
use crate::domain::players::{normalize_name, Player, PlayerIndex};
use crate::domain::round::{GameResult, Points};
use crate::errors::domain::{ConsistencyKind, DomainError, NotFoundKind, ValidationKind};

/// Session presentation metadata.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct GameSetting {
    /// Currency value of one point.
    #[serde(default = "default_unit")]
    pub unit_multiplier: Points,
    /// Device hosting the session (empty when unknown).
    #[serde(default)]
    pub server_device_id: String,
}

fn default_unit() -> Points {
    1
}

impl Default for GameSetting {
    fn default() -> Self {
        Self {
            unit_multiplier: default_unit(),
            server_device_id: String::new(),
        }
    }
}

impl GameSetting {
    /// Effective multiplier; a missing or non-positive setting counts as 1.
    pub fn unit(&self) -> Points {
        if self.unit_multiplier > 0 {
            self.unit_multiplier
        } else {
            1
        }
    }

    pub fn is_host(&self, device_id: &str) -> bool {
        !self.server_device_id.is_empty() && self.server_device_id == device_id
    }
}

/// Root aggregate of one scoring session.
///
/// All mutations validate before touching anything, so a rejected call
/// leaves the state exactly as it was.
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SessionState {
    #[serde(default)]
    pub players: Vec<Player>,
    #[serde(default)]
    pub results: Vec<GameResult>,
    #[serde(default)]
    pub bill_table: BillTable,
    #[serde(default)]
    pub setting: GameSetting,
}

impl SessionState {
    pub fn new(setting: GameSetting) -> Self {
        Self {
            setting,
            ..Self::default()
        }
    }

    // ---- roster ----

    pub fn player(&self, index: PlayerIndex) -> Option<&Player> {
        self.players.iter().find(|p| p.index == index)
    }

    pub fn player_by_profile(&self, profile_id: &str) -> Option<&Player> {
        self.players.iter().find(|p| p.profile_id == profile_id)
    }

    pub fn active_players(&self) -> impl Iterator<Item = &Player> {
        self.players.iter().filter(|p| p.active)
    }

    /// One past the highest index ever handed out.
    pub fn next_player_index(&self) -> PlayerIndex {
        self.players
            .iter()
            .map(|p| p.index + 1)
            .max()
            .unwrap_or(0)
    }

    pub fn add_player(&mut self, player: Player) -> Result<(), DomainError> {
        let normalized = normalize_name(&player.name);
        if normalized.is_empty() {
            return Err(DomainError::validation(
                ValidationKind::EmptyName,
                "player name is empty",
            ));
        }
        if self.player(player.index).is_some() {
            return Err(DomainError::validation(
                ValidationKind::DuplicatePlayer,
                format!("player index {} already in roster", player.index),
            ));
        }
        if self.player_by_profile(&player.profile_id).is_some() {
            return Err(DomainError::validation(
                ValidationKind::DuplicatePlayer,
                format!("profile {} already in roster", player.profile_id),
            ));
        }
        if self
            .players
            .iter()
            .any(|p| normalize_name(&p.name) == normalized)
        {
            return Err(DomainError::validation(
                ValidationKind::DuplicateName,
                format!("name {:?} already taken", player.name.trim()),
            ));
        }
        info!(index = player.index, name = %player.name, "Player added");
        self.players.push(player);
        Ok(())
    }

    /// Mark a player as gone. Their past rounds are left untouched.
    pub fn deactivate_player(&mut self, index: PlayerIndex) -> Result<(), DomainError> {
        let player = self
            .players
            .iter_mut()
            .find(|p| p.index == index)
            .ok_or_else(|| {
                DomainError::not_found(NotFoundKind::Player, format!("player index {index}"))
            })?;
        player.active = false;
        info!(index, "Player deactivated");
        Ok(())
    }

    /// Bring a returning profile back; returns its player index.
    pub fn reactivate_player(&mut self, profile_id: &str) -> Result<PlayerIndex, DomainError> {
        let player = self
            .players
            .iter_mut()
            .find(|p| p.profile_id == profile_id)
            .ok_or_else(|| {
                DomainError::not_found(NotFoundKind::Player, format!("profile {profile_id}"))
            })?;
        player.active = true;
        info!(index = player.index, "Player reactivated");
        Ok(player.index)
    }

    // ---- rounds ----

    pub fn append_result(&mut self, result: GameResult) -> Result<(), DomainError> {
        self.check_incoming_result(self.results.len(), &result)?;
        self.results.push(result);
        info!(rounds = self.results.len(), "Round appended");
        Ok(())
    }

    pub fn update_result(&mut self, index: usize, result: GameResult) -> Result<(), DomainError> {
        self.check_round_index(index)?;
        self.check_incoming_result(index, &result)?;
        self.results[index] = result;
        info!(round = index, "Round updated");
        Ok(())
    }

    pub fn delete_result(&mut self, index: usize) -> Result<GameResult, DomainError> {
        self.check_round_index(index)?;
        let removed = self.results.remove(index);
        info!(round = index, "Round deleted");
        Ok(removed)
    }

    fn check_round_index(&self, index: usize) -> Result<(), DomainError> {
        if index >= self.results.len() {
            return Err(DomainError::not_found(
                NotFoundKind::Round,
                format!("round {index} of {}", self.results.len()),
            ));
        }
        Ok(())
    }

    /// A new or edited round is user input: a malformed or unbalanced round
    /// is a validation error here, not corruption. `position` is where the
    /// round would land in the history.
    fn check_incoming_result(&self, position: usize, result: &GameResult) -> Result<(), DomainError> {
        match result.check_consistency(position) {
            Ok(()) => {}
            Err(DomainError::Consistency(ConsistencyKind::MalformedRound, detail)) => {
                return Err(DomainError::validation(ValidationKind::MalformedRound, detail));
            }
            Err(DomainError::Consistency(_, detail)) => {
                return Err(DomainError::validation(ValidationKind::UnbalancedRound, detail));
            }
            Err(err) => return Err(err),
        }
        let mut seen: HashSet<PlayerIndex> = HashSet::with_capacity(result.players.len());
        for snap in &result.players {
            if !seen.insert(snap.index) {
                return Err(DomainError::validation(
                    ValidationKind::DuplicatePlayer,
                    format!("player {} listed twice", snap.index),
                ));
            }
            if self.player(snap.index).is_none() {
                return Err(DomainError::validation(
                    ValidationKind::UnknownPlayer,
                    format!("round references player {} outside the roster", snap.index),
                ));
            }
        }
        Ok(())
    }

    // ---- bills ----

    pub fn add_bill(
        &mut self,
        transaction_id: impl Into<String>,
        bills: Vec<Bill>,
    ) -> Result<(), DomainError> {
        let transaction_id = transaction_id.into();
        if self.bill_table.contains_key(&transaction_id) {
            return Err(DomainError::validation(
                ValidationKind::DuplicateTransaction,
                format!("transaction {transaction_id} already recorded"),
            ));
        }
        self.check_incoming_bill(&bills)?;
        info!(transaction = %transaction_id, entries = bills.len(), "Bill added");
        self.bill_table.insert(transaction_id, bills);
        Ok(())
    }

    pub fn replace_bill(&mut self, transaction_id: &str, bills: Vec<Bill>) -> Result<(), DomainError> {
        if !self.bill_table.contains_key(transaction_id) {
            return Err(bill_not_found(transaction_id));
        }
        self.check_incoming_bill(&bills)?;
        info!(transaction = %transaction_id, entries = bills.len(), "Bill replaced");
        self.bill_table.insert(transaction_id.to_string(), bills);
        Ok(())
    }

    pub fn delete_bill(&mut self, transaction_id: &str) -> Result<Vec<Bill>, DomainError> {
        let removed = self
            .bill_table
            .remove(transaction_id)
            .ok_or_else(|| bill_not_found(transaction_id))?;
        info!(transaction = %transaction_id, "Bill deleted");
        Ok(removed)
    }

    fn check_incoming_bill(&self, bills: &[Bill]) -> Result<(), DomainError> {
        check_bill_group(bills)?;
        for bill in bills {
            for profile in [&bill.payer, &bill.debtor] {
                if self.player_by_profile(profile).is_none() {
                    return Err(DomainError::validation(
                        ValidationKind::UnknownPlayer,
                        format!("bill references profile {profile} outside the roster"),
                    ));
                }
            }
        }
        Ok(())
    }

    /// Clear roster, rounds and bills, keeping the setting.
    pub fn reset(&mut self) {
        self.players.clear();
        self.results.clear();
        self.bill_table.clear();
        info!("Session reset");
    }
}

fn bill_not_found(transaction_id: &str) -> DomainError {
    DomainError::not_found(NotFoundKind::Bill, format!("transaction {transaction_id}"))
}
