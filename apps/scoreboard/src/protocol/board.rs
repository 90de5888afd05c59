use serde::{Deserialize, Serialize};

use crate::display::currency::format_currency;
use crate::domain::{GameResult, PlayerIndex, Points, ProfileId, SessionState};
use crate::errors::domain::DomainError;

/// Everything the scoreboard screen renders, computed from one state version.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct BoardView {
    pub version: u64,
    pub unit_multiplier: Points,
    pub players: Vec<PlayerLine>,
    pub rounds: Vec<GameResult>,
    pub transactions: Vec<TransactionLine>,
}

/// Roster entry with its running totals.
/// `total` is in points, `net_balance` in currency.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PlayerLine {
    pub index: PlayerIndex,
    pub name: String,
    pub profile_id: ProfileId,
    pub active: bool,
    pub total: Points,
    pub net_balance: Points,
}

/// One suggested payment, named for display.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TransactionLine {
    pub from: String,
    pub to: String,
    pub amount: Points,
    pub display: String,
}

impl BoardView {
    /// Fails when the stored history is inconsistent; nothing is partially rendered.
    pub fn build(state: &SessionState, version: u64) -> Result<Self, DomainError> {
        let totals = state.compute_totals()?;
        let net = state.compute_net_balances()?;
        let settlement = state.settle_net_balances()?;

        let players = state
            .players
            .iter()
            .map(|p| PlayerLine {
                index: p.index,
                name: p.name.clone(),
                profile_id: p.profile_id.clone(),
                active: p.active,
                total: totals.get(&p.index).unwrap_or(0),
                net_balance: net.get(&p.profile_id).unwrap_or(0),
            })
            .collect();

        let display_name = |profile: &ProfileId| -> String {
            state
                .player_by_profile(profile)
                .map(|p| p.name.clone())
                .unwrap_or_else(|| profile.clone())
        };

        let transactions = settlement
            .iter()
            .map(|t| TransactionLine {
                from: display_name(&t.from),
                to: display_name(&t.to),
                amount: t.amount,
                display: format_currency(t.amount, 1),
            })
            .collect();

        Ok(Self {
            version,
            unit_multiplier: state.setting.unit(),
            players,
            rounds: state.results.clone(),
            transactions,
        })
    }

    pub fn player(&self, index: PlayerIndex) -> Option<&PlayerLine> {
        self.players.iter().find(|p| p.index == index)
    }
}
