//! Shared fixtures for domain unit tests.

use crate::domain::players::{Player, PlayerIndex};
use crate::domain::round::{GameResult, RoundInput};
use crate::domain::scoring::score_round;
use crate::domain::state::{GameSetting, SessionState};

/// Roster of `names`, indices 0.., profile ids `p-<index>`.
pub fn make_players(names: &[&str]) -> Vec<Player> {
    names
        .iter()
        .enumerate()
        .map(|(i, name)| Player::new(i as PlayerIndex, *name, format!("p-{i}"), ""))
        .collect()
}

/// Session with the given roster and unit multiplier.
pub fn make_session(names: &[&str], unit: i64) -> SessionState {
    let mut state = SessionState::new(GameSetting {
        unit_multiplier: unit,
        server_device_id: "device-host".into(),
    });
    for p in make_players(names) {
        state.add_player(p).expect("fixture player should be valid");
    }
    state
}

/// Score a round where `winner` collects the given remaining points.
pub fn remaining_round(
    players: &[Player],
    winner: PlayerIndex,
    remaining: &[(PlayerIndex, i64)],
) -> GameResult {
    let mut input = RoundInput::new(players, winner);
    for &(idx, pts) in remaining {
        input = input.with_remaining(idx, pts);
    }
    score_round(&input).expect("fixture round should score")
}

/// Raw stored round with arbitrary scores, bypassing the scorer.
pub fn raw_round(players: &[Player], winner: PlayerIndex, scores: Vec<i64>) -> GameResult {
    let n = players.len();
    GameResult {
        player_count: n as u32,
        players: players.iter().map(Player::snapshot).collect(),
        winner_index: winner,
        scores,
        common_points: vec![0; n],
        penalties: Vec::new(),
        remaining_points: vec![0; n],
    }
}
