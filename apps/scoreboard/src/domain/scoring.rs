use std::collections::{BTreeMap, HashMap};

use tracing::{debug, error};

use crate::domain::players::PlayerIndex;
use crate::domain::round::{GameResult, Penalty, Points, RoundInput};
use crate::errors::domain::{DomainError, ValidationKind};

/// Fold a round's raw inputs into a zero-sum [`GameResult`].
///
/// With `n` players in the round:
/// 1. a common contribution `c` gives its contributor `c * (n-1)` and takes
///    `c` from everyone else;
/// 2. a penalty moves `amount * (n-1)` from payer to receiver;
/// 3. remaining points are deducted from each player and the winner
///    collects their sum.
///
/// Penalties that are self-targeted or non-positive are skipped. Any other
/// malformed input rejects the round, as does a non-zero total.
pub fn score_round(input: &RoundInput) -> Result<GameResult, DomainError> {
    let n = input.players.len();
    if n < 2 {
        return Err(DomainError::validation(
            ValidationKind::TooFewPlayers,
            format!("a round needs at least 2 players, got {n}"),
        ));
    }

    let mut positions: HashMap<PlayerIndex, usize> = HashMap::with_capacity(n);
    for (pos, p) in input.players.iter().enumerate() {
        if positions.insert(p.index, pos).is_some() {
            return Err(DomainError::validation(
                ValidationKind::DuplicatePlayer,
                format!("player {} listed twice", p.index),
            ));
        }
    }

    let winner = *positions.get(&input.winner_index).ok_or_else(|| {
        DomainError::validation(
            ValidationKind::InvalidWinner,
            format!("winner {} is not in this round", input.winner_index),
        )
    })?;

    let factor = (n - 1) as Points;
    let mut scores: Vec<Points> = vec![0; n];

    let common = aligned_amounts(&input.common_points, &positions, n, "common points")?;
    for (pos, &c) in common.iter().enumerate() {
        if c == 0 {
            continue;
        }
        let gain = checked_mul(c, factor)?;
        scores[pos] = checked_add(scores[pos], gain)?;
        for (j, score) in scores.iter_mut().enumerate() {
            if j != pos {
                *score = checked_add(*score, -c)?;
            }
        }
    }

    let mut applied: Vec<Penalty> = Vec::with_capacity(input.penalties.len());
    for penalty in &input.penalties {
        if !penalty.is_effective() {
            debug!(
                payer = penalty.payer_index,
                receiver = penalty.receiver_index,
                amount = penalty.amount,
                "Skipping ineffective penalty"
            );
            continue;
        }
        let payer = lookup(&positions, penalty.payer_index, "penalty payer")?;
        let receiver = lookup(&positions, penalty.receiver_index, "penalty receiver")?;
        let transfer = checked_mul(penalty.amount, factor)?;
        scores[payer] = checked_add(scores[payer], -transfer)?;
        scores[receiver] = checked_add(scores[receiver], transfer)?;
        applied.push(penalty.clone());
    }

    let mut remaining = aligned_amounts(&input.remaining_points, &positions, n, "remaining points")?;
    for (pos, p) in input.players.iter().enumerate() {
        if pos != winner && !input.remaining_points.contains_key(&p.index) {
            return Err(DomainError::validation(
                ValidationKind::MissingRemainingPoints,
                format!("player {} has no remaining points", p.index),
            ));
        }
    }
    // The winner has nothing left on the table.
    remaining[winner] = 0;

    let mut totals: Vec<Points> = Vec::with_capacity(n);
    for (score, rem) in scores.iter().zip(&remaining) {
        totals.push(checked_add(*score, -*rem)?);
    }
    let absorbed = remaining
        .iter()
        .try_fold(0 as Points, |acc, &r| checked_add(acc, r))?;
    totals[winner] = checked_add(totals[winner], absorbed)?;

    let sum: i128 = totals.iter().map(|&t| t as i128).sum();
    if sum != 0 {
        error!(sum, ?totals, "Scored round is not zero-sum");
        return Err(DomainError::validation(
            ValidationKind::UnbalancedRound,
            format!("round totals sum to {sum}"),
        ));
    }

    Ok(GameResult {
        player_count: n as u32,
        players: input.players.clone(),
        winner_index: input.winner_index,
        scores: totals,
        common_points: common,
        penalties: applied,
        remaining_points: remaining,
    })
}

/// Spread a per-player map over round positions, rejecting unknown players
/// and negative amounts. Missing entries are 0.
fn aligned_amounts(
    amounts: &BTreeMap<PlayerIndex, Points>,
    positions: &HashMap<PlayerIndex, usize>,
    n: usize,
    what: &str,
) -> Result<Vec<Points>, DomainError> {
    let mut out = vec![0; n];
    for (&index, &amount) in amounts {
        let pos = lookup(positions, index, what)?;
        if amount < 0 {
            return Err(DomainError::validation(
                ValidationKind::NegativeAmount,
                format!("{what} for player {index} is negative ({amount})"),
            ));
        }
        out[pos] = amount;
    }
    Ok(out)
}

fn lookup(
    positions: &HashMap<PlayerIndex, usize>,
    index: PlayerIndex,
    what: &str,
) -> Result<usize, DomainError> {
    positions.get(&index).copied().ok_or_else(|| {
        DomainError::validation(
            ValidationKind::UnknownPlayer,
            format!("{what} references player {index} outside this round"),
        )
    })
}

fn checked_add(a: Points, b: Points) -> Result<Points, DomainError> {
    a.checked_add(b)
        .ok_or_else(|| DomainError::validation(ValidationKind::Overflow, "points overflow"))
}

fn checked_mul(a: Points, b: Points) -> Result<Points, DomainError> {
    a.checked_mul(b)
        .ok_or_else(|| DomainError::validation(ValidationKind::Overflow, "points overflow"))
}
