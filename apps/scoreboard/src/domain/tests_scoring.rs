use crate::domain::round::{Penalty, RoundInput};
use crate::domain::scoring::score_round;
use crate::domain::test_state_helpers::make_players;
use crate::errors::domain::{DomainError, ValidationKind};

fn abc() -> Vec<crate::domain::Player> {
    make_players(&["A", "B", "C"])
}

fn validation_kind(err: DomainError) -> ValidationKind {
    match err {
        DomainError::Validation(kind, _) => kind,
        other => panic!("expected validation error, got {other:?}"),
    }
}

#[test]
fn common_points_are_captured_from_every_other_player() {
    // n=3, A contributes 5: A gains 5*(3-1)=10, B and C lose 5 each
    let input = RoundInput::new(&abc(), 0)
        .with_common(0, 5)
        .with_remaining(1, 0)
        .with_remaining(2, 0);
    let result = score_round(&input).unwrap();
    assert_eq!(result.scores, vec![10, -5, -5]);
    assert_eq!(result.common_points, vec![5, 0, 0]);
    assert_eq!(result.player_count, 3);
}

#[test]
fn penalty_scales_by_other_player_count() {
    // B pays A 3, n=3: B -6, A +6
    let input = RoundInput::new(&abc(), 0)
        .with_penalty(1, 0, 3)
        .with_remaining(1, 0)
        .with_remaining(2, 0);
    let result = score_round(&input).unwrap();
    assert_eq!(result.scores, vec![6, -6, 0]);
    assert_eq!(result.penalties, vec![Penalty::new(1, 0, 3)]);
}

#[test]
fn winner_absorbs_remaining_points() {
    let input = RoundInput::new(&abc(), 0)
        .with_remaining(1, 4)
        .with_remaining(2, 2);
    let result = score_round(&input).unwrap();
    assert_eq!(result.scores, vec![6, -4, -2]);
    assert_eq!(result.remaining_points, vec![0, 4, 2]);
}

#[test]
fn all_components_combine_zero_sum() {
    // common: C contributes 2 -> A -2, B -2, C +4
    // penalty: A pays B 1 -> A -2, B +2
    // remaining: A 3 (winner B) -> A -3, B +3
    let input = RoundInput::new(&abc(), 1)
        .with_common(2, 2)
        .with_penalty(0, 1, 1)
        .with_remaining(0, 3)
        .with_remaining(2, 0);
    let result = score_round(&input).unwrap();
    assert_eq!(result.scores, vec![-7, 3, 4]);
    assert_eq!(result.scores.iter().sum::<i64>(), 0);
}

#[test]
fn penalties_to_same_receiver_accumulate() {
    let players = make_players(&["A", "B", "C", "D"]);
    let input = RoundInput::new(&players, 0)
        .with_penalty(1, 3, 2)
        .with_penalty(2, 3, 1)
        .with_remaining(1, 0)
        .with_remaining(2, 0)
        .with_remaining(3, 0);
    let result = score_round(&input).unwrap();
    // factor n-1 = 3
    assert_eq!(result.scores, vec![0, -6, -3, 9]);
}

#[test]
fn ineffective_penalties_are_skipped_not_rejected() {
    let input = RoundInput::new(&abc(), 0)
        .with_penalty(1, 1, 5) // self-targeted
        .with_penalty(2, 0, 0) // zero
        .with_penalty(2, 0, -4) // negative
        .with_remaining(1, 1)
        .with_remaining(2, 0);
    let result = score_round(&input).unwrap();
    assert_eq!(result.scores, vec![1, -1, 0]);
    assert!(result.penalties.is_empty());
}

#[test]
fn winner_remaining_entry_is_forced_to_zero() {
    let input = RoundInput::new(&abc(), 0)
        .with_remaining(0, 9)
        .with_remaining(1, 4)
        .with_remaining(2, 2);
    let result = score_round(&input).unwrap();
    assert_eq!(result.remaining_points, vec![0, 4, 2]);
    assert_eq!(result.scores, vec![6, -4, -2]);
}

#[test]
fn single_player_round_is_rejected() {
    let players = make_players(&["A"]);
    let input = RoundInput::new(&players, 0).with_common(0, 5);
    let err = score_round(&input).unwrap_err();
    assert_eq!(validation_kind(err), ValidationKind::TooFewPlayers);

    let empty = RoundInput::default();
    let err = score_round(&empty).unwrap_err();
    assert_eq!(validation_kind(err), ValidationKind::TooFewPlayers);
}

#[test]
fn winner_must_be_in_round() {
    let input = RoundInput::new(&abc(), 7)
        .with_remaining(0, 0)
        .with_remaining(1, 0)
        .with_remaining(2, 0);
    let err = score_round(&input).unwrap_err();
    assert_eq!(validation_kind(err), ValidationKind::InvalidWinner);
}

#[test]
fn non_winner_needs_remaining_points() {
    let input = RoundInput::new(&abc(), 0).with_remaining(1, 3);
    let err = score_round(&input).unwrap_err();
    assert_eq!(validation_kind(err), ValidationKind::MissingRemainingPoints);
}

#[test]
fn negative_amounts_are_rejected() {
    let input = RoundInput::new(&abc(), 0)
        .with_common(1, -2)
        .with_remaining(1, 0)
        .with_remaining(2, 0);
    assert_eq!(
        validation_kind(score_round(&input).unwrap_err()),
        ValidationKind::NegativeAmount
    );

    let input = RoundInput::new(&abc(), 0)
        .with_remaining(1, -1)
        .with_remaining(2, 0);
    assert_eq!(
        validation_kind(score_round(&input).unwrap_err()),
        ValidationKind::NegativeAmount
    );
}

#[test]
fn references_outside_round_are_rejected() {
    let input = RoundInput::new(&abc(), 0)
        .with_common(9, 1)
        .with_remaining(1, 0)
        .with_remaining(2, 0);
    assert_eq!(
        validation_kind(score_round(&input).unwrap_err()),
        ValidationKind::UnknownPlayer
    );

    let input = RoundInput::new(&abc(), 0)
        .with_penalty(1, 9, 2)
        .with_remaining(1, 0)
        .with_remaining(2, 0);
    assert_eq!(
        validation_kind(score_round(&input).unwrap_err()),
        ValidationKind::UnknownPlayer
    );
}

#[test]
fn duplicate_players_are_rejected() {
    let mut players = abc();
    players.push(players[1].clone());
    let input = RoundInput::new(&players, 0)
        .with_remaining(1, 0)
        .with_remaining(2, 0);
    assert_eq!(
        validation_kind(score_round(&input).unwrap_err()),
        ValidationKind::DuplicatePlayer
    );
}

#[test]
fn overflow_is_reported() {
    let input = RoundInput::new(&abc(), 0)
        .with_common(1, i64::MAX)
        .with_remaining(1, 0)
        .with_remaining(2, 0);
    assert_eq!(
        validation_kind(score_round(&input).unwrap_err()),
        ValidationKind::Overflow
    );
}

#[test]
fn round_keeps_snapshot_of_its_players() {
    let input = RoundInput::new(&abc(), 2)
        .with_remaining(0, 1)
        .with_remaining(1, 1);
    let result = score_round(&input).unwrap();
    let names: Vec<&str> = result.players.iter().map(|p| p.name.as_str()).collect();
    assert_eq!(names, ["A", "B", "C"]);
    assert_eq!(result.winner_index, 2);
    assert_eq!(result.score_of(2), Some(2));
}
