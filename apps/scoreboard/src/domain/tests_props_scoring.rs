//! Property-based tests for the round scorer.

use proptest::prelude::*;

use crate::domain::{score_round, test_gens, test_prelude};

proptest! {
    #![proptest_config(test_prelude::proptest_config())]

    /// Property: every accepted round is zero-sum.
    #[test]
    fn prop_scored_round_is_zero_sum(input in test_gens::round_input()) {
        let result = score_round(&input).expect("generated input is valid");
        prop_assert_eq!(result.score_sum(), 0);
        prop_assert_eq!(result.scores.len(), input.players.len());
        prop_assert_eq!(result.player_count as usize, input.players.len());
    }

    /// Property: the winner never loses remaining points and collects all of them.
    #[test]
    fn prop_winner_collects_remaining(input in test_gens::round_input()) {
        let result = score_round(&input).expect("generated input is valid");
        let winner = result.position_of(input.winner_index).expect("winner in round");
        prop_assert_eq!(result.remaining_points[winner], 0);

        // Without common points and penalties, the winner's score is exactly the pot.
        let mut bare = input.clone();
        bare.common_points.clear();
        bare.penalties.clear();
        let bare_result = score_round(&bare).expect("bare input is valid");
        let pot: i64 = bare_result.remaining_points.iter().sum();
        prop_assert_eq!(bare_result.scores[winner], pot);
    }

    /// Property: only effective penalties are kept.
    #[test]
    fn prop_only_effective_penalties_stored(input in test_gens::round_input()) {
        let result = score_round(&input).expect("generated input is valid");
        let expected = input.penalties.iter().filter(|p| p.is_effective()).count();
        prop_assert_eq!(result.penalties.len(), expected);
    }
}
