//! Property-based tests for the scoring engine and the turn/room machines.
//!
//! Increase cases locally with `PROPTEST_CASES=1000`.

use proptest::prelude::*;

use crate::domain::dice::Face;
use crate::domain::room::{bank, roll, start_local};
use crate::domain::roller::ScriptedRoller;
use crate::domain::rules::Rules;
use crate::domain::scoring::{score_dice, score_subset};
use crate::domain::state::Phase;
use crate::domain::turn::{TurnMessage, TurnState, TurnStatus};
use crate::domain::{test_gens, test_prelude};

proptest! {
    #![proptest_config(test_prelude::proptest_config())]

    /// Contributing dice are unheld, ascending and unique; points appear
    /// exactly when some die contributes.
    #[test]
    fn prop_scoring_indices_are_well_formed(dice in test_gens::dice_with_holds()) {
        let got = score_dice(&dice);
        prop_assert!(got.scoring.windows(2).all(|w| w[0] < w[1]));
        for &i in &got.scoring {
            prop_assert!(!dice.dice()[i].held, "held die {} marked scoring", i);
        }
        prop_assert_eq!(got.points == 0, got.scoring.is_empty());
        prop_assert_eq!(got.points % 50, 0);
    }

    /// The contributing dice on their own reproduce the same score.
    #[test]
    fn prop_scoring_dice_alone_reproduce_the_score(dice in test_gens::active_dice()) {
        let full = score_dice(&dice);
        let alone = score_subset(&dice, &full.scoring);
        prop_assert_eq!(alone, full);
    }

    /// Every A or K among active dice contributes.
    #[test]
    fn prop_aces_and_kings_always_score(dice in test_gens::dice_with_holds()) {
        let got = score_dice(&dice);
        for (i, d) in dice.dice().iter().enumerate() {
            if !d.held && matches!(d.face, Face::Ace | Face::King) {
                prop_assert!(got.scoring.contains(&i));
            }
        }
    }

    /// Rolling until a bust keeps the counters consistent and the table
    /// total monotone until it is wiped.
    #[test]
    fn prop_turn_counters_stay_consistent(script in test_gens::face_script(40)) {
        let mut turn = TurnState::fresh(None);
        let mut roller = ScriptedRoller::new(script);
        let mut last_table = 0;

        for _ in 0..8 {
            let out = turn.roll(&mut roller).unwrap();
            prop_assert!(turn.check_invariants().is_ok());
            prop_assert_eq!(turn.dice.dice().len(), 5);
            if out.busted {
                prop_assert_eq!(turn.points_on_table(), 0);
                prop_assert_eq!(turn.status(), TurnStatus::Busted);
                prop_assert_eq!(turn.message.clone(), Some(TurnMessage::Farkle));
                break;
            }
            prop_assert!(turn.points_on_table() > last_table);
            prop_assert_eq!(
                out.hot_dice,
                turn.dice.held_count() + out.scoring.len() == 5
            );
            last_table = turn.points_on_table();
        }
    }

    /// Whatever the dice do, scores stay within the target and a playing
    /// room always has a seated current player.
    #[test]
    fn prop_room_scores_stay_in_bounds(
        script in test_gens::face_script(200),
        plan in prop::collection::vec(0u8..3, 1..60),
    ) {
        let names = vec!["Ann".to_string(), "Bob".to_string(), "Cy".to_string()];
        let rules = Rules::default().with_target(1500);
        let mut state = start_local(&names, rules).unwrap();
        let mut roller = ScriptedRoller::new(script);

        for step in plan {
            if state.phase != Phase::Playing {
                break;
            }
            let actor = state.current_player_id().cloned().unwrap();
            let busted = state.turn.status() == TurnStatus::Busted;
            if step == 0 || busted {
                bank(&mut state, &actor).unwrap();
            } else {
                roll(&mut state, &actor, &mut roller).unwrap();
            }
            for p in state.players.values() {
                prop_assert!(p.score <= rules.target_score);
            }
            if state.phase == Phase::Playing {
                prop_assert!(state.current_player().is_some());
            } else {
                let winner = state.winner_id.clone().unwrap();
                prop_assert_eq!(state.player(&winner).unwrap().score, 1500);
            }
        }
    }
}
