use crate::domain::room::{
    advance_turn, bank, join, leave, restart, roll, start_game, start_local, toggle_hold,
    JoinOutcome, LeaveOutcome,
};
use crate::domain::roller::ScriptedRoller;
use crate::domain::rules::Rules;
use crate::domain::snapshot::snapshot;
use crate::domain::state::{BankEvent, Phase, Player, RoomState};
use crate::domain::turn::{TurnMessage, TurnStatus};
use crate::errors::domain::{DomainError, NotFoundKind, ValidationKind};

fn names(list: &[&str]) -> Vec<String> {
    list.iter().map(|s| s.to_string()).collect()
}

fn room(list: &[&str]) -> RoomState {
    start_local(&names(list), Rules::default()).expect("local room starts")
}

fn room_with(list: &[&str], rules: Rules) -> RoomState {
    start_local(&names(list), rules).expect("local room starts")
}

/// Put points on the table for the current player as if they had rolled.
fn table(state: &mut RoomState, accumulated: u32, current: u32) {
    state.turn.roll_count = 2;
    state.turn.turn_accumulated = accumulated;
    state.turn.current_roll = current;
}

fn score(state: &RoomState, id: &str) -> u32 {
    state.player(id).unwrap().score
}

fn current(state: &RoomState) -> &str {
    state.current_player_id().unwrap().as_str()
}

#[test]
fn local_room_starts_with_first_seat() {
    let state = room(&["Ann", "Bob"]);
    assert_eq!(state.phase, Phase::Playing);
    assert_eq!(current(&state), "p-0");
    assert_eq!(state.host_id, "p-0");
    assert_eq!(
        state.turn.message,
        Some(TurnMessage::TurnStart { name: "Ann".into() })
    );
    assert_eq!(state.turn.status(), TurnStatus::Fresh);
}

#[test]
fn bank_with_nothing_on_the_table_just_passes() {
    let mut state = room(&["Ann", "Bob"]);
    let event = bank(&mut state, "p-0").unwrap();

    assert_eq!(event, BankEvent::Passed { player_id: "p-0".into() });
    assert_eq!(score(&state, "p-0"), 0);
    assert_eq!(current(&state), "p-1");
    assert_eq!(
        state.turn.message,
        Some(TurnMessage::TurnStart { name: "Bob".into() })
    );
}

#[test]
fn bank_after_a_bust_is_the_pass() {
    let mut state = room(&["Ann", "Bob"]);
    roll(&mut state, "p-0", &mut ScriptedRoller::parse("67JQQ")).unwrap();
    assert_eq!(state.turn.status(), TurnStatus::Busted);

    let event = bank(&mut state, "p-0").unwrap();
    assert!(matches!(event, BankEvent::Passed { .. }));
    assert_eq!(current(&state), "p-1");
}

#[test]
fn rolled_points_bank_and_turn_wraps() {
    let mut state = room(&["Ann", "Bob"]);
    roll(&mut state, "p-0", &mut ScriptedRoller::parse("KKK67")).unwrap();
    bank(&mut state, "p-0").unwrap();
    assert_eq!(score(&state, "p-0"), 500);

    bank(&mut state, "p-1").unwrap();
    assert_eq!(current(&state), "p-0", "turn wraps back to the first seat");
}

#[test]
fn out_of_turn_and_unknown_actors_are_rejected() {
    let mut state = room(&["Ann", "Bob"]);
    let mut roller = ScriptedRoller::parse("AAAAA");

    assert!(matches!(
        roll(&mut state, "p-1", &mut roller),
        Err(DomainError::Validation(ValidationKind::OutOfTurn, _))
    ));
    assert!(matches!(
        bank(&mut state, "p-1"),
        Err(DomainError::Validation(ValidationKind::OutOfTurn, _))
    ));
    assert!(matches!(
        toggle_hold(&mut state, "p-1", 0),
        Err(DomainError::Validation(ValidationKind::OutOfTurn, _))
    ));
    assert!(matches!(
        roll(&mut state, "ghost", &mut roller),
        Err(DomainError::NotFound(NotFoundKind::Player, _))
    ));
    assert_eq!(roller.draws(), 0);
}

#[test]
fn overshoot_keeps_the_score_and_passes_the_turn() {
    let mut state = room(&["Ann", "Bob"]);
    state.players.get_mut("p-0").unwrap().score = 4800;
    roll(&mut state, "p-0", &mut ScriptedRoller::parse("JJJ67")).unwrap();

    let event = bank(&mut state, "p-0").unwrap();

    assert_eq!(
        event,
        BankEvent::Overshot {
            player_id: "p-0".into(),
            points: 300
        }
    );
    assert_eq!(score(&state, "p-0"), 4800);
    assert_eq!(current(&state), "p-1");
    assert_eq!(state.phase, Phase::Playing);
}

#[test]
fn exact_target_wins_without_advancing() {
    let mut state = room(&["Ann", "Bob"]);
    state.players.get_mut("p-0").unwrap().score = 2000;
    state.players.get_mut("p-1").unwrap().score = 5000 - 3000;
    table(&mut state, 2000, 1000);

    let event = bank(&mut state, "p-0").unwrap();

    assert_eq!(
        event,
        BankEvent::Won {
            player_id: "p-0".into(),
            total: 5000
        }
    );
    assert_eq!(state.phase, Phase::Finished);
    assert_eq!(state.winner_id.as_deref(), Some("p-0"));
    assert_eq!(current(&state), "p-0");
    assert_eq!(score(&state, "p-1"), 2000, "a win never bumps");
    assert_eq!(
        state.turn.message.as_ref().unwrap().to_string(),
        "Ann Wins!"
    );

    assert!(matches!(
        roll(&mut state, "p-0", &mut ScriptedRoller::parse("AAAAA")),
        Err(DomainError::Validation(ValidationKind::PhaseMismatch, _))
    ));
}

#[test]
fn matching_a_total_bumps_every_match() {
    let mut state = room(&["Ann", "Bob", "Cy"]);
    state.players.get_mut("p-0").unwrap().score = 500;
    state.players.get_mut("p-1").unwrap().score = 1000;
    state.players.get_mut("p-2").unwrap().score = 1000;
    roll(&mut state, "p-0", &mut ScriptedRoller::parse("KKK67")).unwrap();

    let event = bank(&mut state, "p-0").unwrap();

    match event {
        BankEvent::Banked { total, bumped, .. } => {
            assert_eq!(total, 1000);
            assert_eq!(bumped, vec!["p-1".to_string(), "p-2".to_string()]);
        }
        other => panic!("expected Banked, got {other:?}"),
    }
    assert_eq!(score(&state, "p-0"), 1000);
    assert_eq!(score(&state, "p-1"), 0);
    assert_eq!(score(&state, "p-2"), 0);
}

#[test]
fn entry_threshold_discards_small_first_banks() {
    let rules = Rules::default().with_min_entry(600);
    let mut state = room_with(&["Ann", "Bob"], rules);
    table(&mut state, 400, 100);

    let event = bank(&mut state, "p-0").unwrap();

    assert!(matches!(event, BankEvent::EntryNotMet { points: 500, .. }));
    assert_eq!(score(&state, "p-0"), 0);
    assert_eq!(current(&state), "p-1");
}

#[test]
fn entry_threshold_exactly_met_counts() {
    let rules = Rules::default().with_min_entry(600);
    let mut state = room_with(&["Ann", "Bob"], rules);
    table(&mut state, 500, 100);

    bank(&mut state, "p-0").unwrap();
    assert_eq!(score(&state, "p-0"), 600);
}

#[test]
fn entry_threshold_ignored_once_on_the_board() {
    let rules = Rules::default().with_min_entry(600);
    let mut state = room_with(&["Ann", "Bob"], rules);
    state.players.get_mut("p-0").unwrap().score = 100;
    table(&mut state, 0, 50);

    bank(&mut state, "p-0").unwrap();
    assert_eq!(score(&state, "p-0"), 150);
}

#[test]
fn join_rules() {
    let mut state = RoomState::new(Player::new("h", "Host"), Rules::default());
    assert_eq!(
        join(&mut state, Player::new("a", "  Ann  ")).unwrap(),
        JoinOutcome::Seated
    );
    assert_eq!(state.player("a").unwrap().name, "Ann");
    assert_eq!(
        join(&mut state, Player::new("a", "Ann again")).unwrap(),
        JoinOutcome::AlreadySeated
    );
    assert!(matches!(
        join(&mut state, Player::new("b", "   ")),
        Err(DomainError::Validation(ValidationKind::InvalidName, _))
    ));

    for i in 0..4 {
        join(&mut state, Player::new(format!("x{i}"), "X")).unwrap();
    }
    assert_eq!(state.seated_count(), 6);
    assert!(matches!(
        join(&mut state, Player::new("late", "Late")),
        Err(DomainError::Validation(ValidationKind::RoomFull, _))
    ));
}

#[test]
fn join_after_start_is_rejected() {
    let mut state = room(&["Ann"]);
    assert!(matches!(
        join(&mut state, Player::new("b", "Bob")),
        Err(DomainError::Validation(ValidationKind::PhaseMismatch, _))
    ));
}

#[test]
fn only_the_host_starts_once() {
    let mut state = RoomState::new(Player::new("h", "Host"), Rules::default());
    join(&mut state, Player::new("a", "Ann")).unwrap();

    assert!(matches!(
        start_game(&mut state, "a"),
        Err(DomainError::Validation(ValidationKind::NotHost, _))
    ));
    start_game(&mut state, "h").unwrap();
    assert_eq!(current(&state), "h");
    assert!(matches!(
        start_game(&mut state, "h"),
        Err(DomainError::Validation(ValidationKind::PhaseMismatch, _))
    ));
}

#[test]
fn advance_skips_players_who_left() {
    let mut state = room(&["Ann", "Bob", "Cy"]);
    assert_eq!(leave(&mut state, "p-1").unwrap(), LeaveOutcome::Left);
    assert_eq!(state.turn_order.len(), 3, "seat kept during play");

    bank(&mut state, "p-0").unwrap();
    assert_eq!(current(&state), "p-2");
    bank(&mut state, "p-2").unwrap();
    assert_eq!(current(&state), "p-0");
}

#[test]
fn leaving_on_your_turn_passes_the_dice() {
    let mut state = room(&["Ann", "Bob", "Cy"]);
    roll(&mut state, "p-0", &mut ScriptedRoller::parse("AK676")).unwrap();

    leave(&mut state, "p-0").unwrap();

    assert_eq!(current(&state), "p-1");
    assert_eq!(state.turn.status(), TurnStatus::Fresh);
    assert_eq!(state.host_id, "p-1", "host role handed to the next seat");
}

#[test]
fn leaving_the_lobby_removes_the_seat_and_last_one_empties() {
    let mut state = RoomState::new(Player::new("h", "Host"), Rules::default());
    join(&mut state, Player::new("a", "Ann")).unwrap();

    assert_eq!(leave(&mut state, "h").unwrap(), LeaveOutcome::Left);
    assert_eq!(state.turn_order, vec!["a".to_string()]);
    assert_eq!(state.host_id, "a");

    assert_eq!(leave(&mut state, "a").unwrap(), LeaveOutcome::RoomEmpty);
    assert!(matches!(
        leave(&mut state, "a"),
        Err(DomainError::NotFound(NotFoundKind::Player, _))
    ));
}

#[test]
fn advance_with_nobody_seated_is_an_invariant_violation() {
    let mut state = room(&["Ann", "Bob"]);
    state.players.clear();
    assert!(matches!(advance_turn(&mut state), Err(DomainError::Invariant(_))));
}

#[test]
fn restart_resets_a_finished_room() {
    let mut state = room(&["Ann", "Bob", "Cy"]);
    leave(&mut state, "p-1").unwrap();
    table(&mut state, 0, 5000);
    bank(&mut state, "p-0").unwrap();
    assert_eq!(state.phase, Phase::Finished);

    assert!(matches!(
        restart(&mut state, "p-2"),
        Err(DomainError::Validation(ValidationKind::NotHost, _))
    ));
    restart(&mut state, "p-0").unwrap();

    assert_eq!(state.phase, Phase::Waiting);
    assert_eq!(state.winner_id, None);
    assert_eq!(state.turn_order, vec!["p-0".to_string(), "p-2".to_string()]);
    assert!(state.players.values().all(|p| p.score == 0));
    assert_eq!(state.turn.message, Some(TurnMessage::Waiting));

    assert!(matches!(
        restart(&mut state, "p-0"),
        Err(DomainError::Validation(ValidationKind::PhaseMismatch, _))
    ));
}

#[test]
fn snapshot_exposes_derived_turn_values() {
    let mut state = room(&["Ann", "Bob"]);
    roll(&mut state, "p-0", &mut ScriptedRoller::parse("AK676")).unwrap();

    let snap = snapshot(&state);

    assert_eq!(snap.current_player_id.as_deref(), Some("p-0"));
    assert_eq!(snap.turn.status, TurnStatus::Active);
    assert_eq!(snap.turn.points_on_table, 150);
    assert_eq!(snap.turn.message_text.as_deref(), Some("Roll or Bank"));
    assert!(snap.players[0].is_current && snap.players[0].is_host);
    assert!(!snap.players[1].is_current);
}
