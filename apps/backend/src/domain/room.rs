//! Room-level transitions: lobby, banking, turn rotation and restart.
//!
//! Every function validates before it mutates, except where a later
//! invariant check can still fail (turn advance). Callers that must not
//! observe a half-applied transition run these against a working copy,
//! which is what the sync layer and the local adapter both do.

use serde::Serialize;
use tracing::error;

use crate::domain::roller::DiceRoller;
use crate::domain::rules::Rules;
use crate::domain::state::{
    normalize_name, require_host, require_phase, require_turn, BankEvent, Phase, Player, RoomState,
};
use crate::domain::turn::{RollOutcome, TurnMessage, TurnState};
use crate::errors::domain::{DomainError, ValidationKind};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum JoinOutcome {
    Seated,
    AlreadySeated,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum LeaveOutcome {
    Left,
    /// Last player gone; the room should be discarded.
    RoomEmpty,
}

/// Seat a player in the lobby. Re-joining with a seated id is a no-op.
pub fn join(state: &mut RoomState, mut player: Player) -> Result<JoinOutcome, DomainError> {
    if state.players.contains_key(&player.id) {
        return Ok(JoinOutcome::AlreadySeated);
    }
    require_phase(state, Phase::Waiting, "join")?;
    if state.seated_count() >= state.rules.max_players {
        return Err(DomainError::validation(
            ValidationKind::RoomFull,
            format!("room already has {} players", state.seated_count()),
        ));
    }
    player.name = normalize_name(&player.name)?;
    player.score = 0;
    state.turn_order.push(player.id.clone());
    state.players.insert(player.id.clone(), player);
    Ok(JoinOutcome::Seated)
}

/// Host moves the lobby into play; the first seat takes the first turn.
pub fn start_game(state: &mut RoomState, actor: &str) -> Result<(), DomainError> {
    require_host(state, actor, "start")?;
    require_phase(state, Phase::Waiting, "start")?;
    let first = state
        .turn_order
        .iter()
        .position(|id| state.players.contains_key(id))
        .ok_or_else(|| DomainError::invariant("start: lobby has no seated players"))?;

    state.phase = Phase::Playing;
    state.turn_index = first;
    state.winner_id = None;
    state.last_event = None;
    reset_turn_for_current(state)
}

/// Build an already-started room for the single-process shell.
///
/// Players get ids `p-0`, `p-1`, ... and the first one hosts.
pub fn start_local(names: &[String], rules: Rules) -> Result<RoomState, DomainError> {
    if names.is_empty() || names.len() > rules.max_players {
        return Err(DomainError::validation(
            ValidationKind::Other("PLAYER_COUNT".into()),
            format!("need 1-{} players, got {}", rules.max_players, names.len()),
        ));
    }
    let host = Player::new("p-0", normalize_name(&names[0])?);
    let mut state = RoomState::new(host, rules);
    for (i, name) in names.iter().enumerate().skip(1) {
        join(&mut state, Player::new(format!("p-{i}"), name.as_str()))?;
    }
    start_game(&mut state, "p-0")?;
    Ok(state)
}

/// Current player rolls the free dice.
pub fn roll(
    state: &mut RoomState,
    actor: &str,
    roller: &mut dyn DiceRoller,
) -> Result<RollOutcome, DomainError> {
    require_turn(state, actor, "roll")?;
    state.turn.roll(roller)
}

/// Current player keeps or releases one of this roll's scoring dice.
pub fn toggle_hold(state: &mut RoomState, actor: &str, index: usize) -> Result<(), DomainError> {
    require_turn(state, actor, "hold")?;
    state.turn.toggle_hold(index)
}

/// Bank the table points (or pass after a bust) and end the turn.
///
/// Entry, overshoot, exact-win and bump rules are applied here. A win
/// finishes the room without advancing the turn.
pub fn bank(state: &mut RoomState, actor: &str) -> Result<BankEvent, DomainError> {
    let current = require_turn(state, actor, "bank")?.clone();
    state.turn.check_invariants()?;

    let rules = state.rules;
    if current.score > rules.target_score {
        return Err(DomainError::invariant(format!(
            "player {} has {} points, above the {} target",
            current.id, current.score, rules.target_score
        )));
    }

    let points = state.turn.points_on_table();
    let player_id = current.id.clone();

    let event = if points == 0 {
        BankEvent::Passed { player_id }
    } else if current.score == 0 && points < rules.min_entry {
        BankEvent::EntryNotMet {
            player_id,
            points,
            min_entry: rules.min_entry,
        }
    } else {
        let total = current.score + points;
        if total > rules.target_score {
            BankEvent::Overshot { player_id, points }
        } else if total == rules.target_score {
            set_score(state, &player_id, total)?;
            state.phase = Phase::Finished;
            state.winner_id = Some(player_id.clone());
            state.turn.message = Some(TurnMessage::Winner {
                name: current.name.clone(),
            });
            let event = BankEvent::Won { player_id, total };
            state.last_event = Some(event.clone());
            return Ok(event);
        } else {
            set_score(state, &player_id, total)?;
            let mut bumped = Vec::new();
            for other in state.players.values_mut() {
                if other.id != player_id && other.score == total {
                    other.score = 0;
                    bumped.push(other.id.clone());
                }
            }
            BankEvent::Banked {
                player_id,
                points,
                total,
                bumped,
            }
        }
    };

    state.last_event = Some(event.clone());
    advance_turn(state)?;
    Ok(event)
}

/// Pass the dice to the next seated player, wrapping, with a fresh turn.
pub fn advance_turn(state: &mut RoomState) -> Result<(), DomainError> {
    let len = state.turn_order.len();
    let mut idx = state.turn_index;
    for _ in 0..len {
        idx = (idx + 1) % len;
        if state.players.contains_key(&state.turn_order[idx]) {
            state.turn_index = idx;
            return reset_turn_for_current(state);
        }
    }
    error!(
        turn_index = state.turn_index,
        seats = len,
        "advance_turn found no seated player"
    );
    Err(DomainError::invariant(
        "advance_turn: no seated player after a full wrap",
    ))
}

/// Host resets a finished game back to the lobby with zeroed scores.
pub fn restart(state: &mut RoomState, actor: &str) -> Result<(), DomainError> {
    require_host(state, actor, "restart")?;
    require_phase(state, Phase::Finished, "restart")?;

    for p in state.players.values_mut() {
        p.score = 0;
    }
    let players = &state.players;
    state.turn_order.retain(|id| players.contains_key(id));
    state.phase = Phase::Waiting;
    state.winner_id = None;
    state.last_event = None;
    state.turn_index = 0;
    state.turn = TurnState::fresh(Some(TurnMessage::Waiting));
    Ok(())
}

/// Remove a player.
///
/// Outside play the seat disappears; during play the id stays in the turn
/// order and is skipped. The host role passes to the next seated player.
pub fn leave(state: &mut RoomState, actor: &str) -> Result<LeaveOutcome, DomainError> {
    state.require_player(actor)?;
    let was_current =
        state.phase == Phase::Playing && state.current_player_id().map(String::as_str) == Some(actor);

    state.players.remove(actor);
    if state.phase != Phase::Playing {
        state.turn_order.retain(|id| id != actor);
        state.turn_index = 0;
    }

    if state.players.is_empty() {
        return Ok(LeaveOutcome::RoomEmpty);
    }

    if state.host_id == actor {
        let next_host = state.ordered_players().next().map(|p| p.id.clone());
        if let Some(id) = next_host {
            state.host_id = id;
        }
    }

    if was_current {
        advance_turn(state)?;
    }
    Ok(LeaveOutcome::Left)
}

fn set_score(state: &mut RoomState, id: &str, total: u32) -> Result<(), DomainError> {
    let player = state
        .players
        .get_mut(id)
        .ok_or_else(|| DomainError::invariant(format!("current player {id} vanished")))?;
    player.score = total;
    Ok(())
}

fn reset_turn_for_current(state: &mut RoomState) -> Result<(), DomainError> {
    let name = state
        .current_player()
        .map(|p| p.name.clone())
        .ok_or_else(|| {
            DomainError::invariant(format!(
                "turn index {} has no seated player",
                state.turn_index
            ))
        })?;
    state.turn = TurnState::fresh(Some(TurnMessage::TurnStart { name }));
    Ok(())
}
