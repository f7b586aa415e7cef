//! Public snapshot API for observing a room without reaching into its fields.
//!
//! Adds the derived values a renderer needs (turn status, current player,
//! points on the table) next to the raw dice and scores.

use serde::Serialize;

use crate::domain::dice::DiceSet;
use crate::domain::rules::Rules;
use crate::domain::state::{BankEvent, Phase, PlayerId, RoomState};
use crate::domain::turn::{TurnMessage, TurnStatus};

#[derive(Clone, Debug, PartialEq, Serialize)]
pub struct PlayerPublic {
    pub id: PlayerId,
    pub name: String,
    pub score: u32,
    pub is_host: bool,
    pub is_current: bool,
}

#[derive(Clone, Debug, PartialEq, Serialize)]
pub struct TurnPublic {
    pub dice: DiceSet,
    pub status: TurnStatus,
    pub turn_accumulated: u32,
    pub current_roll: u32,
    pub points_on_table: u32,
    pub roll_count: u32,
    pub message: Option<TurnMessage>,
    /// Rendered form of `message`.
    pub message_text: Option<String>,
}

#[derive(Clone, Debug, PartialEq, Serialize)]
pub struct RoomSnapshot {
    pub phase: Phase,
    pub rules: Rules,
    pub host_id: PlayerId,
    /// Seated players in turn order.
    pub players: Vec<PlayerPublic>,
    pub current_player_id: Option<PlayerId>,
    pub turn: TurnPublic,
    pub winner_id: Option<PlayerId>,
    pub last_event: Option<BankEvent>,
}

pub fn snapshot(state: &RoomState) -> RoomSnapshot {
    let current = match state.phase {
        Phase::Playing => state.current_player_id().cloned(),
        _ => None,
    };

    let players = state
        .ordered_players()
        .map(|p| PlayerPublic {
            id: p.id.clone(),
            name: p.name.clone(),
            score: p.score,
            is_host: state.is_host(&p.id),
            is_current: current.as_deref() == Some(p.id.as_str()),
        })
        .collect();

    let turn = &state.turn;
    RoomSnapshot {
        phase: state.phase,
        rules: state.rules,
        host_id: state.host_id.clone(),
        players,
        current_player_id: current,
        turn: TurnPublic {
            dice: turn.dice,
            status: turn.status(),
            turn_accumulated: turn.turn_accumulated,
            current_roll: turn.current_roll,
            points_on_table: turn.points_on_table(),
            roll_count: turn.roll_count,
            message: turn.message.clone(),
            message_text: turn.message.as_ref().map(ToString::to_string),
        },
        winner_id: state.winner_id.clone(),
        last_event: state.last_event.clone(),
    }
}
