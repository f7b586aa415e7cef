use std::collections::BTreeMap;
use std::fmt;

use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::domain::rules::{Rules, MAX_NAME_CHARS};
use crate::domain::turn::{TurnMessage, TurnState};
use crate::errors::domain::{DomainError, NotFoundKind, ValidationKind};

pub type PlayerId = String;

/// Room lifecycle.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Phase {
    /// Lobby; players may join.
    Waiting,
    /// Turns are being taken.
    Playing,
    /// Someone hit the target exactly. Terminal until restart.
    Finished,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Player {
    pub id: PlayerId,
    pub name: String,
    pub score: u32,
}

impl Player {
    pub fn new(id: impl Into<PlayerId>, name: impl Into<String>) -> Self {
        Self {
            id: id.into(),
            name: name.into(),
            score: 0,
        }
    }
}

/// One-use token attached to a client intent.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct ActionId(pub Uuid);

impl ActionId {
    pub fn new() -> Self {
        Self(Uuid::new_v4())
    }
}

impl Default for ActionId {
    fn default() -> Self {
        Self::new()
    }
}

impl fmt::Display for ActionId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        self.0.fmt(f)
    }
}

/// How the most recent bank resolved.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum BankEvent {
    /// Nothing on the table (usually after a Farkle).
    Passed { player_id: PlayerId },
    /// First bank below the entry threshold; discarded.
    EntryNotMet {
        player_id: PlayerId,
        points: u32,
        min_entry: u32,
    },
    /// Would have passed the target; score bounced back.
    Overshot { player_id: PlayerId, points: u32 },
    Banked {
        player_id: PlayerId,
        points: u32,
        total: u32,
        bumped: Vec<PlayerId>,
    },
    Won { player_id: PlayerId, total: u32 },
}

/// Whole-room state: the single shared record every client mutates.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct RoomState {
    pub rules: Rules,
    pub host_id: PlayerId,
    /// Seating order. Ids stay here after their player leaves mid-game and
    /// are skipped when the turn advances.
    pub turn_order: Vec<PlayerId>,
    pub players: BTreeMap<PlayerId, Player>,
    pub turn_index: usize,
    pub phase: Phase,
    pub turn: TurnState,
    pub winner_id: Option<PlayerId>,
    pub last_action_id: Option<ActionId>,
    pub last_event: Option<BankEvent>,
}

impl RoomState {
    /// New lobby with the host in the first seat.
    pub fn new(host: Player, rules: Rules) -> Self {
        let host_id = host.id.clone();
        let mut players = BTreeMap::new();
        players.insert(host_id.clone(), host);
        Self {
            rules,
            host_id: host_id.clone(),
            turn_order: vec![host_id],
            players,
            turn_index: 0,
            phase: Phase::Waiting,
            turn: TurnState::fresh(Some(TurnMessage::Waiting)),
            winner_id: None,
            last_action_id: None,
            last_event: None,
        }
    }

    pub fn player(&self, id: &str) -> Option<&Player> {
        self.players.get(id)
    }

    pub fn require_player(&self, id: &str) -> Result<&Player, DomainError> {
        self.player(id).ok_or_else(|| {
            DomainError::not_found(NotFoundKind::Player, format!("player {id} is not in the room"))
        })
    }

    /// Players still seated, in turn order.
    pub fn ordered_players(&self) -> impl Iterator<Item = &Player> {
        self.turn_order.iter().filter_map(|id| self.players.get(id))
    }

    pub fn seated_count(&self) -> usize {
        self.players.len()
    }

    /// Id in the current turn slot, if that seat is still occupied.
    pub fn current_player_id(&self) -> Option<&PlayerId> {
        self.turn_order
            .get(self.turn_index)
            .filter(|id| self.players.contains_key(id.as_str()))
    }

    pub fn current_player(&self) -> Option<&Player> {
        self.current_player_id().and_then(|id| self.players.get(id))
    }

    pub fn is_host(&self, id: &str) -> bool {
        self.host_id == id
    }
}

pub fn require_phase(state: &RoomState, phase: Phase, ctx: &'static str) -> Result<(), DomainError> {
    if state.phase != phase {
        return Err(DomainError::validation(
            ValidationKind::PhaseMismatch,
            format!("{ctx}: room is {:?}, expected {phase:?}", state.phase),
        ));
    }
    Ok(())
}

/// The acting player must own the current turn of a game in progress.
pub fn require_turn<'a>(
    state: &'a RoomState,
    actor: &str,
    ctx: &'static str,
) -> Result<&'a Player, DomainError> {
    require_phase(state, Phase::Playing, ctx)?;
    state.require_player(actor)?;
    let current = state.current_player().ok_or_else(|| {
        DomainError::invariant(format!(
            "{ctx}: turn index {} has no seated player",
            state.turn_index
        ))
    })?;
    if current.id != actor {
        return Err(DomainError::validation(
            ValidationKind::OutOfTurn,
            format!("{ctx}: it is {}'s turn", current.name),
        ));
    }
    Ok(current)
}

pub fn require_host(state: &RoomState, actor: &str, ctx: &'static str) -> Result<(), DomainError> {
    state.require_player(actor)?;
    if !state.is_host(actor) {
        return Err(DomainError::validation(
            ValidationKind::NotHost,
            format!("{ctx}: only the host may do this"),
        ));
    }
    Ok(())
}

/// Trim and bound a display name.
pub fn normalize_name(raw: &str) -> Result<String, DomainError> {
    let name = raw.trim();
    let len = name.chars().count();
    if len == 0 || len > MAX_NAME_CHARS {
        return Err(DomainError::validation(
            ValidationKind::InvalidName,
            format!("name must be 1-{MAX_NAME_CHARS} characters"),
        ));
    }
    Ok(name.to_string())
}
