//! Client intents and their dispatch onto the room transitions.

use serde::{Deserialize, Serialize};

use crate::domain::room::{self, JoinOutcome, LeaveOutcome};
use crate::domain::roller::DiceRoller;
use crate::domain::state::{BankEvent, Player, RoomState};
use crate::domain::turn::RollOutcome;
use crate::errors::domain::DomainError;

/// One thing a client asks the room to do.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum Intent {
    Join { name: String },
    Start,
    Roll,
    ToggleHold { index: usize },
    Bank,
    Restart,
    Leave,
}

impl Intent {
    pub fn name(&self) -> &'static str {
        match self {
            Intent::Join { .. } => "join",
            Intent::Start => "start",
            Intent::Roll => "roll",
            Intent::ToggleHold { .. } => "toggle_hold",
            Intent::Bank => "bank",
            Intent::Restart => "restart",
            Intent::Leave => "leave",
        }
    }
}

/// What an applied intent did.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(tag = "effect", rename_all = "snake_case")]
pub enum IntentEffect {
    Joined { outcome: JoinOutcome },
    Started,
    Rolled(RollOutcome),
    Toggled { index: usize },
    Banked(BankEvent),
    Restarted,
    Left { outcome: LeaveOutcome },
}

/// Apply `intent` for `actor` to `state`.
///
/// On error `state` may be partially modified; callers work on a copy.
pub fn apply_intent(
    state: &mut RoomState,
    actor: &str,
    intent: &Intent,
    roller: &mut dyn DiceRoller,
) -> Result<IntentEffect, DomainError> {
    match intent {
        Intent::Join { name } => {
            let outcome = room::join(state, Player::new(actor, name.as_str()))?;
            Ok(IntentEffect::Joined { outcome })
        }
        Intent::Start => {
            room::start_game(state, actor)?;
            Ok(IntentEffect::Started)
        }
        Intent::Roll => room::roll(state, actor, roller).map(IntentEffect::Rolled),
        Intent::ToggleHold { index } => {
            room::toggle_hold(state, actor, *index)?;
            Ok(IntentEffect::Toggled { index: *index })
        }
        Intent::Bank => room::bank(state, actor).map(IntentEffect::Banked),
        Intent::Restart => {
            room::restart(state, actor)?;
            Ok(IntentEffect::Restarted)
        }
        Intent::Leave => {
            room::leave(state, actor).map(|outcome| IntentEffect::Left { outcome })
        }
    }
}
