//! Single-process adapter: the same transitions the server runs, applied
//! straight to an in-memory room with the current player as the actor.

use crate::domain::roller::DiceRoller;
use crate::domain::room::start_local;
use crate::domain::rules::Rules;
use crate::domain::snapshot::{snapshot, RoomSnapshot};
use crate::domain::state::{Phase, RoomState};
use crate::errors::domain::{DomainError, ValidationKind};
use crate::sync::{apply_intent, Intent, IntentEffect};

pub struct LocalGame<R: DiceRoller> {
    state: RoomState,
    roller: R,
}

impl<R: DiceRoller> LocalGame<R> {
    pub fn start(names: &[String], rules: Rules, roller: R) -> Result<Self, DomainError> {
        Ok(Self {
            state: start_local(names, rules)?,
            roller,
        })
    }

    pub fn state(&self) -> &RoomState {
        &self.state
    }

    pub fn snapshot(&self) -> RoomSnapshot {
        snapshot(&self.state)
    }

    pub fn is_finished(&self) -> bool {
        self.state.phase == Phase::Finished
    }

    /// Apply `intent` on behalf of whoever holds the turn. A rejected
    /// intent leaves the game exactly as it was.
    pub fn apply(&mut self, intent: &Intent) -> Result<IntentEffect, DomainError> {
        if self.state.phase != Phase::Playing {
            return Err(DomainError::validation(
                ValidationKind::PhaseMismatch,
                "the game is over",
            ));
        }
        let actor = self
            .state
            .current_player_id()
            .cloned()
            .ok_or_else(|| DomainError::invariant("local game has no current player"))?;

        let mut next = self.state.clone();
        let effect = apply_intent(&mut next, &actor, intent, &mut self.roller)?;
        self.state = next;
        Ok(effect)
    }

    pub fn roll(&mut self) -> Result<IntentEffect, DomainError> {
        self.apply(&Intent::Roll)
    }

    pub fn bank(&mut self) -> Result<IntentEffect, DomainError> {
        self.apply(&Intent::Bank)
    }

    pub fn toggle_hold(&mut self, index: usize) -> Result<IntentEffect, DomainError> {
        self.apply(&Intent::ToggleHold { index })
    }
}
