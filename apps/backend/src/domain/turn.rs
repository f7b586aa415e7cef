//! Per-turn state machine: rolling, folding sub-rolls, busts and hot dice.

use std::fmt;

use serde::{Deserialize, Serialize};

use crate::domain::dice::DiceSet;
use crate::domain::roller::DiceRoller;
use crate::domain::rules::NUM_DICE;
use crate::domain::scoring::{score_dice, score_subset};
use crate::errors::domain::{DomainError, ValidationKind};

/// Table message shown for the current turn.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum TurnMessage {
    /// Lobby: the room has not started.
    Waiting,
    /// A new turn for the named player.
    TurnStart { name: String },
    /// Scored, some dice still free.
    Continue,
    /// Every die is held or scoring.
    HotDice,
    /// Nothing scored; turn progress lost.
    Farkle,
    /// Game over.
    Winner { name: String },
}

impl fmt::Display for TurnMessage {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            TurnMessage::Waiting => write!(f, "Waiting..."),
            TurnMessage::TurnStart { name } => write!(f, "{name}'s Turn"),
            TurnMessage::Continue => write!(f, "Roll or Bank"),
            TurnMessage::HotDice => write!(f, "Hot Dice!"),
            TurnMessage::Farkle => write!(f, "Farkle! 0 Points."),
            TurnMessage::Winner { name } => write!(f, "{name} Wins!"),
        }
    }
}

/// Status derived from the turn counters; never stored.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum TurnStatus {
    Fresh,
    Active,
    Busted,
    Hot,
}

/// In-progress turn for the current player.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TurnState {
    pub dice: DiceSet,
    /// Points folded in from earlier sub-rolls this turn.
    pub turn_accumulated: u32,
    /// Points of the roll currently on the table.
    pub current_roll: u32,
    pub roll_count: u32,
    pub message: Option<TurnMessage>,
}

/// What a single roll produced.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct RollOutcome {
    pub score: u32,
    pub scoring: Vec<usize>,
    pub hot_dice: bool,
    pub busted: bool,
}

impl TurnState {
    pub fn fresh(message: Option<TurnMessage>) -> Self {
        Self {
            dice: DiceSet::fresh(),
            turn_accumulated: 0,
            current_roll: 0,
            roll_count: 0,
            message,
        }
    }

    pub fn status(&self) -> TurnStatus {
        if self.roll_count == 0 {
            TurnStatus::Fresh
        } else if self.current_roll == 0 {
            TurnStatus::Busted
        } else if self.dice.accounted_count() == NUM_DICE {
            TurnStatus::Hot
        } else {
            TurnStatus::Active
        }
    }

    /// Points the player would bank right now.
    pub fn points_on_table(&self) -> u32 {
        self.turn_accumulated + self.current_roll
    }

    /// Check the counter invariant; a violation means the record is corrupt.
    pub fn check_invariants(&self) -> Result<(), DomainError> {
        if self.roll_count == 0 && (self.turn_accumulated != 0 || self.current_roll != 0) {
            return Err(DomainError::invariant(format!(
                "turn has points ({} + {}) before any roll",
                self.turn_accumulated, self.current_roll
            )));
        }
        Ok(())
    }

    /// Roll every non-held die.
    ///
    /// Folds the previous roll first (locking its scoring dice or the
    /// player's manual selection), unlocks everything on hot dice, then
    /// draws and scores. A zero score wipes the turn's progress.
    pub fn roll(&mut self, roller: &mut dyn DiceRoller) -> Result<RollOutcome, DomainError> {
        self.check_invariants()?;
        if self.status() == TurnStatus::Busted {
            return Err(DomainError::validation(
                ValidationKind::RollAfterFarkle,
                "turn is busted; bank to pass the dice",
            ));
        }

        // Work on a copy so a rejected selection leaves the turn untouched.
        let mut next = self.clone();
        if next.roll_count > 0 {
            next.fold_previous_roll()?;
        }

        if next.dice.all_held() {
            next.dice.unlock_all();
        }

        for die in next.dice.dice_mut().iter_mut() {
            die.scoring = false;
            if !die.held {
                die.face = roller.roll_face();
            }
        }

        let result = score_dice(&next.dice);
        for &i in &result.scoring {
            next.dice.dice_mut()[i].scoring = true;
        }
        next.current_roll = result.points;
        next.roll_count += 1;

        let busted = result.is_farkle();
        let hot_dice =
            !busted && next.dice.held_count() + result.scoring.len() == NUM_DICE;
        if busted {
            next.turn_accumulated = 0;
            next.current_roll = 0;
            next.message = Some(TurnMessage::Farkle);
        } else if hot_dice {
            next.message = Some(TurnMessage::HotDice);
        } else {
            next.message = Some(TurnMessage::Continue);
        }

        *self = next;
        Ok(RollOutcome {
            score: result.points,
            scoring: result.scoring,
            hot_dice,
            busted,
        })
    }

    /// Flip `held` on a die that scored in the current roll.
    pub fn toggle_hold(&mut self, index: usize) -> Result<(), DomainError> {
        match self.status() {
            TurnStatus::Active | TurnStatus::Hot => {}
            TurnStatus::Fresh => {
                return Err(DomainError::validation(
                    ValidationKind::PhaseMismatch,
                    "nothing rolled yet this turn",
                ))
            }
            TurnStatus::Busted => {
                return Err(DomainError::validation(
                    ValidationKind::RollAfterFarkle,
                    "turn is busted",
                ))
            }
        }
        let die = self
            .dice
            .dice_mut()
            .get_mut(index)
            .ok_or_else(|| {
                DomainError::validation(
                    ValidationKind::InvalidDieIndex,
                    format!("die index {index} out of range"),
                )
            })?;
        if !die.scoring {
            return Err(DomainError::validation(
                ValidationKind::NotScoringDie,
                format!("die {index} did not score this roll"),
            ));
        }
        die.held = !die.held;
        Ok(())
    }

    /// Move the table roll into `turn_accumulated` and lock its dice.
    fn fold_previous_roll(&mut self) -> Result<(), DomainError> {
        let selection = self.dice.selected_indices();
        if selection.is_empty() {
            self.turn_accumulated += self.current_roll;
            for die in self.dice.dice_mut().iter_mut() {
                if die.scoring {
                    die.held = true;
                }
            }
            return Ok(());
        }

        let kept = score_subset(&self.dice, &selection);
        if kept.points == 0 || kept.scoring != selection {
            return Err(DomainError::validation(
                ValidationKind::InvalidSelection,
                format!("held dice {selection:?} do not all score on their own"),
            ));
        }
        self.turn_accumulated += kept.points;
        // Unselected scoring dice go back into the cup.
        Ok(())
    }
}

impl Default for TurnState {
    fn default() -> Self {
        Self::fresh(None)
    }
}
