//! Domain layer: pure game logic types and helpers.

pub mod dice;
pub mod roller;
pub mod room;
pub mod rules;
pub mod scoring;
pub mod snapshot;
pub mod state;
pub mod turn;

#[cfg(test)]
mod test_gens;
#[cfg(test)]
mod test_prelude;
#[cfg(test)]
mod tests_props_scoring;
#[cfg(test)]
mod tests_room;
#[cfg(test)]
mod tests_scoring;

// Re-exports for ergonomics
pub use dice::{DiceSet, Die, Face};
pub use roller::{ChaChaRoller, DiceRoller, ScriptedRoller};
pub use room::{JoinOutcome, LeaveOutcome};
pub use rules::Rules;
pub use scoring::{score_dice, RollScore};
pub use snapshot::{snapshot, RoomSnapshot};
pub use state::{ActionId, BankEvent, Phase, Player, PlayerId, RoomState};
pub use turn::{RollOutcome, TurnMessage, TurnState, TurnStatus};
