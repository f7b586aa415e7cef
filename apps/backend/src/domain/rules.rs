use serde::{Deserialize, Serialize};

use crate::domain::dice::Face;

pub const NUM_DICE: usize = 5;
pub const WINNING_SCORE: u32 = 5000;
pub const MAX_PLAYERS: usize = 6;
pub const MAX_NAME_CHARS: usize = 20;

/// Triples are resolved highest face first.
pub const TRIPLE_PRECEDENCE: [Face; 6] = [
    Face::Ace,
    Face::King,
    Face::Queen,
    Face::Jack,
    Face::Seven,
    Face::Six,
];

pub fn triple_score(face: Face) -> u32 {
    match face {
        Face::Ace => 1000,
        Face::King => 500,
        Face::Queen => 400,
        Face::Jack => 300,
        Face::Seven => 200,
        Face::Six => 100,
    }
}

/// Per-die value outside a triple; only `A` and `K` score alone.
pub fn single_score(face: Face) -> Option<u32> {
    match face {
        Face::Ace => Some(100),
        Face::King => Some(50),
        _ => None,
    }
}

/// House rules for one room.
///
/// `min_entry` is the "get on the board" threshold: a player still at 0
/// must bank at least this much in one turn. 0 disables it; 600 is the
/// common table variant.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct Rules {
    pub target_score: u32,
    pub min_entry: u32,
    pub max_players: usize,
}

impl Rules {
    pub fn with_min_entry(mut self, min_entry: u32) -> Self {
        self.min_entry = min_entry;
        self
    }

    pub fn with_target(mut self, target_score: u32) -> Self {
        self.target_score = target_score;
        self
    }
}

impl Default for Rules {
    fn default() -> Self {
        Self {
            target_score: WINNING_SCORE,
            min_entry: 0,
            max_players: MAX_PLAYERS,
        }
    }
}
