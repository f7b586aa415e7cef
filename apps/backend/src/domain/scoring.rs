//! Scoring engine: dice faces + held flags → points and contributing dice.
//!
//! Held dice were banked into the turn by an earlier sub-roll and are
//! ignored entirely. Triples are taken first in `TRIPLE_PRECEDENCE`, then
//! any leftover `A`/`K` dice score as singles.

use serde::Serialize;

use crate::domain::dice::{DiceSet, Face};
use crate::domain::rules::{single_score, triple_score, NUM_DICE, TRIPLE_PRECEDENCE};

#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize)]
pub struct RollScore {
    pub points: u32,
    /// Positions in the dice set that contributed, ascending.
    pub scoring: Vec<usize>,
}

impl RollScore {
    /// Active dice were thrown and nothing scored.
    pub fn is_farkle(&self) -> bool {
        self.points == 0
    }
}

/// Score the unheld dice of `dice`.
///
/// Total over well-formed input; a set with every die held scores 0 with no
/// contributing indices (that case is hot dice, never a bust, and the turn
/// machine unlocks before it can reach the engine).
pub fn score_dice(dice: &DiceSet) -> RollScore {
    let mut counts = [0u8; 6];
    for d in dice.dice().iter().filter(|d| !d.held) {
        counts[d.face.index()] += 1;
    }

    let mut used = [false; NUM_DICE];
    let mut points = 0u32;

    for face in TRIPLE_PRECEDENCE {
        if counts[face.index()] >= 3 {
            points += triple_score(face);
            counts[face.index()] -= 3;
            mark_active(dice, face, 3, &mut used);
        }
    }

    for face in [Face::Ace, Face::King] {
        let left = counts[face.index()];
        if left == 0 {
            continue;
        }
        if let Some(value) = single_score(face) {
            points += value * u32::from(left);
            mark_active(dice, face, left as usize, &mut used);
        }
    }

    let scoring = used
        .iter()
        .enumerate()
        .filter_map(|(i, u)| u.then_some(i))
        .collect();

    RollScore { points, scoring }
}

/// Score only the dice at `indices`, as if every other die were held.
///
/// Used to value a manual keep selection.
pub fn score_subset(dice: &DiceSet, indices: &[usize]) -> RollScore {
    let mut view = *dice;
    for (i, d) in view.dice_mut().iter_mut().enumerate() {
        d.held = !indices.contains(&i);
    }
    score_dice(&view)
}

/// Mark up to `n` unmarked, unheld dice showing `face`, lowest position first.
fn mark_active(dice: &DiceSet, face: Face, n: usize, used: &mut [bool; NUM_DICE]) {
    let mut marked = 0;
    for (i, d) in dice.dice().iter().enumerate() {
        if marked == n {
            break;
        }
        if !d.held && d.face == face && !used[i] {
            used[i] = true;
            marked += 1;
        }
    }
}
