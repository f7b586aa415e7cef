//! Dice primitives: faces, single dice and the fixed five-die set.

use std::fmt;

use serde::{Deserialize, Serialize};

use crate::domain::rules::NUM_DICE;

/// The six symbolic faces, in ascending value order.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub enum Face {
    #[serde(rename = "6")]
    Six,
    #[serde(rename = "7")]
    Seven,
    #[serde(rename = "J")]
    Jack,
    #[serde(rename = "Q")]
    Queen,
    #[serde(rename = "K")]
    King,
    #[serde(rename = "A")]
    Ace,
}

impl Face {
    pub const ALL: [Face; 6] = [
        Face::Six,
        Face::Seven,
        Face::Jack,
        Face::Queen,
        Face::King,
        Face::Ace,
    ];

    /// Position of the face in `Face::ALL` (0..=5).
    #[inline]
    pub fn index(self) -> usize {
        self as usize
    }

    /// Inverse of `index`; `None` outside 0..=5.
    pub fn from_index(i: usize) -> Option<Face> {
        Face::ALL.get(i).copied()
    }

    pub fn symbol(self) -> char {
        match self {
            Face::Six => '6',
            Face::Seven => '7',
            Face::Jack => 'J',
            Face::Queen => 'Q',
            Face::King => 'K',
            Face::Ace => 'A',
        }
    }

    pub fn from_symbol(c: char) -> Option<Face> {
        match c.to_ascii_uppercase() {
            '6' => Some(Face::Six),
            '7' => Some(Face::Seven),
            'J' => Some(Face::Jack),
            'Q' => Some(Face::Queen),
            'K' => Some(Face::King),
            'A' => Some(Face::Ace),
            _ => None,
        }
    }
}

impl fmt::Display for Face {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.symbol())
    }
}

/// One die on the table.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct Die {
    pub face: Face,
    /// Locked in from an earlier sub-roll (or manually selected); not re-rolled.
    pub held: bool,
    /// Contributed to the most recent roll's score.
    pub scoring: bool,
}

impl Die {
    pub const fn blank() -> Self {
        Self {
            face: Face::Six,
            held: false,
            scoring: false,
        }
    }

    pub const fn showing(face: Face) -> Self {
        Self {
            face,
            held: false,
            scoring: false,
        }
    }

    /// Held and scoring at once: the player picked this die to keep.
    #[inline]
    pub fn is_selected(&self) -> bool {
        self.held && self.scoring
    }
}

impl Default for Die {
    fn default() -> Self {
        Self::blank()
    }
}

/// Exactly five dice, in table order.
///
/// Backed by a fixed array so the length can never drift; a stored record
/// with any other length fails to decode instead of being padded.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(transparent)]
pub struct DiceSet(pub [Die; NUM_DICE]);

impl DiceSet {
    /// All dice showing `6`, nothing held or scoring.
    pub fn fresh() -> Self {
        Self([Die::blank(); NUM_DICE])
    }

    /// Unheld dice showing the given faces.
    pub fn from_faces(faces: [Face; NUM_DICE]) -> Self {
        Self(faces.map(Die::showing))
    }

    /// Parse a five-symbol string such as `"AAK67"`; `None` on bad input.
    pub fn parse(symbols: &str) -> Option<Self> {
        let faces: Vec<Face> = symbols
            .chars()
            .filter(|c| !c.is_whitespace())
            .map(Face::from_symbol)
            .collect::<Option<Vec<_>>>()?;
        let faces: [Face; NUM_DICE] = faces.try_into().ok()?;
        Some(Self::from_faces(faces))
    }

    pub fn dice(&self) -> &[Die; NUM_DICE] {
        &self.0
    }

    pub fn dice_mut(&mut self) -> &mut [Die; NUM_DICE] {
        &mut self.0
    }

    pub fn get(&self, index: usize) -> Option<&Die> {
        self.0.get(index)
    }

    pub fn faces(&self) -> [Face; NUM_DICE] {
        self.0.map(|d| d.face)
    }

    pub fn held_count(&self) -> usize {
        self.0.iter().filter(|d| d.held).count()
    }

    pub fn all_held(&self) -> bool {
        self.0.iter().all(|d| d.held)
    }

    /// Dice that are either held or scoring ("spoken for").
    pub fn accounted_count(&self) -> usize {
        self.0.iter().filter(|d| d.held || d.scoring).count()
    }

    pub fn selected_indices(&self) -> Vec<usize> {
        self.0
            .iter()
            .enumerate()
            .filter(|(_, d)| d.is_selected())
            .map(|(i, _)| i)
            .collect()
    }

    pub fn unlock_all(&mut self) {
        for d in self.0.iter_mut() {
            d.held = false;
        }
    }
}

impl fmt::Display for DiceSet {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        for d in &self.0 {
            write!(f, "{}", d.face)?;
        }
        Ok(())
    }
}
