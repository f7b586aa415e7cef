//! Random source for dice draws, injected into roll transitions so the
//! transition functions stay deterministic under test.

use rand::{Rng, SeedableRng};
use rand_chacha::ChaCha20Rng;

use crate::domain::dice::Face;

/// Uniform draw of one face per call.
pub trait DiceRoller {
    fn roll_face(&mut self) -> Face;
}

impl<R: DiceRoller + ?Sized> DiceRoller for &mut R {
    fn roll_face(&mut self) -> Face {
        (**self).roll_face()
    }
}

impl<R: DiceRoller + ?Sized> DiceRoller for Box<R> {
    fn roll_face(&mut self) -> Face {
        (**self).roll_face()
    }
}

/// ChaCha20-backed roller; OS-seeded in production, fixed seed for replays.
pub struct ChaChaRoller {
    rng: ChaCha20Rng,
}

impl ChaChaRoller {
    pub fn from_entropy() -> Self {
        Self {
            rng: ChaCha20Rng::from_os_rng(),
        }
    }

    pub fn seeded(seed: u64) -> Self {
        Self {
            rng: ChaCha20Rng::seed_from_u64(seed),
        }
    }
}

impl DiceRoller for ChaChaRoller {
    fn roll_face(&mut self) -> Face {
        let i = self.rng.random_range(0..Face::ALL.len());
        Face::ALL[i]
    }
}

/// Replays a fixed sequence of faces, wrapping around at the end.
///
/// Handy for tests and scripted demos: `ScriptedRoller::parse("AAK67")`.
#[derive(Debug, Clone)]
pub struct ScriptedRoller {
    faces: Vec<Face>,
    next: usize,
}

impl ScriptedRoller {
    pub fn new(faces: Vec<Face>) -> Self {
        Self { faces, next: 0 }
    }

    /// Build from face symbols; unknown symbols are skipped.
    pub fn parse(symbols: &str) -> Self {
        Self::new(symbols.chars().filter_map(Face::from_symbol).collect())
    }

    /// How many faces have been handed out so far.
    pub fn draws(&self) -> usize {
        self.next
    }
}

impl DiceRoller for ScriptedRoller {
    fn roll_face(&mut self) -> Face {
        if self.faces.is_empty() {
            return Face::Six;
        }
        let face = self.faces[self.next % self.faces.len()];
        self.next += 1;
        face
    }
}
