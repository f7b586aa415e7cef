// Proptest generators for dice-domain types.

use proptest::prelude::*;

use crate::domain::dice::{DiceSet, Die, Face};
use crate::domain::rules::NUM_DICE;

pub fn face() -> impl Strategy<Value = Face> {
    prop_oneof![
        Just(Face::Six),
        Just(Face::Seven),
        Just(Face::Jack),
        Just(Face::Queen),
        Just(Face::King),
        Just(Face::Ace),
    ]
}

/// Five unheld dice with arbitrary faces.
pub fn active_dice() -> impl Strategy<Value = DiceSet> {
    prop::array::uniform5(face()).prop_map(DiceSet::from_faces)
}

/// Five dice with arbitrary faces and arbitrary held flags.
pub fn dice_with_holds() -> impl Strategy<Value = DiceSet> {
    (
        prop::array::uniform5(face()),
        prop::array::uniform5(any::<bool>()),
    )
        .prop_map(|(faces, held)| {
            let mut set = DiceSet::from_faces(faces);
            for i in 0..NUM_DICE {
                set.dice_mut()[i] = Die {
                    face: faces[i],
                    held: held[i],
                    scoring: false,
                };
            }
            set
        })
}

/// Sequence of faces long enough to drive several rolls.
pub fn face_script(len: usize) -> impl Strategy<Value = Vec<Face>> {
    prop::collection::vec(face(), len)
}
