//! Room codes: short strings in Crockford's Base32 alphabet.

use rand::rngs::OsRng;
use rand::{Rng, TryRngCore};

const CROCKFORD: &[u8] = b"0123456789ABCDEFGHJKMNPQRSTVWXYZ"; // no I, L, O, U

pub const ROOM_CODE_LEN: usize = 6;

/// Generate a room code from the OS's cryptographically secure RNG.
///
/// ```
/// use farkle::utils::join_code::{generate_room_code, ROOM_CODE_LEN};
///
/// let code = generate_room_code();
/// assert_eq!(code.len(), ROOM_CODE_LEN);
/// ```
pub fn generate_room_code() -> String {
    let mut rng = OsRng.unwrap_err();
    (0..ROOM_CODE_LEN)
        .map(|_| CROCKFORD[rng.random_range(0..CROCKFORD.len())] as char)
        .collect()
}

/// Canonicalize user-typed input: uppercase, with the Crockford aliases
/// `I`/`L` → `1` and `O` → `0`. `None` if it cannot be a room code.
pub fn normalize_room_code(raw: &str) -> Option<String> {
    let code: String = raw
        .trim()
        .chars()
        .map(|c| match c.to_ascii_uppercase() {
            'I' | 'L' => '1',
            'O' => '0',
            other => other,
        })
        .collect();
    let valid = code.len() == ROOM_CODE_LEN && code.bytes().all(|b| CROCKFORD.contains(&b));
    valid.then_some(code)
}
