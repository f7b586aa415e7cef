//! Error codes for the room API.
//!
//! Add new codes here; never pass ad-hoc strings as error codes.
//! All codes are SCREAMING_SNAKE_CASE and map 1:1 to the strings that
//! appear in HTTP problem details.

use core::fmt;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ErrorCode {
    // Rule violations
    /// Actor is not the current player
    OutOfTurn,
    /// Action not allowed in the room's phase or the turn's status
    PhaseMismatch,
    /// Roll attempted on a busted turn
    RollAfterFarkle,
    /// Hold toggled on a die that did not score
    NotScoringDie,
    /// Die index outside the five-die set
    InvalidDieIndex,
    /// Manual selection does not score on its own
    InvalidSelection,
    /// No free seats
    RoomFull,
    /// Host-only action
    NotHost,
    /// Display name empty or too long
    InvalidName,
    /// Actor has no seat in the room
    NotInRoom,
    /// Malformed room code in the path
    InvalidRoomCode,
    /// General validation error
    ValidationError,
    /// General bad request error
    BadRequest,

    // Resource Not Found
    RoomNotFound,
    PlayerNotFound,
    NotFound,

    // Concurrency
    /// Compare-and-swap lost against a concurrent writer
    OptimisticLock,
    /// Every retry lost its compare-and-swap
    RetriesExhausted,
    /// Generated room code already in use
    RoomCodeTaken,
    /// Generic conflict (fallback for unmatched conflicts)
    Conflict,

    // System Errors
    StoreError,
    DataCorruption,
    InvariantViolation,
    Internal,
    ConfigError,
}

impl ErrorCode {
    /// Canonical string for this code, exactly as it appears in responses.
    pub const fn as_str(&self) -> &'static str {
        match self {
            Self::OutOfTurn => "OUT_OF_TURN",
            Self::PhaseMismatch => "PHASE_MISMATCH",
            Self::RollAfterFarkle => "ROLL_AFTER_FARKLE",
            Self::NotScoringDie => "NOT_SCORING_DIE",
            Self::InvalidDieIndex => "INVALID_DIE_INDEX",
            Self::InvalidSelection => "INVALID_SELECTION",
            Self::RoomFull => "ROOM_FULL",
            Self::NotHost => "NOT_HOST",
            Self::InvalidName => "INVALID_NAME",
            Self::NotInRoom => "NOT_IN_ROOM",
            Self::InvalidRoomCode => "INVALID_ROOM_CODE",
            Self::ValidationError => "VALIDATION_ERROR",
            Self::BadRequest => "BAD_REQUEST",

            Self::RoomNotFound => "ROOM_NOT_FOUND",
            Self::PlayerNotFound => "PLAYER_NOT_FOUND",
            Self::NotFound => "NOT_FOUND",

            Self::OptimisticLock => "OPTIMISTIC_LOCK",
            Self::RetriesExhausted => "RETRIES_EXHAUSTED",
            Self::RoomCodeTaken => "ROOM_CODE_TAKEN",
            Self::Conflict => "CONFLICT",

            Self::StoreError => "STORE_ERROR",
            Self::DataCorruption => "DATA_CORRUPTION",
            Self::InvariantViolation => "INVARIANT_VIOLATION",
            Self::Internal => "INTERNAL",
            Self::ConfigError => "CONFIG_ERROR",
        }
    }

    /// Every code, for uniqueness checks.
    pub const ALL: [ErrorCode; 25] = [
        Self::OutOfTurn,
        Self::PhaseMismatch,
        Self::RollAfterFarkle,
        Self::NotScoringDie,
        Self::InvalidDieIndex,
        Self::InvalidSelection,
        Self::RoomFull,
        Self::NotHost,
        Self::InvalidName,
        Self::NotInRoom,
        Self::InvalidRoomCode,
        Self::ValidationError,
        Self::BadRequest,
        Self::RoomNotFound,
        Self::PlayerNotFound,
        Self::NotFound,
        Self::OptimisticLock,
        Self::RetriesExhausted,
        Self::RoomCodeTaken,
        Self::Conflict,
        Self::StoreError,
        Self::DataCorruption,
        Self::InvariantViolation,
        Self::Internal,
        Self::ConfigError,
    ];
}

impl fmt::Display for ErrorCode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.as_str())
    }
}
