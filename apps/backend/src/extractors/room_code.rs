use actix_web::dev::Payload;
use actix_web::{FromRequest, HttpRequest};
use futures_util::future::{ready, Ready};

use crate::error::AppError;
use crate::utils::join_code::normalize_room_code;

/// Room code from the `{code}` path segment, canonicalized.
///
/// Existence is not checked here; the room service reports a missing room.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RoomCode(pub String);

impl RoomCode {
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl FromRequest for RoomCode {
    type Error = AppError;
    type Future = Ready<Result<Self, Self::Error>>;

    fn from_request(req: &HttpRequest, _: &mut Payload) -> Self::Future {
        let code = req
            .match_info()
            .get("code")
            .and_then(normalize_room_code)
            .map(RoomCode)
            .ok_or_else(AppError::invalid_room_code);
        ready(code)
    }
}
