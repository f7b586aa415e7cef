use serde::{Deserialize, Serialize};

use crate::domain::snapshot::RoomSnapshot;

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum ClientMsg {
    /// Ask for the current snapshot again (after a missed frame).
    Resync,
}

#[allow(clippy::large_enum_variant)]
#[derive(Debug, Clone, Serialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum ServerMsg {
    RoomState { version: i32, room: RoomSnapshot },

    /// The last player left and the record is gone.
    RoomClosed { code: String },

    Error { code: ErrorCode, message: String },
}

#[derive(Debug, Clone, Copy, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ErrorCode {
    BadRequest,
    RoomNotFound,
    Internal,
}
