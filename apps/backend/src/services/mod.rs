pub mod local_game;
pub mod rooms;

pub use local_game::LocalGame;
pub use rooms::{ActionReply, CreatedRoom, RoomService};
