use std::sync::Arc;

use sea_orm::DatabaseConnection;

use crate::services::rooms::RoomService;

/// Application state containing shared resources
#[derive(Clone)]
pub struct AppState {
    rooms: Arc<RoomService>,
    /// Present when rooms live in the database.
    db: Option<DatabaseConnection>,
}

impl AppState {
    pub fn new(rooms: Arc<RoomService>, db: Option<DatabaseConnection>) -> Self {
        Self { rooms, db }
    }

    pub fn rooms(&self) -> &Arc<RoomService> {
        &self.rooms
    }

    pub fn db(&self) -> Option<&DatabaseConnection> {
        self.db.as_ref()
    }
}
