use std::sync::Arc;

use actix::prelude::*;
use dashmap::DashMap;
use tracing::debug;
use uuid::Uuid;

use crate::domain::snapshot::RoomSnapshot;

/// Pushed to every session watching a room after a commit.
#[derive(Message, Clone)]
#[rtype(result = "()")]
pub enum RoomBroadcast {
    State {
        version: i32,
        room: Arc<RoomSnapshot>,
    },
    Closed,
}

/// Live websocket sessions grouped by room code.
#[derive(Default)]
pub struct RoomSessionRegistry {
    sessions: DashMap<String, DashMap<Uuid, Recipient<RoomBroadcast>>>,
}

impl RoomSessionRegistry {
    pub fn new() -> Self {
        Self {
            sessions: DashMap::new(),
        }
    }

    pub fn register(&self, code: &str, recipient: Recipient<RoomBroadcast>) -> Uuid {
        let token = Uuid::new_v4();
        let entry = self
            .sessions
            .entry(code.to_string())
            .or_insert_with(DashMap::new);
        entry.insert(token, recipient);
        token
    }

    pub fn unregister(&self, code: &str, token: Uuid) {
        let now_empty = match self.sessions.get(code) {
            Some(entry) => {
                entry.remove(&token);
                entry.is_empty()
            }
            None => false,
        };
        if now_empty {
            self.sessions.remove_if(code, |_, entry| entry.is_empty());
        }
    }

    pub fn subscriber_count(&self, code: &str) -> usize {
        self.sessions.get(code).map(|e| e.len()).unwrap_or(0)
    }

    pub fn broadcast(&self, code: &str, message: RoomBroadcast) {
        if let Some(entry) = self.sessions.get(code) {
            debug!(room = code, sessions = entry.len(), "broadcasting room update");
            for recipient in entry.iter() {
                recipient.value().do_send(message.clone());
            }
        }
    }
}
