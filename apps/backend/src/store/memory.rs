//! In-process room store.

use async_trait::async_trait;
use dashmap::mapref::entry::Entry;
use dashmap::DashMap;

use super::{RoomStore, StoreError, StoredRoom, INITIAL_VERSION};
use crate::domain::state::RoomState;

/// DashMap-backed store. Each CAS runs under the shard lock for its key, so
/// no lock is ever held across an await.
#[derive(Debug, Default)]
pub struct MemoryRoomStore {
    rooms: DashMap<String, StoredRoom>,
}

impl MemoryRoomStore {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn len(&self) -> usize {
        self.rooms.len()
    }

    pub fn is_empty(&self) -> bool {
        self.rooms.is_empty()
    }
}

#[async_trait]
impl RoomStore for MemoryRoomStore {
    async fn load(&self, code: &str) -> Result<Option<StoredRoom>, StoreError> {
        Ok(self.rooms.get(code).map(|r| r.value().clone()))
    }

    async fn insert(&self, code: &str, state: &RoomState) -> Result<StoredRoom, StoreError> {
        match self.rooms.entry(code.to_string()) {
            Entry::Occupied(_) => Err(StoreError::AlreadyExists(code.to_string())),
            Entry::Vacant(slot) => {
                let stored = StoredRoom {
                    code: code.to_string(),
                    state: state.clone(),
                    lock_version: INITIAL_VERSION,
                };
                slot.insert(stored.clone());
                Ok(stored)
            }
        }
    }

    async fn compare_and_swap(
        &self,
        code: &str,
        expected: i32,
        state: &RoomState,
    ) -> Result<StoredRoom, StoreError> {
        let mut current = self
            .rooms
            .get_mut(code)
            .ok_or_else(|| StoreError::NotFound(code.to_string()))?;
        if current.lock_version != expected {
            return Err(StoreError::VersionConflict {
                code: code.to_string(),
                expected,
                actual: current.lock_version,
            });
        }
        current.state = state.clone();
        current.lock_version += 1;
        Ok(current.clone())
    }

    async fn delete(&self, code: &str, expected: i32) -> Result<(), StoreError> {
        match self.rooms.entry(code.to_string()) {
            Entry::Vacant(_) => Err(StoreError::NotFound(code.to_string())),
            Entry::Occupied(slot) => {
                let actual = slot.get().lock_version;
                if actual != expected {
                    return Err(StoreError::VersionConflict {
                        code: code.to_string(),
                        expected,
                        actual,
                    });
                }
                slot.remove();
                Ok(())
            }
        }
    }
}
