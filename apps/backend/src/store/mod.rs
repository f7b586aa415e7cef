//! Keyed room storage with optimistic versioning.
//!
//! A store never interprets room state; it only guarantees that a write lands
//! iff the caller saw the latest `lock_version`.

use async_trait::async_trait;
use thiserror::Error;

use crate::domain::state::RoomState;
use crate::errors::domain::{ConflictKind, DomainError, InfraErrorKind, NotFoundKind};

pub mod memory;
pub mod sea;

pub use memory::MemoryRoomStore;
pub use sea::SeaRoomStore;

/// Version a freshly inserted room starts at.
pub const INITIAL_VERSION: i32 = 1;

/// A room as read from (or written to) the store.
#[derive(Debug, Clone, PartialEq)]
pub struct StoredRoom {
    pub code: String,
    pub state: RoomState,
    pub lock_version: i32,
}

#[derive(Debug, Error)]
pub enum StoreError {
    #[error("room {0} not found")]
    NotFound(String),
    #[error("room {0} already exists")]
    AlreadyExists(String),
    #[error("room {code} is at version {actual}, expected {expected}")]
    VersionConflict {
        code: String,
        expected: i32,
        actual: i32,
    },
    #[error("room {code} has an unreadable record: {detail}")]
    Corrupt { code: String, detail: String },
    #[error("database error: {0}")]
    Db(#[from] sea_orm::DbErr),
}

impl StoreError {
    pub fn is_version_conflict(&self) -> bool {
        matches!(self, StoreError::VersionConflict { .. })
    }
}

impl From<StoreError> for DomainError {
    fn from(e: StoreError) -> Self {
        let detail = e.to_string();
        match e {
            StoreError::NotFound(_) => DomainError::not_found(NotFoundKind::Room, detail),
            StoreError::AlreadyExists(_) => {
                DomainError::conflict(ConflictKind::RoomCodeTaken, detail)
            }
            StoreError::VersionConflict { .. } => {
                DomainError::conflict(ConflictKind::OptimisticLock, detail)
            }
            StoreError::Corrupt { .. } => {
                DomainError::infra(InfraErrorKind::DataCorruption, detail)
            }
            StoreError::Db(_) => DomainError::infra(InfraErrorKind::Store, detail),
        }
    }
}

/// Shared room records keyed by room code.
#[async_trait]
pub trait RoomStore: Send + Sync {
    async fn load(&self, code: &str) -> Result<Option<StoredRoom>, StoreError>;

    /// Create a record at `INITIAL_VERSION`; fails if the code is taken.
    async fn insert(&self, code: &str, state: &RoomState) -> Result<StoredRoom, StoreError>;

    /// Replace the record iff it is still at `expected`, bumping the version.
    async fn compare_and_swap(
        &self,
        code: &str,
        expected: i32,
        state: &RoomState,
    ) -> Result<StoredRoom, StoreError>;

    /// Remove the record iff it is still at `expected`.
    async fn delete(&self, code: &str, expected: i32) -> Result<(), StoreError>;
}

pub(crate) fn encode_state(code: &str, state: &RoomState) -> Result<String, StoreError> {
    serde_json::to_string(state).map_err(|e| StoreError::Corrupt {
        code: code.to_string(),
        detail: e.to_string(),
    })
}

pub(crate) fn decode_state(code: &str, raw: &str) -> Result<RoomState, StoreError> {
    serde_json::from_str(raw).map_err(|e| StoreError::Corrupt {
        code: code.to_string(),
        detail: e.to_string(),
    })
}
