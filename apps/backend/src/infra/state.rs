use std::sync::Arc;

use crate::config::{AppConfig, StoreKind};
use crate::domain::roller::DiceRoller;
use crate::domain::rules::Rules;
use crate::error::AppError;
use crate::infra::db::connect_db;
use crate::services::rooms::RoomService;
use crate::state::app_state::AppState;
use crate::store::{MemoryRoomStore, RoomStore, SeaRoomStore};
use crate::sync::RetryPolicy;
use crate::ws::hub::RoomSessionRegistry;

/// Builder for creating AppState instances (used in both tests and main)
pub struct StateBuilder {
    store: StoreKind,
    rules: Rules,
    retry: RetryPolicy,
    roller: Option<Box<dyn DiceRoller + Send>>,
}

impl StateBuilder {
    pub fn new() -> Self {
        Self {
            store: StoreKind::Memory,
            rules: Rules::default(),
            retry: RetryPolicy::default(),
            roller: None,
        }
    }

    pub fn from_config(config: &AppConfig) -> Self {
        Self::new()
            .with_store(config.store.clone())
            .with_rules(config.rules)
            .with_retry(config.retry)
    }

    pub fn with_store(mut self, store: StoreKind) -> Self {
        self.store = store;
        self
    }

    pub fn with_rules(mut self, rules: Rules) -> Self {
        self.rules = rules;
        self
    }

    pub fn with_retry(mut self, retry: RetryPolicy) -> Self {
        self.retry = retry;
        self
    }

    pub fn with_roller(mut self, roller: Box<dyn DiceRoller + Send>) -> Self {
        self.roller = Some(roller);
        self
    }

    pub async fn build(self) -> Result<AppState, AppError> {
        let (store, db): (Arc<dyn RoomStore>, _) = match &self.store {
            StoreKind::Memory => (Arc::new(MemoryRoomStore::new()), None),
            StoreKind::Database { url } => {
                // single entrypoint: connect + migrate
                let conn = connect_db(url).await?;
                (Arc::new(SeaRoomStore::new(conn.clone())), Some(conn))
            }
        };

        let registry = Arc::new(RoomSessionRegistry::new());
        let mut rooms = RoomService::new(store, self.rules, self.retry, registry);
        if let Some(roller) = self.roller {
            rooms = rooms.with_roller(roller);
        }
        Ok(AppState::new(Arc::new(rooms), db))
    }
}

impl Default for StateBuilder {
    fn default() -> Self {
        Self::new()
    }
}

pub fn build_state() -> StateBuilder {
    StateBuilder::new()
}
