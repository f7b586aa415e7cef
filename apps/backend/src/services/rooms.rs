//! Networked room orchestration: room codes, player identities, the sync
//! transaction and the post-commit broadcast.

use std::sync::Arc;

use parking_lot::Mutex;
use serde::Serialize;
use tracing::{debug, info};
use ulid::Ulid;

use crate::domain::roller::{ChaChaRoller, DiceRoller};
use crate::domain::rules::Rules;
use crate::domain::snapshot::{snapshot, RoomSnapshot};
use crate::domain::state::{normalize_name, ActionId, Player, PlayerId, RoomState};
use crate::error::AppError;
use crate::errors::ErrorCode;
use crate::store::{RoomStore, StoreError, StoredRoom};
use crate::sync::{apply_intent, run_room_txn, Intent, IntentEffect, RetryPolicy, TxnOutcome};
use crate::utils::join_code::generate_room_code;
use crate::ws::hub::{RoomBroadcast, RoomSessionRegistry};

/// Fresh codes tried before giving up on a create.
const CODE_ATTEMPTS: u32 = 5;

#[derive(Debug, Clone, Serialize)]
pub struct CreatedRoom {
    pub code: String,
    pub player_id: PlayerId,
    pub version: i32,
    pub room: RoomSnapshot,
}

/// Reply to any intent submitted against an existing room.
#[derive(Debug, Clone, Serialize)]
pub struct ActionReply {
    pub outcome: TxnOutcome,
    /// `None` once the room has been deleted.
    pub version: Option<i32>,
    pub room: Option<RoomSnapshot>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub effect: Option<IntentEffect>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub player_id: Option<PlayerId>,
}

pub struct RoomService {
    store: Arc<dyn RoomStore>,
    rules: Rules,
    policy: RetryPolicy,
    roller: Mutex<Box<dyn DiceRoller + Send>>,
    registry: Arc<RoomSessionRegistry>,
}

impl RoomService {
    pub fn new(
        store: Arc<dyn RoomStore>,
        rules: Rules,
        policy: RetryPolicy,
        registry: Arc<RoomSessionRegistry>,
    ) -> Self {
        Self {
            store,
            rules,
            policy,
            roller: Mutex::new(Box::new(ChaChaRoller::from_entropy())),
            registry,
        }
    }

    /// Swap the dice source (scripted rolls in tests).
    pub fn with_roller(mut self, roller: Box<dyn DiceRoller + Send>) -> Self {
        self.roller = Mutex::new(roller);
        self
    }

    pub fn rules(&self) -> Rules {
        self.rules
    }

    pub fn registry(&self) -> Arc<RoomSessionRegistry> {
        self.registry.clone()
    }

    /// Open a lobby hosted by `host_name` under a fresh room code.
    pub async fn create(&self, host_name: &str) -> Result<CreatedRoom, AppError> {
        let name = normalize_name(host_name)?;
        let player_id = Ulid::new().to_string();
        let state = RoomState::new(Player::new(player_id.clone(), name), self.rules);

        for attempt in 1..=CODE_ATTEMPTS {
            let code = generate_room_code();
            match self.store.insert(&code, &state).await {
                Ok(stored) => {
                    info!(room = %code, host = %player_id, "room created");
                    return Ok(CreatedRoom {
                        code,
                        player_id,
                        version: stored.lock_version,
                        room: snapshot(&stored.state),
                    });
                }
                Err(StoreError::AlreadyExists(_)) => {
                    debug!(room = %code, attempt, "room code collision");
                }
                Err(e) => return Err(e.into()),
            }
        }

        Err(AppError::conflict(
            ErrorCode::RoomCodeTaken,
            format!("no free room code after {CODE_ATTEMPTS} attempts"),
        ))
    }

    pub async fn load(&self, code: &str) -> Result<StoredRoom, AppError> {
        self.store.load(code).await?.ok_or_else(|| {
            AppError::not_found(ErrorCode::RoomNotFound, format!("room {code} not found"))
        })
    }

    /// Seat a new player. The id is derived from the join token, so a
    /// retried join hands back the same id.
    pub async fn join(
        &self,
        code: &str,
        name: &str,
        action_id: ActionId,
    ) -> Result<ActionReply, AppError> {
        let player_id = Ulid::from(action_id.0.as_u128()).to_string();
        let intent = Intent::Join {
            name: name.to_string(),
        };
        let mut reply = self.act(code, &player_id, intent, action_id).await?;
        reply.player_id = Some(player_id);
        Ok(reply)
    }

    /// Run one intent for `actor` as a room transaction and publish the
    /// committed result to the room's websocket sessions.
    pub async fn act(
        &self,
        code: &str,
        actor: &str,
        intent: Intent,
        action_id: ActionId,
    ) -> Result<ActionReply, AppError> {
        let result = run_room_txn(self.store.as_ref(), code, action_id, self.policy, |state| {
            let mut roller = self.roller.lock();
            apply_intent(state, actor, &intent, &mut **roller)
        })
        .await?;

        debug!(
            room = code,
            intent = intent.name(),
            outcome = ?result.outcome,
            attempts = result.attempts,
            "intent handled"
        );

        let room = result.room.as_ref().map(|r| snapshot(&r.state));
        if result.outcome == TxnOutcome::Committed {
            let message = match (&result.room, &room) {
                (Some(stored), Some(snap)) => RoomBroadcast::State {
                    version: stored.lock_version,
                    room: Arc::new(snap.clone()),
                },
                _ => RoomBroadcast::Closed,
            };
            self.registry.broadcast(code, message);
        }

        Ok(ActionReply {
            outcome: result.outcome,
            version: result.room.as_ref().map(|r| r.lock_version),
            room,
            effect: result.value,
            player_id: None,
        })
    }
}
