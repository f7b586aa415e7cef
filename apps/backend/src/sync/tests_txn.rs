use std::sync::atomic::{AtomicU32, Ordering};

use async_trait::async_trait;

use crate::domain::roller::ScriptedRoller;
use crate::domain::room::start_local;
use crate::domain::rules::Rules;
use crate::domain::state::{ActionId, Player, RoomState};
use crate::errors::domain::{ConflictKind, DomainError, NotFoundKind, ValidationKind};
use crate::store::{MemoryRoomStore, RoomStore, StoreError, StoredRoom};
use crate::sync::{apply_intent, run_room_txn, Intent, IntentEffect, RetryPolicy, TxnOutcome};

/// Store where another writer sneaks in right after each of the first
/// `races` loads, so the caller's snapshot is already stale.
struct RacingStore {
    inner: MemoryRoomStore,
    races: AtomicU32,
}

impl RacingStore {
    fn new(races: u32) -> Self {
        Self {
            inner: MemoryRoomStore::new(),
            races: AtomicU32::new(races),
        }
    }
}

#[async_trait]
impl RoomStore for RacingStore {
    async fn load(&self, code: &str) -> Result<Option<StoredRoom>, StoreError> {
        let seen = self.inner.load(code).await?;
        if let Some(room) = &seen {
            let left = self.races.load(Ordering::SeqCst);
            if left > 0 {
                self.races.store(left - 1, Ordering::SeqCst);
                self.inner
                    .compare_and_swap(code, room.lock_version, &room.state)
                    .await?;
            }
        }
        Ok(seen)
    }

    async fn insert(&self, code: &str, state: &RoomState) -> Result<StoredRoom, StoreError> {
        self.inner.insert(code, state).await
    }

    async fn compare_and_swap(
        &self,
        code: &str,
        expected: i32,
        state: &RoomState,
    ) -> Result<StoredRoom, StoreError> {
        self.inner.compare_and_swap(code, expected, state).await
    }

    async fn delete(&self, code: &str, expected: i32) -> Result<(), StoreError> {
        self.inner.delete(code, expected).await
    }
}

fn two_player_room() -> RoomState {
    let names = vec!["Ann".to_string(), "Bob".to_string()];
    start_local(&names, Rules::default()).unwrap()
}

fn fast() -> RetryPolicy {
    RetryPolicy::new(16, 0)
}

#[tokio::test]
async fn same_token_twice_changes_state_once() {
    let store = MemoryRoomStore::new();
    store.insert("ROOM01", &two_player_room()).await.unwrap();
    let mut roller = ScriptedRoller::parse("AK676");
    let token = ActionId::new();

    let first = run_room_txn(&store, "ROOM01", token, fast(), |s| {
        apply_intent(s, "p-0", &Intent::Roll, &mut roller)
    })
    .await
    .unwrap();
    let second = run_room_txn(&store, "ROOM01", token, fast(), |s| {
        apply_intent(s, "p-0", &Intent::Roll, &mut roller)
    })
    .await
    .unwrap();

    assert_eq!(first.outcome, TxnOutcome::Committed);
    assert!(matches!(first.value, Some(IntentEffect::Rolled(_))));
    assert_eq!(second.outcome, TxnOutcome::Duplicate);
    assert!(second.value.is_none());
    assert_eq!(roller.draws(), 5, "duplicate never reaches the mutation");

    let room = store.load("ROOM01").await.unwrap().unwrap();
    assert_eq!(room.lock_version, 2);
    assert_eq!(room.state.turn.roll_count, 1);
    assert_eq!(room.state.last_action_id, Some(token));
}

#[tokio::test]
async fn lost_races_rerun_the_mutation_with_fresh_dice() {
    let store = RacingStore::new(2);
    store.insert("ROOM02", &two_player_room()).await.unwrap();
    let mut roller = ScriptedRoller::parse("67JQQ67JQQAK676");

    let res = run_room_txn(&store, "ROOM02", ActionId::new(), fast(), |s| {
        apply_intent(s, "p-0", &Intent::Roll, &mut roller)
    })
    .await
    .unwrap();

    assert_eq!(res.attempts, 3);
    assert_eq!(roller.draws(), 15, "each attempt draws its own dice");
    let room = res.room.unwrap();
    assert_eq!(room.lock_version, 4);
    assert_eq!(room.state.turn.current_roll, 150);
}

#[tokio::test]
async fn retries_exhausted_is_a_conflict() {
    let store = RacingStore::new(10);
    store.insert("ROOM03", &two_player_room()).await.unwrap();
    let mut roller = ScriptedRoller::parse("AAAAA");

    let err = run_room_txn(&store, "ROOM03", ActionId::new(), RetryPolicy::new(3, 0), |s| {
        apply_intent(s, "p-0", &Intent::Roll, &mut roller)
    })
    .await
    .unwrap_err();

    assert!(matches!(
        err,
        DomainError::Conflict(ConflictKind::RetriesExhausted, _)
    ));
}

#[tokio::test]
async fn rejected_intent_writes_nothing() {
    let store = MemoryRoomStore::new();
    store.insert("ROOM04", &two_player_room()).await.unwrap();
    let mut roller = ScriptedRoller::parse("AAAAA");

    let err = run_room_txn(&store, "ROOM04", ActionId::new(), fast(), |s| {
        apply_intent(s, "p-1", &Intent::Roll, &mut roller)
    })
    .await
    .unwrap_err();

    assert!(matches!(
        err,
        DomainError::Validation(ValidationKind::OutOfTurn, _)
    ));
    let room = store.load("ROOM04").await.unwrap().unwrap();
    assert_eq!(room.lock_version, 1);
    assert_eq!(room.state, two_player_room());
}

#[tokio::test]
async fn last_player_leaving_deletes_the_room() {
    let store = MemoryRoomStore::new();
    let lobby = RoomState::new(Player::new("h", "Host"), Rules::default());
    store.insert("ROOM05", &lobby).await.unwrap();
    let mut roller = ScriptedRoller::parse("A");

    let res = run_room_txn(&store, "ROOM05", ActionId::new(), fast(), |s| {
        apply_intent(s, "h", &Intent::Leave, &mut roller)
    })
    .await
    .unwrap();

    assert_eq!(res.outcome, TxnOutcome::Committed);
    assert!(res.room.is_none());
    assert!(store.is_empty());

    let err = run_room_txn(&store, "ROOM05", ActionId::new(), fast(), |s| {
        apply_intent(s, "h", &Intent::Leave, &mut roller)
    })
    .await
    .unwrap_err();
    assert!(matches!(err, DomainError::NotFound(NotFoundKind::Room, _)));
}
