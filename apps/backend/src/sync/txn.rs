//! Optimistic read-modify-write against a `RoomStore`.

use serde::Serialize;
use tracing::{debug, error, info, warn};

use super::RetryPolicy;
use crate::domain::state::{ActionId, RoomState};
use crate::errors::domain::{ConflictKind, DomainError, NotFoundKind};
use crate::store::{RoomStore, StoredRoom};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum TxnOutcome {
    /// The mutation ran and its write landed.
    Committed,
    /// The token was already applied; nothing changed.
    Duplicate,
}

#[derive(Debug)]
pub struct TxnResult<T> {
    pub outcome: TxnOutcome,
    /// Mutation output; `None` for a duplicate.
    pub value: Option<T>,
    /// Record after the transaction; `None` once the room was deleted.
    pub room: Option<StoredRoom>,
    pub attempts: u32,
}

/// Apply `mutate` to room `code` as one atomic transition.
///
/// Each attempt reads the record, short-circuits on a repeated
/// `action_id`, runs `mutate` on a copy, stamps the token and writes with
/// compare-and-swap. A lost race re-reads and re-runs `mutate`, so any
/// randomness it draws is drawn again. A room left with no players is
/// deleted instead of written.
pub async fn run_room_txn<T, F>(
    store: &dyn RoomStore,
    code: &str,
    action_id: ActionId,
    policy: RetryPolicy,
    mut mutate: F,
) -> Result<TxnResult<T>, DomainError>
where
    F: FnMut(&mut RoomState) -> Result<T, DomainError>,
{
    let max_attempts = policy.max_attempts.max(1);

    for attempt in 1..=max_attempts {
        let current = store.load(code).await?.ok_or_else(|| {
            DomainError::not_found(NotFoundKind::Room, format!("room {code} not found"))
        })?;

        if current.state.last_action_id == Some(action_id) {
            debug!(room = code, %action_id, "duplicate action ignored");
            return Ok(TxnResult {
                outcome: TxnOutcome::Duplicate,
                value: None,
                room: Some(current),
                attempts: attempt,
            });
        }

        let mut next = current.state.clone();
        let value = match mutate(&mut next) {
            Ok(v) => v,
            Err(e @ DomainError::Invariant(_)) => {
                error!(room = code, %action_id, error = %e, "invariant violation; mutation refused");
                return Err(e);
            }
            Err(e) => {
                warn!(room = code, %action_id, error = %e, "mutation rejected");
                return Err(e);
            }
        };
        next.last_action_id = Some(action_id);

        let write = if next.players.is_empty() {
            store
                .delete(code, current.lock_version)
                .await
                .map(|()| None)
        } else {
            store
                .compare_and_swap(code, current.lock_version, &next)
                .await
                .map(Some)
        };

        match write {
            Ok(room) => {
                info!(
                    room = code,
                    %action_id,
                    base_version = current.lock_version,
                    deleted = room.is_none(),
                    attempt,
                    "room transaction committed"
                );
                return Ok(TxnResult {
                    outcome: TxnOutcome::Committed,
                    value: Some(value),
                    room,
                    attempts: attempt,
                });
            }
            Err(e) if e.is_version_conflict() => {
                debug!(room = code, attempt, error = %e, "lost compare-and-swap; retrying");
                if attempt < max_attempts {
                    tokio::time::sleep(policy.delay_after(attempt)).await;
                }
            }
            Err(e) => return Err(e.into()),
        }
    }

    warn!(room = code, %action_id, max_attempts, "room transaction retries exhausted");
    Err(DomainError::conflict(
        ConflictKind::RetriesExhausted,
        format!("room {code} kept changing; gave up after {max_attempts} attempts"),
    ))
}
