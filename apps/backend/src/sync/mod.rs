//! Synchronization layer: room transitions as conflict-checked,
//! idempotent transactions over the shared room record.

pub mod intent;
pub mod policy;
pub mod txn;

#[cfg(test)]
mod tests_txn;

pub use intent::{apply_intent, Intent, IntentEffect};
pub use policy::RetryPolicy;
pub use txn::{run_room_txn, TxnOutcome, TxnResult};
