//! One-shot tracing setup shared by unit and integration tests.

use once_cell::sync::OnceCell;
use tracing_subscriber::{fmt, EnvFilter};

static INITIALIZED: OnceCell<()> = OnceCell::new();

/// Level lookup order: `TEST_LOG`, then `RUST_LOG`, then `"warn"`.
fn test_filter() -> EnvFilter {
    std::env::var("TEST_LOG")
        .or_else(|_| std::env::var("RUST_LOG"))
        .map(EnvFilter::new)
        .unwrap_or_else(|_| EnvFilter::new("warn"))
}

/// Install a quiet, capture-friendly subscriber. Idempotent; safe to call
/// from every test and from a `ctor` hook.
///
/// ```bash
/// TEST_LOG=farkle=debug cargo test -p farkle sync
/// ```
pub fn init() {
    INITIALIZED.get_or_init(|| {
        fmt()
            .with_env_filter(test_filter())
            .with_test_writer()
            .without_time()
            .with_target(true)
            .try_init()
            .ok();
    });
}
