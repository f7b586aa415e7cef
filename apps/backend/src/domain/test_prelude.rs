use std::env;

use proptest::prelude::ProptestConfig;

/// Proptest config; raise the case count locally with `PROPTEST_CASES`.
pub fn proptest_config() -> ProptestConfig {
    let cases = env::var("PROPTEST_CASES")
        .ok()
        .and_then(|s| s.parse().ok())
        .unwrap_or(64);

    ProptestConfig {
        cases,
        ..ProptestConfig::default()
    }
}
