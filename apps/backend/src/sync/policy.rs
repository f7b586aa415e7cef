use std::time::Duration;

/// Retry budget for optimistic room transactions.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct RetryPolicy {
    /// Total tries, including the first.
    pub max_attempts: u32,
    /// Linear backoff step; attempt `n` waits `n * backoff_ms` before retrying.
    pub backoff_ms: u64,
}

impl RetryPolicy {
    pub const fn new(max_attempts: u32, backoff_ms: u64) -> Self {
        Self {
            max_attempts,
            backoff_ms,
        }
    }

    pub fn delay_after(&self, attempt: u32) -> Duration {
        Duration::from_millis(self.backoff_ms.saturating_mul(u64::from(attempt)))
    }
}

impl Default for RetryPolicy {
    fn default() -> Self {
        Self::new(16, 5)
    }
}
