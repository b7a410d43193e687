//! Retry with exponential backoff for generation API calls

use std::time::Duration;

/// Retry policy for generation API calls
///
/// Controls how many times a failed request is attempted and how long to
/// wait between attempts using exponential backoff.
#[derive(Debug, Clone)]
pub struct RetryPolicy {
    /// Maximum number of attempts, including the first
    pub max_attempts: u32,
    /// Base delay; the wait before attempt `n + 1` is `base_delay * multiplier^n`
    pub base_delay: Duration,
    /// Backoff multiplier applied per attempt
    pub multiplier: u32,
}

impl Default for RetryPolicy {
    fn default() -> Self {
        Self {
            max_attempts: 5,
            base_delay: Duration::from_millis(1000),
            multiplier: 2,
        }
    }
}

impl RetryPolicy {
    /// Worst-case total wall-clock time spent waiting between attempts.
    #[must_use]
    pub fn total_backoff(&self) -> Duration {
        (1..self.max_attempts).fold(Duration::ZERO, |acc, attempt| {
            acc.saturating_add(delay_for_attempt(self, attempt))
        })
    }
}

/// Compute the delay before retrying after `attempt` failures.
///
/// `attempt` is the number of failures so far (1 after the first failure),
/// so the first wait is `base_delay * multiplier` and each subsequent wait
/// grows by the multiplier. Saturates rather than overflowing.
#[must_use]
pub fn delay_for_attempt(policy: &RetryPolicy, attempt: u32) -> Duration {
    policy
        .base_delay
        .saturating_mul(policy.multiplier.saturating_pow(attempt))
}
