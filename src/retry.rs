//! Opt-in retry with exponential backoff.
//!
//! The HTTP wrapper never retries on its own; callers wrap individual
//! operations when they want resilience. Client errors (4xx) are terminal.

use std::future::Future;
use std::time::Duration;

use crate::error::{ApiError, RequestError};

pub const DEFAULT_MAX_ATTEMPTS: u32 = 3;
pub const DEFAULT_BASE_DELAY: Duration = Duration::from_millis(1000);

/// Errors that can tell the retry loop which status code they carry.
pub trait RetryableError {
    fn status_code(&self) -> Option<u16>;

    /// 4xx errors are never retried.
    fn is_terminal(&self) -> bool {
        self.status_code().is_some_and(|s| (400..500).contains(&s))
    }
}

impl RetryableError for ApiError {
    fn status_code(&self) -> Option<u16> {
        self.status()
    }
}

impl RetryableError for RequestError {
    fn status_code(&self) -> Option<u16> {
        self.status()
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct RetryPolicy {
    pub max_attempts: u32,
    pub base_delay: Duration,
}

impl Default for RetryPolicy {
    fn default() -> Self {
        Self { max_attempts: DEFAULT_MAX_ATTEMPTS, base_delay: DEFAULT_BASE_DELAY }
    }
}

impl RetryPolicy {
    /// Delay slept after the failed attempt numbered `attempt` (0-based).
    #[must_use]
    pub fn delay_after(&self, attempt: u32) -> Duration {
        self.base_delay.saturating_mul(2_u32.saturating_pow(attempt))
    }
}

/// Run `op` until it succeeds, fails terminally, or attempts run out.
///
/// # Errors
///
/// Returns the first terminal (4xx) error, or the last error once
/// `policy.max_attempts` attempts have failed.
pub async fn retry_with_backoff<T, E, F, Fut>(policy: RetryPolicy, mut op: F) -> Result<T, E>
where
    E: RetryableError,
    F: FnMut() -> Fut,
    Fut: Future<Output = Result<T, E>>,
{
    let attempts = policy.max_attempts.max(1);
    let mut attempt = 0;
    loop {
        match op().await {
            Ok(value) => return Ok(value),
            Err(err) if err.is_terminal() => return Err(err),
            Err(err) => {
                attempt += 1;
                if attempt >= attempts {
                    tracing::warn!(attempts, status = ?err.status_code(), "retries exhausted");
                    return Err(err);
                }
                let delay = policy.delay_after(attempt - 1);
                tracing::debug!(attempt, delay_ms = u64::try_from(delay.as_millis()).unwrap_or(u64::MAX), "retrying after failure");
                tokio::time::sleep(delay).await;
            }
        }
    }
}

#[cfg(test)]
#[path = "retry_test.rs"]
mod tests;
