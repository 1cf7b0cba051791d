use super::clock::Clock;
use std::future::Future;
use std::time::Duration;

/// Bounded retry with exponential backoff for calls to remote collaborators
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct RetryPolicy {
    /// Total attempts including the first one, never below 1
    pub max_attempts: u32,
    /// Wait before the second attempt, doubled after each further failure
    pub initial_backoff: Duration,
}

impl RetryPolicy {
    pub fn new(max_attempts: u32, initial_backoff: Duration) -> Self {
        Self {
            max_attempts: max_attempts.max(1),
            initial_backoff,
        }
    }

    /// Single attempt, no waiting
    pub fn no_retry() -> Self {
        Self::new(1, Duration::ZERO)
    }

    /// Backoff to apply after the given failed attempt (1-based)
    pub fn backoff_after(&self, attempt: u32) -> Duration {
        let exponent = attempt.saturating_sub(1).min(16);
        self.initial_backoff.saturating_mul(1 << exponent)
    }
}

impl Default for RetryPolicy {
    fn default() -> Self {
        Self::new(3, Duration::from_secs(1))
    }
}

/// Run `operation` until it succeeds or the policy's attempts are spent.
///
/// Returns the last error when every attempt failed. Backoff sleeps go
/// through `clock`.
pub async fn retry_with_backoff<T, E, F, Fut>(
    policy: &RetryPolicy,
    clock: &dyn Clock,
    operation_name: &str,
    mut operation: F,
) -> Result<T, E>
where
    F: FnMut() -> Fut,
    Fut: Future<Output = Result<T, E>>,
    E: std::fmt::Display,
{
    let mut attempt = 1;

    loop {
        match operation().await {
            Ok(value) => return Ok(value),
            Err(e) if attempt < policy.max_attempts => {
                let backoff = policy.backoff_after(attempt);
                tracing::warn!(
                    operation = operation_name,
                    attempt = attempt,
                    max_attempts = policy.max_attempts,
                    backoff_ms = backoff.as_millis() as u64,
                    error = %e,
                    "Remote call failed, retrying"
                );
                clock.sleep(backoff).await;
                attempt += 1;
            }
            Err(e) => {
                tracing::error!(
                    operation = operation_name,
                    attempts = attempt,
                    error = %e,
                    "Remote call failed, giving up"
                );
                return Err(e);
            }
        }
    }
}
