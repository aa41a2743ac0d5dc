use std::future::Future;
use std::time::Duration;

use tokio::time::sleep;

use crate::error::{ResponseError, Result};

/// Exponential backoff retry policy.
///
/// Attempts are 1-indexed. After attempt `k` fails with a retryable error
/// (and `k < max_attempts`) the policy waits `base_delay * 2^(k-1)`.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct RetryPolicy {
    max_attempts: u32,
    base_delay: Duration,
}

impl Default for RetryPolicy {
    fn default() -> Self {
        Self::exponential(3, Duration::from_millis(1000))
    }
}

impl RetryPolicy {
    pub fn exponential(max_attempts: u32, base_delay: Duration) -> Self {
        Self {
            max_attempts: max_attempts.max(1),
            base_delay,
        }
    }

    pub fn max_attempts(&self) -> u32 {
        self.max_attempts
    }

    pub fn delay_for_attempt(&self, attempt: u32) -> Duration {
        let factor = 2u32.saturating_pow(attempt.saturating_sub(1));
        self.base_delay.saturating_mul(factor)
    }

    /// Run `op` until it succeeds, fails with a non-retryable error, or the
    /// attempt budget is spent. The last classified error is returned.
    pub async fn run<T, F, Fut>(&self, mut op: F) -> Result<T>
    where
        F: FnMut(u32) -> Fut,
        Fut: Future<Output = Result<T>>,
    {
        let mut attempt = 1;
        loop {
            match op(attempt).await {
                Ok(value) => {
                    if attempt > 1 {
                        tracing::info!("Request succeeded on attempt {}", attempt);
                    }
                    return Ok(value);
                }
                Err(e) if !e.is_retryable() => {
                    tracing::warn!("Attempt {} failed with non-retryable error: {}", attempt, e);
                    return Err(e);
                }
                Err(e) if attempt >= self.max_attempts => {
                    tracing::warn!("Giving up after {} attempts: {}", attempt, e);
                    return Err(e);
                }
                Err(e) => {
                    let delay = self.delay_for_attempt(attempt);
                    tracing::warn!(
                        "Attempt {}/{} failed: {} - retrying in {} ms",
                        attempt,
                        self.max_attempts,
                        e,
                        delay.as_millis()
                    );
                    sleep(delay).await;
                    attempt += 1;
                }
            }
        }
    }
}

/// Race `fut` against a timer. The losing future is dropped, so a response
/// that arrives after the deadline is never observed.
pub async fn with_timeout<T, Fut>(timeout: Duration, fut: Fut) -> Result<T>
where
    Fut: Future<Output = Result<T>>,
{
    match tokio::time::timeout(timeout, fut).await {
        Ok(result) => result,
        Err(_) => Err(ResponseError::Timeout {
            timeout_ms: timeout.as_millis() as u64,
        }),
    }
}
