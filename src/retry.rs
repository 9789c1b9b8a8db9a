use backoff::backoff::Constant;
use backoff::future::retry;
use std::future::Future;
use std::time::Duration;
use tracing::{info, warn};

use crate::error::GenerationError;

/// Retry policy for the text-generation transport: a bounded number of
/// attempts with a fixed pause between them.
#[derive(Debug, Clone)]
pub struct RetryConfig {
    /// Total attempts, the first one included.
    pub max_attempts: u32,
    pub delay: Duration,
}

impl Default for RetryConfig {
    fn default() -> Self {
        Self {
            max_attempts: 5,
            delay: Duration::from_secs(1),
        }
    }
}

impl RetryConfig {
    /// Fixed-interval schedule; the attempt budget is enforced by [`with_retry`].
    pub fn to_backoff(&self) -> Constant {
        Constant::new(self.delay)
    }
}

/// Run `operation` until it succeeds, fails with a non-retryable error, or
/// the attempt budget is spent. The last error is returned as-is.
pub async fn with_retry<F, Fut, T>(
    operation_name: &str,
    config: &RetryConfig,
    mut operation: F,
) -> Result<T, GenerationError>
where
    F: FnMut() -> Fut,
    Fut: Future<Output = Result<T, GenerationError>>,
{
    let max_attempts = config.max_attempts.max(1);
    let mut attempt = 0;

    retry(config.to_backoff(), || {
        attempt += 1;
        let current = attempt;
        let op = operation();

        async move {
            match op.await {
                Ok(result) => {
                    if current > 1 {
                        info!("{} succeeded on attempt {}", operation_name, current);
                    }
                    Ok(result)
                }
                Err(e) if e.is_retryable() && current < max_attempts => {
                    warn!(
                        "{} failed on attempt {} of {}: {}. Retrying...",
                        operation_name, current, max_attempts, e
                    );
                    Err(backoff::Error::transient(e))
                }
                Err(e) => {
                    if current > 1 {
                        warn!("{} failed after {} attempts: {}", operation_name, current, e);
                    }
                    Err(backoff::Error::permanent(e))
                }
            }
        }
    })
    .await
}
