//! Retry-with-backoff policy wrapping provider transport calls.
//!
//! Per-attempt timeouts live on the HTTP client itself (a timed-out
//! request surfaces as a transport error here); this layer only decides
//! whether and when to try again.

use std::future::Future;
use std::time::Duration;

use tokio::time::sleep;
use tracing::warn;

use crate::config::RetryConfig;
use crate::error::Error;
use crate::types::Vendor;

const MAX_BACKOFF: Duration = Duration::from_secs(5);

/// Retry policy for one provider's transport calls.
///
/// The schedule doubles from `backoff_base` on each attempt, capped at
/// five seconds. Only transient failures are retried; a 404 or decode
/// failure surfaces immediately.
#[derive(Debug, Clone)]
pub struct RetryPolicy {
    max_retries: u32,
    backoff_base: Duration,
}

impl RetryPolicy {
    pub fn new(max_retries: u32, backoff_base: Duration) -> Self {
        Self {
            max_retries,
            backoff_base,
        }
    }

    pub fn from_config(config: &RetryConfig) -> Self {
        Self::new(
            config.max_retries,
            Duration::from_millis(config.backoff_base_ms),
        )
    }

    /// Run `attempt` until it succeeds, fails permanently, or the retry
    /// budget is exhausted; the final error is returned as-is.
    pub async fn run<T, F, Fut>(&self, vendor: Vendor, operation: &str, mut attempt: F) -> Result<T, Error>
    where
        F: FnMut() -> Fut,
        Fut: Future<Output = Result<T, Error>>,
    {
        let mut delay = self.backoff_base;
        let mut remaining = self.max_retries;

        loop {
            match attempt().await {
                Ok(value) => return Ok(value),
                Err(err) if remaining > 0 && err.is_transient() => {
                    warn!(
                        "{vendor} {operation} failed ({err}), retrying in {:?} ({remaining} attempts left)",
                        delay
                    );
                    sleep(delay).await;
                    delay = (delay * 2).min(MAX_BACKOFF);
                    remaining -= 1;
                }
                Err(err) => return Err(err),
            }
        }
    }
}
