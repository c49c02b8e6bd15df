//! Connection-level retry for individual store operations.
//!
//! # Responsibilities
//! - Retry a single query when the store cannot be reached
//! - Back off exponentially between attempts, capped at a configured maximum
//!
//! # Design Decisions
//! - Only [`FailureKind::Retryable`] failures are retried
//! - Not used for startup migration; the readiness guard owns that loop

use std::future::Future;
use std::time::Duration;

use crate::config::DatabaseConfig;
use crate::resilience::backoff::Backoff;
use crate::store::{FailureKind, StoreError};

/// Transient-failure retry settings for store operations.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct RetryPolicy {
    /// Retries after the first attempt.
    pub max_retries: u32,
    pub backoff: Backoff,
}

impl RetryPolicy {
    /// A policy that never retries.
    pub fn none() -> Self {
        Self {
            max_retries: 0,
            backoff: Backoff::new(Duration::ZERO, Duration::ZERO),
        }
    }
}

impl From<&DatabaseConfig> for RetryPolicy {
    fn from(config: &DatabaseConfig) -> Self {
        Self {
            max_retries: config.max_retry_count,
            backoff: Backoff::new(
                Duration::from_millis(config.retry_base_delay_ms),
                Duration::from_secs(config.max_retry_delay_secs),
            ),
        }
    }
}

/// Run `op`, retrying retryable failures per `policy`.
pub async fn retry_transient<T, F, Fut>(
    policy: &RetryPolicy,
    operation: &'static str,
    mut op: F,
) -> Result<T, StoreError>
where
    F: FnMut() -> Fut,
    Fut: Future<Output = Result<T, StoreError>>,
{
    let mut retries = 0;
    loop {
        match op().await {
            Ok(value) => return Ok(value),
            Err(e) if e.kind() == FailureKind::Retryable && retries < policy.max_retries => {
                retries += 1;
                let delay = policy.backoff.delay(retries);
                tracing::warn!(
                    operation,
                    retry = retries,
                    max_retries = policy.max_retries,
                    delay = ?delay,
                    error = %e,
                    "Transient store failure, retrying"
                );
                tokio::time::sleep(delay).await;
            }
            Err(e) => return Err(e),
        }
    }
}
