//! Startup readiness guard.
//!
//! Brings the store to a migrated, query-ready state before any request can
//! be served. A store that is still starting up (connection refused, SQLSTATE
//! 57P03) is retried a bounded number of times with a fixed delay; any other
//! failure aborts startup on the spot.
//!
//! # State Machine
//! ```text
//! start ─▶ Attempting(0)
//! Attempting(i) ── success ─────────────────────▶ Ready
//! Attempting(i) ── retryable, i+1 < N ── sleep D ▶ Attempting(i+1)
//! Attempting(i) ── retryable, i+1 = N ──────────▶ Aborted (exhausted)
//! Attempting(i) ── fatal ───────────────────────▶ Aborted
//! ```
//!
//! # Design Decisions
//! - Exhausting all attempts is fatal: the service never starts against an
//!   unready store
//! - The delay is fixed, not exponential; it is awaited inline on the startup
//!   path so nothing else proceeds
//! - One guard per process start, discarded once it terminates

use std::time::Duration;

use thiserror::Error;

use crate::config::ReadinessConfig;
use crate::observability::metrics;
use crate::store::{FailureKind, Migrate, StoreError};

/// Result of a single readiness attempt.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum AttemptOutcome {
    Success,
    RetryableFailure,
    FatalFailure,
}

impl AttemptOutcome {
    fn as_str(self) -> &'static str {
        match self {
            AttemptOutcome::Success => "success",
            AttemptOutcome::RetryableFailure => "retryable",
            AttemptOutcome::FatalFailure => "fatal",
        }
    }
}

/// One attempt of a guard run.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ReadinessAttempt {
    /// 0-based, always below the configured maximum.
    pub index: u32,
    pub outcome: AttemptOutcome,
    /// Delay applied before the next attempt. Zero when none follows.
    pub delay: Duration,
}

/// Every attempt made during one guard run, in order.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ReadinessReport {
    attempts: Vec<ReadinessAttempt>,
}

impl ReadinessReport {
    pub fn attempts(&self) -> &[ReadinessAttempt] {
        &self.attempts
    }

    pub fn attempt_count(&self) -> u32 {
        self.attempts.len() as u32
    }

    /// Number of inter-attempt sleeps.
    pub fn delay_count(&self) -> u32 {
        // Every attempt but the last is followed by a delay.
        self.attempt_count().saturating_sub(1)
    }

    /// Total time spent sleeping between attempts.
    pub fn total_delay(&self) -> Duration {
        self.attempts.iter().map(|a| a.delay).sum()
    }

    fn record(&mut self, index: u32, outcome: AttemptOutcome, delay: Duration) {
        metrics::record_readiness_attempt(outcome.as_str());
        self.attempts.push(ReadinessAttempt {
            index,
            outcome,
            delay,
        });
    }
}

/// Terminal failures of a guard run.
#[derive(Debug, Error)]
pub enum ReadinessError {
    /// A non-retryable failure. No further attempts were made.
    #[error("store readiness failed on attempt {attempts}")]
    Fatal {
        attempts: u32,
        source: StoreError,
        report: ReadinessReport,
    },

    /// Every attempt failed to reach the store.
    #[error("store still unreachable after {attempts} attempts")]
    Exhausted {
        attempts: u32,
        #[source]
        last: StoreError,
        report: ReadinessReport,
    },
}

impl ReadinessError {
    pub fn report(&self) -> &ReadinessReport {
        match self {
            ReadinessError::Fatal { report, .. } | ReadinessError::Exhausted { report, .. } => {
                report
            }
        }
    }
}

/// Bounded-retry guard around the store's migration step.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ReadinessGuard {
    max_attempts: u32,
    delay: Duration,
}

impl ReadinessGuard {
    /// `max_attempts` is clamped to at least one.
    pub fn new(max_attempts: u32, delay: Duration) -> Self {
        Self {
            max_attempts: max_attempts.max(1),
            delay,
        }
    }

    pub fn from_config(config: &ReadinessConfig) -> Self {
        Self::new(config.max_attempts, Duration::from_secs(config.delay_secs))
    }

    pub fn max_attempts(&self) -> u32 {
        self.max_attempts
    }

    pub fn delay(&self) -> Duration {
        self.delay
    }

    /// Drive `store` to readiness or fail.
    pub async fn run<M>(&self, store: &M) -> Result<ReadinessReport, ReadinessError>
    where
        M: Migrate + ?Sized,
    {
        let mut report = ReadinessReport::default();
        let mut index = 0;

        loop {
            tracing::info!(
                attempt = index + 1,
                max_attempts = self.max_attempts,
                "Applying database migrations"
            );

            let err = match store.migrate().await {
                Ok(()) => {
                    report.record(index, AttemptOutcome::Success, Duration::ZERO);
                    tracing::info!(attempts = index + 1, "Database migration complete");
                    return Ok(report);
                }
                Err(err) => err,
            };

            match err.kind() {
                FailureKind::Fatal => {
                    report.record(index, AttemptOutcome::FatalFailure, Duration::ZERO);
                    tracing::error!(
                        attempt = index + 1,
                        error = %err,
                        "Non-recoverable store error during migration"
                    );
                    return Err(ReadinessError::Fatal {
                        attempts: index + 1,
                        source: err,
                        report,
                    });
                }
                FailureKind::Retryable if index + 1 < self.max_attempts => {
                    report.record(index, AttemptOutcome::RetryableFailure, self.delay);
                    tracing::warn!(
                        attempt = index + 1,
                        max_attempts = self.max_attempts,
                        delay = ?self.delay,
                        error = %err,
                        "Database connection failed, retrying"
                    );
                    tokio::time::sleep(self.delay).await;
                    index += 1;
                }
                FailureKind::Retryable => {
                    report.record(index, AttemptOutcome::RetryableFailure, Duration::ZERO);
                    tracing::error!(
                        attempts = self.max_attempts,
                        error = %err,
                        "Database still unreachable, giving up"
                    );
                    return Err(ReadinessError::Exhausted {
                        attempts: self.max_attempts,
                        last: err,
                        report,
                    });
                }
            }
        }
    }
}
