//! Resilience subsystem.
//!
//! # Data Flow
//! ```text
//! Process startup:
//!     → readiness.rs (migrate the store, fixed-delay bounded retry, fail fast)
//!
//! Each store query:
//!     → retries.rs (retry connection failures only)
//!     → backoff.rs (exponential delay with jitter, capped)
//! ```
//!
//! # Design Decisions
//! - Classification lives with the store (`store::classify`); both loops share it
//! - The startup guard and the per-query retry are independent policies

pub mod backoff;
pub mod readiness;
pub mod retries;

pub use readiness::{AttemptOutcome, ReadinessAttempt, ReadinessError, ReadinessGuard, ReadinessReport};
pub use retries::{retry_transient, RetryPolicy};
