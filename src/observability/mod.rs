//! Observability subsystem.
//!
//! # Data Flow
//! ```text
//! All subsystems produce:
//!     → logging.rs (structured log events via `tracing`)
//!     → metrics.rs (counters, histograms)
//!
//! Consumers:
//!     → stdout (pretty, compact or JSON lines)
//!     → Metrics endpoint (Prometheus scrape)
//! ```
//!
//! # Design Decisions
//! - Structured fields on every event, never preformatted strings
//! - Request ID (`x-request-id`) attached at the HTTP edge
//! - Metric updates are no-ops until an exporter is installed

pub mod logging;
pub mod metrics;
