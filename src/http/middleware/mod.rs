//! Request middleware shared by every service router.

pub mod metrics;

pub use metrics::track_requests;
