//! Storefront services library.
//!
//! Inventory, order and user services behind one axum server, plus the
//! startup readiness guard that keeps them offline until the store accepts
//! migrations.

// Core subsystems
pub mod config;
pub mod http;
pub mod store;
pub mod web;

// Service backends
pub mod directory;
pub mod events;

// Cross-cutting concerns
pub mod lifecycle;
pub mod observability;
pub mod resilience;

pub use config::StorefrontConfig;
pub use http::HttpServer;
pub use lifecycle::Shutdown;
pub use resilience::ReadinessGuard;
