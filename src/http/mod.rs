//! HTTP subsystem.
//!
//! # Data Flow
//! ```text
//! TCP connection
//!     → server.rs (request ID, trace, timeout, body limit)
//!     → middleware/ (per-route metrics)
//!     → inventory.rs | orders.rs | users.rs | status.rs | web::
//!     → error.rs (JSON error envelope)
//! ```

pub mod error;
pub mod inventory;
pub mod middleware;
pub mod orders;
pub mod server;
pub mod status;
pub mod users;

pub use error::ApiError;
pub use server::{build_router, HttpServer, Services};
