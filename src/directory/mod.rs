//! Third-party user directory.
//!
//! # Data Flow
//! ```text
//! GET /users/{id}
//!     → UserDirectory::fetch_user
//!     → http.rs (GET {base_url}/users/{id}, JSON)
//!     → User { name, email }
//! ```

pub mod http;

use async_trait::async_trait;
use serde::{Deserialize, Serialize};
use thiserror::Error;

pub use http::HttpUserDirectory;

/// A user record as exposed by this service.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct User {
    pub name: String,
    pub email: String,
}

/// Errors from the user directory.
#[derive(Debug, Error)]
pub enum DirectoryError {
    #[error("user {0} not found")]
    NotFound(i64),

    /// Any non-success status other than 404.
    #[error("user directory returned status {0}")]
    Status(u16),

    /// Transport failure, timeout or undecodable body.
    #[error("user directory request failed: {0}")]
    Transport(String),

    #[error("invalid user directory configuration: {0}")]
    Config(String),
}

/// Lookup of users by numeric id.
#[async_trait]
pub trait UserDirectory: Send + Sync {
    async fn fetch_user(&self, id: i64) -> Result<User, DirectoryError>;
}
