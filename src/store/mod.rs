//! Persistent store subsystem.
//!
//! # Data Flow
//! ```text
//! startup.rs
//!     → PgStore::connect_lazy (builds the pool, no I/O yet)
//!     → resilience::readiness (Migrate::migrate under the startup guard)
//!     → handlers (InventoryStore queries, each under the transient retry policy)
//! ```
//!
//! # Design Decisions
//! - Handlers see the store only through [`InventoryStore`]
//! - Errors are structured ([`StoreError`]) and classified by [`classify`]
//! - Migrations are embedded from `migrations/` at compile time

pub mod error;
pub mod models;
pub mod postgres;

use async_trait::async_trait;

pub use error::{classify, FailureKind, StoreError};
pub use models::{InventoryItem, NewInventoryItem};
pub use postgres::PgStore;

/// Brings the store to a migrated, query-ready state.
#[async_trait]
pub trait Migrate: Send + Sync {
    /// Open a connection and apply any pending schema changes.
    async fn migrate(&self) -> Result<(), StoreError>;
}

/// Inventory persistence.
#[async_trait]
pub trait InventoryStore: Migrate {
    /// All items, ordered by id.
    async fn list_items(&self) -> Result<Vec<InventoryItem>, StoreError>;

    async fn get_item(&self, id: i32) -> Result<Option<InventoryItem>, StoreError>;

    /// Persist a new item and return it with its assigned id.
    async fn create_item(&self, item: NewInventoryItem) -> Result<InventoryItem, StoreError>;
}
