//! Postgres-backed store.

use std::str::FromStr;
use std::time::Duration;

use async_trait::async_trait;
use sqlx::migrate::Migrator;
use sqlx::postgres::{PgConnectOptions, PgPool, PgPoolOptions};

use crate::config::DatabaseConfig;
use crate::resilience::retries::{retry_transient, RetryPolicy};
use crate::store::{InventoryItem, InventoryStore, Migrate, NewInventoryItem, StoreError};

static MIGRATOR: Migrator = sqlx::migrate!("./migrations");

/// Inventory store over a lazily connected Postgres pool.
#[derive(Clone)]
pub struct PgStore {
    pool: PgPool,
    retry: RetryPolicy,
}

impl PgStore {
    /// Build the pool without touching the network.
    ///
    /// The first connection is opened by [`Migrate::migrate`], which the
    /// startup guard drives.
    pub fn connect_lazy(config: &DatabaseConfig) -> Result<Self, StoreError> {
        let options = PgConnectOptions::from_str(&config.url)
            .map_err(|e| StoreError::Other(format!("invalid database url: {e}")))?;

        let pool = PgPoolOptions::new()
            .max_connections(config.max_connections)
            .acquire_timeout(Duration::from_secs(config.acquire_timeout_secs))
            .connect_lazy_with(options);

        tracing::debug!(
            max_connections = config.max_connections,
            acquire_timeout_secs = config.acquire_timeout_secs,
            "Postgres pool configured"
        );

        Ok(Self {
            pool,
            retry: RetryPolicy::from(config),
        })
    }

    /// The underlying pool.
    pub fn pool(&self) -> &PgPool {
        &self.pool
    }
}

#[async_trait]
impl Migrate for PgStore {
    async fn migrate(&self) -> Result<(), StoreError> {
        MIGRATOR.run(&self.pool).await?;
        Ok(())
    }
}

#[async_trait]
impl InventoryStore for PgStore {
    async fn list_items(&self) -> Result<Vec<InventoryItem>, StoreError> {
        let pool = &self.pool;
        retry_transient(&self.retry, "list_items", || async move {
            sqlx::query_as::<_, InventoryItem>(
                "SELECT id, name, quantity, price FROM inventory_items ORDER BY id",
            )
            .fetch_all(pool)
            .await
            .map_err(StoreError::from)
        })
        .await
    }

    async fn get_item(&self, id: i32) -> Result<Option<InventoryItem>, StoreError> {
        let pool = &self.pool;
        retry_transient(&self.retry, "get_item", || async move {
            sqlx::query_as::<_, InventoryItem>(
                "SELECT id, name, quantity, price FROM inventory_items WHERE id = $1",
            )
            .bind(id)
            .fetch_optional(pool)
            .await
            .map_err(StoreError::from)
        })
        .await
    }

    /// Runs once. A retried INSERT could store the item twice.
    async fn create_item(&self, item: NewInventoryItem) -> Result<InventoryItem, StoreError> {
        sqlx::query_as::<_, InventoryItem>(
            "INSERT INTO inventory_items (name, quantity, price) VALUES ($1, $2, $3) \
             RETURNING id, name, quantity, price",
        )
        .bind(&item.name)
        .bind(item.quantity)
        .bind(item.price)
        .fetch_one(&self.pool)
        .await
        .map_err(StoreError::from)
    }
}
