//! Startup orchestration.
//!
//! # Responsibilities
//! - Create the store client and drive it through the readiness guard
//! - Connect the event bus and the user directory for enabled services
//! - Assemble the HTTP server only after every dependency is ready
//!
//! # Design Decisions
//! - Fail fast: any startup error is fatal
//! - Subsystems initialize in order, not concurrently
//! - Listeners start last (traffic only when ready)

use std::sync::Arc;

use thiserror::Error;
use tokio::sync::broadcast;
use tokio::sync::broadcast::error::TryRecvError;

use crate::config::StorefrontConfig;
use crate::directory::{DirectoryError, HttpUserDirectory, UserDirectory};
use crate::events::{EventPublisher, NatsPublisher, PublishError};
use crate::http::{HttpServer, Services};
use crate::resilience::{ReadinessError, ReadinessGuard};
use crate::store::{InventoryStore, PgStore, StoreError};
use crate::web::WebState;

#[derive(Debug, Error)]
pub enum StartupError {
    #[error("store client: {0}")]
    Store(#[from] StoreError),

    #[error(transparent)]
    Readiness(#[from] ReadinessError),

    #[error("event bus: {0}")]
    Events(#[from] PublishError),

    #[error("user directory: {0}")]
    Directory(#[from] DirectoryError),

    #[error("templates: {0}")]
    Views(#[from] tera::Error),

    #[error("inventory and web services need a store client")]
    StoreRequired,
}

/// Create the Postgres client. No connection is opened here.
pub fn connect_store(config: &StorefrontConfig) -> Result<Arc<dyn InventoryStore>, StartupError> {
    Ok(Arc::new(PgStore::connect_lazy(&config.database)?))
}

/// Guard the store, then bring up the remaining enabled services.
///
/// `store` is required, and only touched, when a store-backed service is
/// enabled. Nothing is returned unless the guard succeeded.
pub async fn build_services(
    config: &StorefrontConfig,
    store: Option<Arc<dyn InventoryStore>>,
) -> Result<Services, StartupError> {
    let enabled = config.services;
    let mut services = Services::default();

    if enabled.needs_store() {
        let store = store.ok_or(StartupError::StoreRequired)?;
        let guard = ReadinessGuard::from_config(&config.readiness);
        let report = guard.run(store.as_ref()).await?;
        tracing::info!(
            attempts = report.attempt_count(),
            waited = ?report.total_delay(),
            "Store ready"
        );

        if enabled.inventory {
            services.inventory = Some(store.clone());
        }
        if enabled.web {
            services.web = Some(WebState::new(store)?);
        }
    }

    if enabled.orders {
        let publisher: Arc<dyn EventPublisher> = Arc::new(NatsPublisher::connect(&config.events).await?);
        services.orders = Some(publisher);
    }

    if enabled.users {
        let directory: Arc<dyn UserDirectory> = Arc::new(HttpUserDirectory::new(&config.users)?);
        services.users = Some(directory);
    }

    Ok(services)
}

/// Build a ready-to-run server from configuration.
///
/// The store client is only created when a store-backed service is enabled.
pub async fn prepare(config: &StorefrontConfig) -> Result<HttpServer, StartupError> {
    let store = if config.services.needs_store() {
        Some(connect_store(config)?)
    } else {
        None
    };
    let services = build_services(config, store).await?;
    Ok(HttpServer::new(config, services))
}

/// [`prepare`], then check `shutdown` for a signal received meanwhile.
///
/// Startup itself is not interrupted. `Ok(None)` means shutdown was requested
/// before the server could bind, and the caller should exit.
pub async fn prepare_until_shutdown(
    config: &StorefrontConfig,
    shutdown: &mut broadcast::Receiver<()>,
) -> Result<Option<HttpServer>, StartupError> {
    let server = prepare(config).await?;
    match shutdown.try_recv() {
        Err(TryRecvError::Empty) => Ok(Some(server)),
        _ => {
            tracing::info!("Shutdown requested during startup, not binding");
            Ok(None)
        }
    }
}
