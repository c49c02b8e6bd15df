//! Storefront server.
//!
//! # Architecture Overview
//!
//! ```text
//!   startup:  config → logging/metrics → store client → readiness guard
//!                                                        │ (fail fast)
//!                                                        ▼
//!             event bus + user directory → HTTP server → bind listener
//!
//!   request:  request id → trace → timeout → body limit → metrics
//!                 → /inventory | /orders | /users | /ui/inventory | /health
//! ```

use std::path::PathBuf;

use clap::Parser;
use tokio::net::TcpListener;

use storefront::config::load_or_default;
use storefront::lifecycle::{signals, startup, Shutdown};
use storefront::observability::{logging, metrics};

#[derive(Parser, Debug)]
#[command(name = "storefront", version, about = "Inventory, order and user services")]
struct Args {
    /// Path to a TOML config file. Defaults apply when omitted.
    #[arg(short, long, env = "STOREFRONT_CONFIG")]
    config: Option<PathBuf>,
}

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    let args = Args::parse();
    let config = load_or_default(args.config.as_deref())?;

    logging::init_logging(&config.observability)?;

    tracing::info!(version = env!("CARGO_PKG_VERSION"), "storefront starting");
    tracing::info!(
        bind_address = %config.listener.bind_address,
        services = ?config.services.enabled(),
        readiness_max_attempts = config.readiness.max_attempts,
        readiness_delay_secs = config.readiness.delay_secs,
        "Configuration loaded"
    );

    if config.observability.metrics_enabled {
        let addr = config.observability.metrics_address.parse()?;
        metrics::init_metrics(addr)?;
    }

    let shutdown = Shutdown::new();
    let mut shutdown_rx = shutdown.subscribe();
    signals::spawn_shutdown_on_signal(shutdown.clone());

    let server = match startup::prepare_until_shutdown(&config, &mut shutdown_rx).await {
        Ok(Some(server)) => server,
        Ok(None) => return Ok(()),
        Err(e) => {
            tracing::error!(error = %e, "Startup failed");
            return Err(e.into());
        }
    };

    let listener = TcpListener::bind(&config.listener.bind_address).await?;
    tracing::info!(address = %listener.local_addr()?, "Listening for connections");

    server.run(listener, shutdown_rx).await?;

    tracing::info!("Shutdown complete");
    Ok(())
}
