//! Liveness and status endpoints.

use axum::routing::get;
use axum::{Json, Router};
use serde::Serialize;

#[derive(Debug, Serialize)]
pub struct SystemStatus {
    pub version: &'static str,
    pub status: &'static str,
    pub services: Vec<&'static str>,
}

/// `/health` and `/status`. Only served once the store passed the readiness guard.
pub fn router(services: Vec<&'static str>) -> Router {
    Router::new()
        .route("/health", get(health))
        .route(
            "/status",
            get(move || {
                let services = services.clone();
                async move { get_status(services) }
            }),
        )
}

pub async fn health() -> Json<serde_json::Value> {
    Json(serde_json::json!({ "status": "ready" }))
}

fn get_status(services: Vec<&'static str>) -> Json<SystemStatus> {
    Json(SystemStatus {
        version: env!("CARGO_PKG_VERSION"),
        status: "operational",
        services,
    })
}
