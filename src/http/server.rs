//! HTTP server setup and configuration.
//!
//! # Responsibilities
//! - Mount the router of every enabled service
//! - Wire up middleware (tracing, timeouts, body limit, request ID, metrics)
//! - Serve on a bound listener until shutdown is signalled

use std::sync::Arc;
use std::time::Duration;

use axum::extract::DefaultBodyLimit;
use axum::{middleware, Router};
use tokio::net::TcpListener;
use tokio::sync::broadcast;
use tower_http::request_id::{MakeRequestUuid, PropagateRequestIdLayer, SetRequestIdLayer};
use tower_http::timeout::TimeoutLayer;
use tower_http::trace::TraceLayer;

use crate::config::StorefrontConfig;
use crate::directory::UserDirectory;
use crate::events::EventPublisher;
use crate::http::middleware::track_requests;
use crate::http::{inventory, orders, status, users};
use crate::store::InventoryStore;
use crate::web::{self, WebState};

/// Backing dependencies of the enabled services. A `None` service is not mounted.
#[derive(Clone, Default)]
pub struct Services {
    pub inventory: Option<Arc<dyn InventoryStore>>,
    pub orders: Option<Arc<dyn EventPublisher>>,
    pub users: Option<Arc<dyn UserDirectory>>,
    pub web: Option<WebState>,
}

impl Services {
    /// Names of the mounted services.
    pub fn names(&self) -> Vec<&'static str> {
        [
            ("inventory", self.inventory.is_some()),
            ("orders", self.orders.is_some()),
            ("users", self.users.is_some()),
            ("web", self.web.is_some()),
        ]
        .into_iter()
        .filter_map(|(name, on)| on.then_some(name))
        .collect()
    }
}

/// Build the application router with all middleware layers.
#[allow(deprecated)]
pub fn build_router(config: &StorefrontConfig, services: Services) -> Router {
    let mut router = status::router(services.names());

    if let Some(store) = services.inventory {
        router = router.merge(inventory::router(store));
    }
    if let Some(publisher) = services.orders {
        router = router.merge(orders::router(publisher));
    }
    if let Some(directory) = services.users {
        router = router.merge(users::router(directory));
    }
    if let Some(state) = services.web {
        router = router.merge(web::router(state));
    }

    router
        .route_layer(middleware::from_fn(track_requests))
        .layer(DefaultBodyLimit::max(config.security.max_body_size))
        .layer(TimeoutLayer::new(Duration::from_secs(config.timeouts.request_secs)))
        .layer(PropagateRequestIdLayer::x_request_id())
        .layer(TraceLayer::new_for_http())
        .layer(SetRequestIdLayer::x_request_id(MakeRequestUuid))
}

/// HTTP server for the storefront services.
pub struct HttpServer {
    router: Router,
    services: Vec<&'static str>,
}

impl HttpServer {
    /// Create a new HTTP server mounting the given services.
    pub fn new(config: &StorefrontConfig, services: Services) -> Self {
        let names = services.names();
        Self {
            router: build_router(config, services),
            services: names,
        }
    }

    /// The assembled router, for in-process use.
    pub fn router(&self) -> Router {
        self.router.clone()
    }

    pub fn services(&self) -> &[&'static str] {
        &self.services
    }

    /// Run the server, accepting connections on the given listener.
    pub async fn run(
        self,
        listener: TcpListener,
        mut shutdown: broadcast::Receiver<()>,
    ) -> Result<(), std::io::Error> {
        let addr = listener.local_addr()?;
        tracing::info!(address = %addr, services = ?self.services, "HTTP server starting");

        axum::serve(listener, self.router)
            .with_graceful_shutdown(async move {
                let _ = shutdown.recv().await;
                tracing::info!("Shutdown signal received, draining connections");
            })
            .await?;

        tracing::info!("HTTP server stopped");
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use axum::body::Body;
    use axum::http::{Request, StatusCode};
    use tower::ServiceExt;

    #[tokio::test]
    async fn test_status_only_router() {
        let app = build_router(&StorefrontConfig::default(), Services::default());

        let response = app
            .clone()
            .oneshot(Request::get("/health").body(Body::empty()).unwrap())
            .await
            .unwrap();
        assert_eq!(response.status(), StatusCode::OK);
        assert!(response.headers().contains_key("x-request-id"));

        let response = app
            .oneshot(Request::get("/inventory").body(Body::empty()).unwrap())
            .await
            .unwrap();
        assert_eq!(response.status(), StatusCode::NOT_FOUND);
    }

    #[tokio::test]
    async fn test_request_id_is_propagated() {
        let app = build_router(&StorefrontConfig::default(), Services::default());
        let response = app
            .oneshot(
                Request::get("/health")
                    .header("x-request-id", "abc-123")
                    .body(Body::empty())
                    .unwrap(),
            )
            .await
            .unwrap();
        assert_eq!(response.headers()["x-request-id"], "abc-123");
    }

    #[tokio::test]
    async fn test_serve_until_shutdown() {
        let listener = TcpListener::bind("127.0.0.1:0").await.unwrap();
        let (tx, rx) = broadcast::channel(1);
        let server = HttpServer::new(&StorefrontConfig::default(), Services::default());
        assert!(server.services().is_empty());

        let handle = tokio::spawn(server.run(listener, rx));
        tx.send(()).unwrap();
        handle.await.unwrap().unwrap();
    }
}
