mod common;

use std::sync::Arc;

use axum::body::Body;
use axum::http::{header, Request, StatusCode};
use tower::ServiceExt;

use common::{body_json, connection_refused, syntax_error, FailingStore, MemoryStore};
use storefront::http::{build_router, Services};
use storefront::StorefrontConfig;

fn app(store: Arc<dyn storefront::store::InventoryStore>) -> axum::Router {
    let services = Services {
        inventory: Some(store),
        ..Services::default()
    };
    build_router(&StorefrontConfig::default(), services)
}

fn post_json(uri: &str, body: &str) -> Request<Body> {
    Request::post(uri)
        .header(header::CONTENT_TYPE, "application/json")
        .body(Body::from(body.to_string()))
        .unwrap()
}

#[tokio::test]
async fn test_create_then_fetch_item() {
    let store = Arc::new(MemoryStore::new());
    let app = app(store.clone());

    let response = app
        .clone()
        .oneshot(post_json("/inventory", r#"{"name":"Widget","quantity":3,"price":2.5}"#))
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::CREATED);
    assert_eq!(response.headers()[header::LOCATION], "/inventory/1");

    let created = body_json(response).await;
    assert_eq!(created["id"], 1);
    assert_eq!(created["name"], "Widget");
    assert_eq!(created["price"], 2.5);

    let response = app
        .clone()
        .oneshot(Request::get("/inventory/1").body(Body::empty()).unwrap())
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::OK);
    assert_eq!(body_json(response).await["quantity"], 3);

    let response = app
        .oneshot(Request::get("/inventory").body(Body::empty()).unwrap())
        .await
        .unwrap();
    let list = body_json(response).await;
    assert_eq!(list.as_array().unwrap().len(), 1);
    assert_eq!(store.items().len(), 1);
}

#[tokio::test]
async fn test_blank_name_rejected() {
    let store = Arc::new(MemoryStore::new());
    let response = app(store.clone())
        .oneshot(post_json("/inventory", r#"{"name":"  ","quantity":1}"#))
        .await
        .unwrap();

    assert_eq!(response.status(), StatusCode::BAD_REQUEST);
    let body = body_json(response).await;
    assert_eq!(body["error"]["code"], "bad_request");
    assert_eq!(body["error"]["message"], "name is required");
    assert!(store.items().is_empty());
}

#[tokio::test]
async fn test_missing_item_is_404() {
    let response = app(Arc::new(MemoryStore::new()))
        .oneshot(Request::get("/inventory/42").body(Body::empty()).unwrap())
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::NOT_FOUND);
}

#[tokio::test]
async fn test_store_failures_map_to_status() {
    let response = app(Arc::new(FailingStore(connection_refused)))
        .oneshot(Request::get("/inventory").body(Body::empty()).unwrap())
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::SERVICE_UNAVAILABLE);

    let response = app(Arc::new(FailingStore(syntax_error)))
        .oneshot(Request::get("/inventory").body(Body::empty()).unwrap())
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::INTERNAL_SERVER_ERROR);
    assert_eq!(body_json(response).await["error"]["code"], "internal_error");
}

#[tokio::test]
async fn test_oversized_body_rejected() {
    let mut config = StorefrontConfig::default();
    config.security.max_body_size = 16;
    let services = Services {
        inventory: Some(Arc::new(MemoryStore::new())),
        ..Services::default()
    };

    let response = build_router(&config, services)
        .oneshot(post_json("/inventory", r#"{"name":"a much longer name than sixteen bytes"}"#))
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::PAYLOAD_TOO_LARGE);
}
