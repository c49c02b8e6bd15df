//! JSON inventory API.

use std::sync::Arc;

use axum::extract::{Path, State};
use axum::http::{header, StatusCode};
use axum::response::IntoResponse;
use axum::routing::get;
use axum::{Json, Router};

use crate::http::error::ApiError;
use crate::store::{InventoryItem, InventoryStore, NewInventoryItem};

type Store = Arc<dyn InventoryStore>;

pub fn router(store: Store) -> Router {
    Router::new()
        .route("/inventory", get(list_items).post(create_item))
        .route("/inventory/{id}", get(get_item))
        .with_state(store)
}

pub async fn list_items(State(store): State<Store>) -> Result<Json<Vec<InventoryItem>>, ApiError> {
    Ok(Json(store.list_items().await?))
}

pub async fn get_item(
    State(store): State<Store>,
    Path(id): Path<i32>,
) -> Result<Json<InventoryItem>, ApiError> {
    store
        .get_item(id)
        .await?
        .map(Json)
        .ok_or_else(|| ApiError::not_found(format!("inventory item {id} not found")))
}

pub async fn create_item(
    State(store): State<Store>,
    Json(item): Json<NewInventoryItem>,
) -> Result<impl IntoResponse, ApiError> {
    item.validate().map_err(ApiError::bad_request)?;

    let created = store.create_item(item).await?;
    tracing::info!(id = created.id, name = %created.name, "Inventory item created");

    let location = format!("/inventory/{}", created.id);
    Ok((StatusCode::CREATED, [(header::LOCATION, location)], Json(created)))
}
