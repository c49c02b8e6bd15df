//! Order submission: validates the request and publishes it as an event.

use std::sync::Arc;

use axum::extract::State;
use axum::routing::post;
use axum::{Json, Router};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::events::EventPublisher;
use crate::http::error::ApiError;
use crate::observability::metrics;

type Publisher = Arc<dyn EventPublisher>;

/// Incoming order.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct OrderRequest {
    #[serde(default)]
    pub item_name: String,
    #[serde(default)]
    pub quantity: i32,
}

/// Event envelope placed on the bus.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct OrderEvent {
    pub event_id: Uuid,
    pub item_name: String,
    pub quantity: i32,
}

impl From<OrderRequest> for OrderEvent {
    fn from(order: OrderRequest) -> Self {
        Self {
            event_id: Uuid::new_v4(),
            item_name: order.item_name,
            quantity: order.quantity,
        }
    }
}

#[derive(Debug, Serialize, Deserialize)]
pub struct OrderAccepted {
    pub message: String,
    pub event_id: Uuid,
}

pub fn router(publisher: Publisher) -> Router {
    Router::new()
        .route("/orders", post(submit_order))
        .with_state(publisher)
}

pub async fn submit_order(
    State(publisher): State<Publisher>,
    Json(order): Json<OrderRequest>,
) -> Result<Json<OrderAccepted>, ApiError> {
    if order.item_name.trim().is_empty() {
        return Err(ApiError::bad_request("item_name is required"));
    }

    let event = OrderEvent::from(order);
    let payload = serde_json::to_vec(&event)
        .map_err(|e| ApiError::new(axum::http::StatusCode::INTERNAL_SERVER_ERROR, e.to_string()))?;

    let mut batch = publisher.create_batch().await?;
    if !batch.try_add(payload) {
        tracing::warn!(event_id = %event.event_id, max_bytes = batch.max_bytes(), "Order event does not fit in batch");
        return Err(ApiError::bad_request("Failed to add event to batch."));
    }
    publisher.send(batch).await?;

    metrics::record_order_published();
    tracing::info!(
        event_id = %event.event_id,
        item_name = %event.item_name,
        quantity = event.quantity,
        "Order event published"
    );

    Ok(Json(OrderAccepted {
        message: "Order event published!".to_string(),
        event_id: event.event_id,
    }))
}
