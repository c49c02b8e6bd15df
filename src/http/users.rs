//! User lookup, proxied to the third-party directory.

use std::sync::Arc;

use axum::extract::{Path, State};
use axum::routing::get;
use axum::{Json, Router};

use crate::directory::{User, UserDirectory};
use crate::http::error::ApiError;

type Directory = Arc<dyn UserDirectory>;

pub fn router(directory: Directory) -> Router {
    Router::new()
        .route("/users/{id}", get(get_user))
        .with_state(directory)
}

pub async fn get_user(
    State(directory): State<Directory>,
    Path(id): Path<i64>,
) -> Result<Json<User>, ApiError> {
    Ok(Json(directory.fetch_user(id).await?))
}
