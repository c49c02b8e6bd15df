//! JSON error responses.

use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use axum::Json;
use serde::Serialize;

use crate::directory::DirectoryError;
use crate::events::PublishError;
use crate::store::{FailureKind, StoreError};

/// An error rendered as `{"error": {"code", "message"}}`.
#[derive(Debug)]
pub struct ApiError {
    status: StatusCode,
    message: String,
}

#[derive(Debug, Serialize)]
struct ErrorEnvelope {
    error: ErrorBody,
}

#[derive(Debug, Serialize)]
struct ErrorBody {
    code: String,
    message: String,
}

impl ApiError {
    pub fn new(status: StatusCode, message: impl Into<String>) -> Self {
        Self {
            status,
            message: message.into(),
        }
    }

    pub fn bad_request(message: impl Into<String>) -> Self {
        Self::new(StatusCode::BAD_REQUEST, message)
    }

    pub fn not_found(message: impl Into<String>) -> Self {
        Self::new(StatusCode::NOT_FOUND, message)
    }

    pub fn status(&self) -> StatusCode {
        self.status
    }

    pub fn message(&self) -> &str {
        &self.message
    }
}

/// Snake-case error code for `status`, e.g. `payload_too_large`.
fn status_code_name(status: StatusCode) -> String {
    match status {
        StatusCode::SERVICE_UNAVAILABLE => "unavailable".to_string(),
        StatusCode::INTERNAL_SERVER_ERROR => "internal_error".to_string(),
        _ => match status.canonical_reason() {
            Some(reason) => reason
                .split(|c: char| !c.is_ascii_alphanumeric())
                .filter(|word| !word.is_empty())
                .map(str::to_ascii_lowercase)
                .collect::<Vec<_>>()
                .join("_"),
            None => "error".to_string(),
        },
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let body = ErrorEnvelope {
            error: ErrorBody {
                code: status_code_name(self.status),
                message: self.message,
            },
        };
        (self.status, Json(body)).into_response()
    }
}

impl From<StoreError> for ApiError {
    fn from(err: StoreError) -> Self {
        match err.kind() {
            FailureKind::Retryable => {
                tracing::warn!(error = %err, "Store unreachable");
                Self::new(StatusCode::SERVICE_UNAVAILABLE, "store temporarily unavailable")
            }
            FailureKind::Fatal => {
                tracing::error!(error = %err, "Store error");
                Self::new(StatusCode::INTERNAL_SERVER_ERROR, "store error")
            }
        }
    }
}

impl From<PublishError> for ApiError {
    fn from(err: PublishError) -> Self {
        tracing::error!(error = %err, "Event publish failed");
        Self::new(StatusCode::BAD_GATEWAY, err.to_string())
    }
}

impl From<DirectoryError> for ApiError {
    fn from(err: DirectoryError) -> Self {
        match err {
            DirectoryError::NotFound(_) => Self::not_found(err.to_string()),
            other => {
                tracing::warn!(error = %other, "User directory failure");
                Self::new(StatusCode::BAD_GATEWAY, other.to_string())
            }
        }
    }
}
