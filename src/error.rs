use std::collections::BTreeMap;

use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use axum::Json;
use serde_json::json;
use thiserror::Error;

/// Everything a handler can fail with. Each variant maps onto one status code
/// and a JSON `{"error": ...}` body, except `Internal`, which is logged and
/// answered with a generic 500.
#[derive(Debug, Error)]
pub enum ApiError {
    #[error("{0}")]
    BadRequest(String),
    #[error("validation failed")]
    Validation(BTreeMap<String, String>),
    #[error("{0}")]
    Unauthorized(String),
    #[error("{0}")]
    Forbidden(String),
    #[error("{0}")]
    NotFound(String),
    #[error("{0}")]
    Conflict(String),
    #[error(transparent)]
    Internal(#[from] anyhow::Error),
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        match self {
            ApiError::BadRequest(message) => error_body(StatusCode::BAD_REQUEST, &message),
            ApiError::Validation(fields) => (
                StatusCode::UNPROCESSABLE_ENTITY,
                Json(json!({ "error": "validation failed", "fields": fields })),
            )
                .into_response(),
            ApiError::Unauthorized(message) => error_body(StatusCode::UNAUTHORIZED, &message),
            ApiError::Forbidden(message) => error_body(StatusCode::FORBIDDEN, &message),
            ApiError::NotFound(message) => error_body(StatusCode::NOT_FOUND, &message),
            ApiError::Conflict(message) => error_body(StatusCode::CONFLICT, &message),
            ApiError::Internal(err) => {
                // Detail stays in the request span; the client only sees the
                // generic text.
                tracing::error!(error = ?err, "internal server error");
                (StatusCode::INTERNAL_SERVER_ERROR, "Internal Server Error").into_response()
            }
        }
    }
}

fn error_body(status: StatusCode, message: &str) -> Response {
    (status, Json(json!({ "error": message }))).into_response()
}
