//! Contract-shaped error responses.
//!
//! Every JSON error body the stub emits is exactly
//! `{"error": <code>, "message": <non-empty>}`.

use axum::http::StatusCode;
use axum::response::{IntoResponse, Json, Response};
use serde_json::json;

/// A JSON error response in the contract's shape.
#[derive(Debug)]
pub struct ApiError {
    /// HTTP status to respond with.
    pub status: StatusCode,
    /// Machine-readable error code.
    pub error: String,
    /// Human-readable, non-empty message.
    pub message: String,
}

impl ApiError {
    /// Creates an error response.
    #[must_use]
    pub fn new(status: StatusCode, error: impl Into<String>, message: impl Into<String>) -> Self {
        Self {
            status,
            error: error.into(),
            message: message.into(),
        }
    }

    /// 400 with a code and message.
    #[must_use]
    pub fn bad_request(error: impl Into<String>, message: impl Into<String>) -> Self {
        Self::new(StatusCode::BAD_REQUEST, error, message)
    }

    /// 401 with a code and message.
    #[must_use]
    pub fn unauthorized(error: impl Into<String>, message: impl Into<String>) -> Self {
        Self::new(StatusCode::UNAUTHORIZED, error, message)
    }

    /// 404 with a code and message.
    #[must_use]
    pub fn not_found(message: impl Into<String>) -> Self {
        Self::new(StatusCode::NOT_FOUND, "not_found", message)
    }

    /// The JSON body for this error.
    #[must_use]
    pub fn body(&self) -> serde_json::Value {
        json!({
            "error": self.error,
            "message": self.message,
        })
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let body = self.body();
        (self.status, Json(body)).into_response()
    }
}
