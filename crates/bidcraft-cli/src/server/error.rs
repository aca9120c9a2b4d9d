//! API error types and handling.

use axum::{
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use serde::Serialize;

/// API error type.
#[derive(Debug)]
pub enum ApiError {
    /// Bad request from client.
    BadRequest(String),
    /// Error from the bidcraft library.
    Bidcraft(bidcraft::BidcraftError),
}

#[derive(Serialize)]
struct ErrorResponse {
    error: String,
    message: String,
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let (status, error, message) = match self {
            ApiError::BadRequest(msg) => (StatusCode::BAD_REQUEST, "bad_request", msg),
            ApiError::Bidcraft(e) if e.is_validation() => {
                (StatusCode::BAD_REQUEST, "validation", e.to_string())
            }
            ApiError::Bidcraft(e) => {
                tracing::error!(error = %e, "request failed");
                (StatusCode::INTERNAL_SERVER_ERROR, "persistence", e.to_string())
            }
        };

        (
            status,
            Json(ErrorResponse {
                error: error.to_string(),
                message,
            }),
        )
            .into_response()
    }
}

impl From<bidcraft::BidcraftError> for ApiError {
    fn from(err: bidcraft::BidcraftError) -> Self {
        ApiError::Bidcraft(err)
    }
}

impl std::fmt::Display for ApiError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            ApiError::BadRequest(msg) => write!(f, "Bad request: {}", msg),
            ApiError::Bidcraft(e) => write!(f, "Bidcraft error: {}", e),
        }
    }
}

impl std::error::Error for ApiError {}
