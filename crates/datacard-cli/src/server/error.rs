//! API error types and handling.

use axum::{
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use serde::Serialize;

use datacard::DataCardError;

/// API error type.
#[derive(Debug)]
pub enum ApiError {
    /// Request body could not be read as an analysis request.
    BadRequest(String),
    /// Error from the datacard library.
    DataCard(DataCardError),
}

#[derive(Serialize)]
struct ErrorResponse {
    error: String,
    message: String,
}

impl ApiError {
    fn parts(&self) -> (StatusCode, &'static str) {
        match self {
            ApiError::BadRequest(_) => (StatusCode::BAD_REQUEST, "bad_request"),
            ApiError::DataCard(e) if e.is_validation() => {
                (StatusCode::BAD_REQUEST, "validation_error")
            }
            ApiError::DataCard(_) => (StatusCode::INTERNAL_SERVER_ERROR, "analysis_failed"),
        }
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let (status, error) = self.parts();
        if status.is_server_error() {
            tracing::error!(%status, "{}", self);
        }

        let message = match self {
            ApiError::BadRequest(msg) => msg,
            ApiError::DataCard(e) => e.to_string(),
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

impl From<DataCardError> for ApiError {
    fn from(err: DataCardError) -> Self {
        ApiError::DataCard(err)
    }
}

impl std::fmt::Display for ApiError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            ApiError::BadRequest(msg) => write!(f, "Bad request: {}", msg),
            ApiError::DataCard(e) => write!(f, "{}", e),
        }
    }
}

impl std::error::Error for ApiError {}
