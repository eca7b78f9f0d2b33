//! API error types with HTTP response mapping.

use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use store::StoreError;

/// API-level error type that maps to plain-text HTTP responses.
#[derive(Debug)]
pub enum ApiError {
    /// The catalog store could not be read.
    Store(StoreError),
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        match self {
            ApiError::Store(err) => {
                tracing::error!(error = %err, "database query error");
                (StatusCode::INTERNAL_SERVER_ERROR, "Database query failed").into_response()
            }
        }
    }
}

impl From<StoreError> for ApiError {
    fn from(err: StoreError) -> Self {
        ApiError::Store(err)
    }
}
