//! API error types with HTTP response mapping.

use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use ordering::PlacementError;

/// API-level error type that maps to plain-text HTTP responses.
#[derive(Debug)]
pub enum ApiError {
    /// Order placement failed.
    Placement(PlacementError),
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let (status, message) = match self {
            ApiError::Placement(err) => placement_error_to_response(err),
        };
        (status, message).into_response()
    }
}

fn placement_error_to_response(err: PlacementError) -> (StatusCode, &'static str) {
    match &err {
        PlacementError::InvalidRequest(_) => (StatusCode::BAD_REQUEST, "Invalid order"),
        PlacementError::ProductNotFound(_) => (StatusCode::NOT_FOUND, "Product not found"),
        PlacementError::ServiceUnavailable => (
            StatusCode::SERVICE_UNAVAILABLE,
            "Product service unavailable and no cache available",
        ),
        PlacementError::UpstreamDecode(_) => {
            tracing::error!(error = %err, "internal server error");
            (StatusCode::INTERNAL_SERVER_ERROR, "Error parsing products")
        }
        PlacementError::Persistence(_) => {
            tracing::error!(error = %err, "internal server error");
            (StatusCode::INTERNAL_SERVER_ERROR, "Error saving order")
        }
    }
}

impl From<PlacementError> for ApiError {
    fn from(err: PlacementError) -> Self {
        ApiError::Placement(err)
    }
}
