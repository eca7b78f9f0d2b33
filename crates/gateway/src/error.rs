//! Gateway error types with HTTP response mapping.

use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use thiserror::Error;

/// Errors raised while building the gateway or forwarding a request.
#[derive(Debug, Error)]
pub enum GatewayError {
    /// No route prefix matches the request path.
    #[error("No route for {0}")]
    NoRoute(String),

    /// The inbound body exceeds the forwarding limit.
    #[error("Request body exceeds {limit} bytes")]
    BodyTooLarge { limit: usize },

    /// The inbound body could not be read, e.g. the client went away.
    #[error("Failed to read request body: {0}")]
    Body(String),

    /// The upstream service could not be reached or aborted its response.
    #[error("Upstream {upstream} failed: {source}")]
    Upstream {
        upstream: String,
        #[source]
        source: reqwest::Error,
    },

    /// A configured upstream address is not a usable URL.
    #[error("Invalid upstream URL '{url}': {reason}")]
    InvalidUpstream { url: String, reason: String },

    /// The outbound HTTP client could not be built.
    #[error("HTTP client error: {0}")]
    Client(#[source] reqwest::Error),
}

impl IntoResponse for GatewayError {
    fn into_response(self) -> Response {
        let (status, message) = match &self {
            GatewayError::NoRoute(_) => (StatusCode::NOT_FOUND, "404 page not found"),
            GatewayError::BodyTooLarge { .. } => {
                (StatusCode::PAYLOAD_TOO_LARGE, "Request body too large")
            }
            GatewayError::Body(_) => {
                tracing::warn!(error = %self, "bad request body");
                (StatusCode::BAD_REQUEST, "Bad Request")
            }
            GatewayError::Upstream { .. } => {
                tracing::error!(error = %self, "proxy error");
                (StatusCode::BAD_GATEWAY, "Bad Gateway")
            }
            GatewayError::InvalidUpstream { .. } | GatewayError::Client(_) => {
                tracing::error!(error = %self, "internal server error");
                (StatusCode::INTERNAL_SERVER_ERROR, "Internal Server Error")
            }
        };
        (status, message).into_response()
    }
}
