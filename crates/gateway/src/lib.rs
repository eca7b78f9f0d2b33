//! API gateway.
//!
//! Dispatches requests to the product and order services by path prefix
//! and answers its own liveness check. Resilience is left to the services:
//! there is no retry, load balancing or circuit breaking here.

pub mod config;
pub mod error;
pub mod proxy;
pub mod routing;

use std::sync::Arc;

use axum::Router;
use axum::routing::any;
use metrics_exporter_prometheus::PrometheusHandle;
use tower_http::cors::{Any, CorsLayer};
use tower_http::trace::TraceLayer;

use config::Config;
use error::GatewayError;
use proxy::GatewayState;
use routing::RouteTable;

/// /health: answered by the gateway itself for any method, never forwarded.
pub async fn health() -> &'static str {
    "API Gateway is healthy"
}

/// Creates the Axum application router. Anything not served locally goes
/// through the route table.
pub fn create_app(state: Arc<GatewayState>, metrics_handle: PrometheusHandle) -> Router {
    let local_router =
        common::observability::metrics_router(metrics_handle).route("/health", any(health));

    Router::new()
        .fallback(proxy::forward)
        .with_state(state)
        .merge(local_router)
        .layer(
            CorsLayer::new()
                .allow_origin(Any)
                .allow_methods(Any)
                .allow_headers(Any),
        )
        .layer(TraceLayer::new_for_http())
}

/// Builds gateway state from configuration.
pub fn create_state(config: &Config) -> Result<Arc<GatewayState>, GatewayError> {
    let routes =
        RouteTable::for_services(&config.product_service_url, &config.order_service_url)?;
    let state = GatewayState::new(routes, config.proxy_timeout, config.max_body_bytes)?;
    Ok(Arc::new(state))
}
