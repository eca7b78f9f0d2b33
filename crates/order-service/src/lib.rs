//! Order placement service.
//!
//! Accepts `POST /orders`, validates the product against the product
//! service and falls back to its product cache when that service is down.

pub mod config;
pub mod error;
pub mod routes;

use std::sync::Arc;

use axum::Router;
use axum::routing::post;
use metrics_exporter_prometheus::PrometheusHandle;
use ordering::{CatalogClient, OrderPlacementService, ProductCache};
use store::{OrderStore, StoreConfig};
use tower_http::trace::TraceLayer;

use routes::orders::AppState;

/// Creates the Axum application router with all routes and shared state.
pub fn create_app<C, K, O>(
    state: Arc<AppState<C, K, O>>,
    metrics_handle: PrometheusHandle,
) -> Router
where
    C: CatalogClient + 'static,
    K: ProductCache + 'static,
    O: OrderStore + 'static,
{
    Router::new()
        .route("/orders", post(routes::orders::place::<C, K, O>))
        .with_state(state)
        .merge(common::observability::router("order-service", metrics_handle))
        .layer(TraceLayer::new_for_http())
}

/// Creates the application state from its collaborators.
pub fn create_state<C, K, O>(
    catalog: C,
    cache: K,
    orders: O,
    config: &StoreConfig,
) -> Arc<AppState<C, K, O>>
where
    C: CatalogClient,
    K: ProductCache,
    O: OrderStore,
{
    let placement =
        OrderPlacementService::new(catalog, cache, orders).with_store_timeout(config.timeout);
    Arc::new(AppState { placement })
}
