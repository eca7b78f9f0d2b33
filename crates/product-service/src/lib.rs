//! Product listing service.
//!
//! Serves the catalog as JSON on `GET /products`. This is the authoritative
//! product source the order service fetches from.

pub mod config;
pub mod error;
pub mod listing;
pub mod routes;

use std::sync::Arc;

use axum::Router;
use axum::routing::get;
use metrics_exporter_prometheus::PrometheusHandle;
use store::{ProductStore, StoreConfig};
use tower_http::trace::TraceLayer;

use listing::ProductListing;
use routes::products::AppState;

/// Creates the Axum application router with all routes and shared state.
pub fn create_app<S: ProductStore + 'static>(
    state: Arc<AppState<S>>,
    metrics_handle: PrometheusHandle,
) -> Router {
    Router::new()
        .route("/products", get(routes::products::list::<S>))
        .with_state(state)
        .merge(common::observability::router("product-service", metrics_handle))
        .layer(TraceLayer::new_for_http())
}

/// Creates the application state over the given catalog store.
pub fn create_state<S: ProductStore>(store: S, config: &StoreConfig) -> Arc<AppState<S>> {
    Arc::new(AppState {
        listing: ProductListing::new(store, config.timeout),
    })
}
