//! Product catalog endpoint.

use std::sync::Arc;

use axum::Json;
use axum::extract::State;
use common::Product;
use store::ProductStore;

use crate::error::ApiError;
use crate::listing::ProductListing;

/// Shared application state accessible from all handlers.
pub struct AppState<S: ProductStore> {
    pub listing: ProductListing<S>,
}

/// GET /products: list the whole catalog.
#[tracing::instrument(skip(state))]
pub async fn list<S: ProductStore + 'static>(
    State(state): State<Arc<AppState<S>>>,
) -> Result<Json<Vec<Product>>, ApiError> {
    let products = state.listing.list().await?;
    Ok(Json(products))
}
