//! Order placement endpoint.

use std::sync::Arc;

use axum::body::Bytes;
use axum::extract::State;
use ordering::{CatalogClient, OrderPlacementService, ProductCache};
use store::OrderStore;

use crate::error::ApiError;

/// Shared application state accessible from all handlers.
pub struct AppState<C, K, O>
where
    C: CatalogClient,
    K: ProductCache,
    O: OrderStore,
{
    pub placement: OrderPlacementService<C, K, O>,
}

/// POST /orders: place an order for `{"product_id": <int>}`.
///
/// The body is decoded by the placement service rather than an extractor so
/// that every malformed body, whatever its content type, is a 400.
#[tracing::instrument(skip(state, body))]
pub async fn place<C, K, O>(
    State(state): State<Arc<AppState<C, K, O>>>,
    body: Bytes,
) -> Result<String, ApiError>
where
    C: CatalogClient + 'static,
    K: ProductCache + 'static,
    O: OrderStore + 'static,
{
    let confirmation = state.placement.place(&body).await?;
    Ok(confirmation.to_string())
}
