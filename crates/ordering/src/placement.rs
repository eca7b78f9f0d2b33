//! Order placement with cache fallback.

use std::time::Duration;

use common::{Product, ProductId};
use store::{OrderStore, with_deadline};

use crate::cache::ProductCache;
use crate::catalog::CatalogClient;
use crate::error::{CatalogError, PlacementError, Result};
use crate::request::{OrderConfirmation, OrderRequest, ProductSource};

/// Default bound on a single order insert.
pub const DEFAULT_STORE_TIMEOUT: Duration = Duration::from_secs(5);

/// Places orders against live product data, degrading to the product cache.
///
/// The cache is only consulted after the live fetch failed to reach the
/// product service. A successful fetch always refreshes the cache, whatever
/// happens to the request afterwards.
pub struct OrderPlacementService<C, K, O>
where
    C: CatalogClient,
    K: ProductCache,
    O: OrderStore,
{
    catalog: C,
    cache: K,
    orders: O,
    store_timeout: Duration,
}

impl<C, K, O> OrderPlacementService<C, K, O>
where
    C: CatalogClient,
    K: ProductCache,
    O: OrderStore,
{
    /// Creates a new placement service.
    pub fn new(catalog: C, cache: K, orders: O) -> Self {
        Self {
            catalog,
            cache,
            orders,
            store_timeout: DEFAULT_STORE_TIMEOUT,
        }
    }

    /// Sets the deadline for order inserts.
    pub fn with_store_timeout(mut self, timeout: Duration) -> Self {
        self.store_timeout = timeout;
        self
    }

    /// Decodes a JSON request body and places the order.
    ///
    /// A body that does not decode fails before any upstream call is made.
    pub async fn place(&self, body: &[u8]) -> Result<OrderConfirmation> {
        let request = OrderRequest::from_json(body).inspect_err(|err| {
            metrics::counter!("order_placement_failures_total", "reason" => err.reason())
                .increment(1);
        })?;
        self.place_order(request).await
    }

    /// Places an order for an already decoded request.
    #[tracing::instrument(skip(self), fields(product_id = %request.product_id))]
    pub async fn place_order(&self, request: OrderRequest) -> Result<OrderConfirmation> {
        let result = self.try_place(request.product_id).await;

        match &result {
            Ok(confirmation) => {
                metrics::counter!("orders_placed_total", "source" => confirmation.source.as_str())
                    .increment(1);
                tracing::info!(
                    order_id = %confirmation.order_id,
                    source = %confirmation.source,
                    "order placed"
                );
            }
            Err(err) => {
                metrics::counter!("order_placement_failures_total", "reason" => err.reason())
                    .increment(1);
                tracing::warn!(reason = err.reason(), error = %err, "order rejected");
            }
        }

        result
    }

    async fn try_place(&self, product_id: ProductId) -> Result<OrderConfirmation> {
        let (product, source) = self.resolve_product(product_id).await?;

        let order = with_deadline(self.store_timeout, self.orders.insert_order(product_id)).await?;

        Ok(OrderConfirmation {
            order_id: order.id,
            product,
            source,
        })
    }

    async fn resolve_product(&self, product_id: ProductId) -> Result<(Product, ProductSource)> {
        match self.catalog.list_products().await {
            Ok(products) => {
                let found = products.iter().find(|p| p.id == product_id).cloned();
                self.cache.refresh(products).await;

                found
                    .map(|product| (product, ProductSource::Live))
                    .ok_or(PlacementError::ProductNotFound(product_id))
            }
            Err(CatalogError::Decode(reason)) => Err(PlacementError::UpstreamDecode(reason)),
            Err(CatalogError::Unreachable(reason)) => {
                tracing::warn!(%reason, "product service unavailable, falling back to cache");

                self.cache
                    .lookup(product_id)
                    .await
                    .map(|product| (product, ProductSource::Cached))
                    .ok_or(PlacementError::ServiceUnavailable)
            }
        }
    }
}
