//! Product listing backed by the catalog store.

use std::time::Duration;

use common::Product;
use store::{ProductStore, StoreError, with_deadline};

/// Serves the authoritative product list.
///
/// Reads go straight to the store under a deadline; there is no caching
/// and no retry here.
pub struct ProductListing<S: ProductStore> {
    store: S,
    timeout: Duration,
}

impl<S: ProductStore> ProductListing<S> {
    /// Creates a listing over `store`, bounding each read by `timeout`.
    pub fn new(store: S, timeout: Duration) -> Self {
        Self { store, timeout }
    }

    /// Lists every product in store order.
    #[tracing::instrument(skip(self))]
    pub async fn list(&self) -> Result<Vec<Product>, StoreError> {
        let products = with_deadline(self.timeout, self.store.list_products()).await?;
        metrics::counter!("products_listed_total").increment(1);
        tracing::debug!(count = products.len(), "listed products");
        Ok(products)
    }
}
