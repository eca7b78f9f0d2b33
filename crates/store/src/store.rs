use std::future::Future;
use std::time::Duration;

use async_trait::async_trait;

use crate::{Order, Product, ProductId, Result, StoreError};

/// Rows written into an empty catalog on first start.
pub const SEED_PRODUCTS: [(&str, f64); 2] = [("Laptop", 999.99), ("Phone", 499.99)];

/// Durable record store for the product catalog.
///
/// All implementations must be thread-safe (Send + Sync).
#[async_trait]
pub trait ProductStore: Send + Sync {
    /// Lists every product in the catalog, in store-native order.
    async fn list_products(&self) -> Result<Vec<Product>>;
}

/// Durable record store for placed orders.
///
/// The store does not check that `product_id` refers to a known product;
/// callers validate before inserting.
#[async_trait]
pub trait OrderStore: Send + Sync {
    /// Inserts a new order and returns it with its assigned ID.
    async fn insert_order(&self, product_id: ProductId) -> Result<Order>;
}

/// Runs a store future with an upper bound on how long it may take.
///
/// An elapsed deadline surfaces as [`StoreError::Timeout`]; the inner
/// future is dropped, which cancels the in-flight query.
pub async fn with_deadline<T, F>(deadline: Duration, fut: F) -> Result<T>
where
    F: Future<Output = Result<T>>,
{
    match tokio::time::timeout(deadline, fut).await {
        Ok(result) => result,
        Err(_) => Err(StoreError::Timeout(deadline)),
    }
}
