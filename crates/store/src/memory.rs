use std::sync::Arc;
use std::sync::atomic::{AtomicBool, AtomicU64, Ordering};
use std::time::Duration;

use async_trait::async_trait;
use tokio::sync::RwLock;

use crate::{
    Order, OrderId, Product, ProductId, Result, StoreError,
    store::{OrderStore, ProductStore, SEED_PRODUCTS},
};

/// In-memory product catalog.
///
/// Used when no database is configured and in tests. Failures can be
/// injected to exercise the error paths of callers.
#[derive(Clone, Default)]
pub struct InMemoryProductStore {
    products: Arc<RwLock<Vec<Product>>>,
    fail_on_list: Arc<AtomicBool>,
}

impl InMemoryProductStore {
    /// Creates a new empty catalog.
    pub fn new() -> Self {
        Self::default()
    }

    /// Creates a catalog holding the seed rows, numbered from 1.
    pub fn seeded() -> Self {
        let products = SEED_PRODUCTS
            .iter()
            .zip(1..)
            .map(|((name, price), id)| Product::new(id, *name, *price))
            .collect();
        Self::with_products(products)
    }

    /// Creates a catalog holding exactly `products`.
    pub fn with_products(products: Vec<Product>) -> Self {
        Self {
            products: Arc::new(RwLock::new(products)),
            fail_on_list: Arc::default(),
        }
    }

    /// Replaces the catalog contents.
    pub async fn set_products(&self, products: Vec<Product>) {
        *self.products.write().await = products;
    }

    /// Configures the store to fail every list call.
    pub fn set_fail_on_list(&self, fail: bool) {
        self.fail_on_list.store(fail, Ordering::SeqCst);
    }
}

#[async_trait]
impl ProductStore for InMemoryProductStore {
    async fn list_products(&self) -> Result<Vec<Product>> {
        if self.fail_on_list.load(Ordering::SeqCst) {
            return Err(StoreError::Unavailable("catalog offline".to_string()));
        }
        Ok(self.products.read().await.clone())
    }
}

/// In-memory order store with sequential IDs starting at 1.
#[derive(Clone, Default)]
pub struct InMemoryOrderStore {
    orders: Arc<RwLock<Vec<Order>>>,
    fail_on_insert: Arc<AtomicBool>,
    insert_delay_ms: Arc<AtomicU64>,
}

impl InMemoryOrderStore {
    /// Creates a new empty order store.
    pub fn new() -> Self {
        Self::default()
    }

    /// Configures the store to fail every insert.
    pub fn set_fail_on_insert(&self, fail: bool) {
        self.fail_on_insert.store(fail, Ordering::SeqCst);
    }

    /// Makes every insert wait `delay` before completing.
    pub fn set_insert_delay(&self, delay: Duration) {
        self.insert_delay_ms
            .store(delay.as_millis() as u64, Ordering::SeqCst);
    }

    /// Returns every stored order in insertion order.
    pub async fn orders(&self) -> Vec<Order> {
        self.orders.read().await.clone()
    }

    /// Returns the number of stored orders.
    pub async fn order_count(&self) -> usize {
        self.orders.read().await.len()
    }
}

#[async_trait]
impl OrderStore for InMemoryOrderStore {
    async fn insert_order(&self, product_id: ProductId) -> Result<Order> {
        let delay = self.insert_delay_ms.load(Ordering::SeqCst);
        if delay > 0 {
            tokio::time::sleep(Duration::from_millis(delay)).await;
        }

        if self.fail_on_insert.load(Ordering::SeqCst) {
            return Err(StoreError::Unavailable("order store offline".to_string()));
        }

        let mut orders = self.orders.write().await;
        let order = Order {
            id: OrderId::new(orders.len() as i32 + 1),
            product_id,
        };
        orders.push(order);
        Ok(order)
    }
}
