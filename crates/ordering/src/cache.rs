//! Product cache used as a degraded-availability fallback.

use std::sync::Arc;

use async_trait::async_trait;
use common::{Product, ProductId};
use tokio::sync::RwLock;

/// Snapshot of the last product list fetched successfully.
///
/// `refresh` replaces the whole snapshot; readers see either the old or the
/// new list in full.
#[async_trait]
pub trait ProductCache: Send + Sync {
    /// Replaces the cached list. Last writer wins.
    async fn refresh(&self, products: Vec<Product>);

    /// Returns the first cached product with the given ID.
    async fn lookup(&self, product_id: ProductId) -> Option<Product>;
}

/// Process-local product cache.
///
/// Cloning yields another handle to the same snapshot.
#[derive(Debug, Clone, Default)]
pub struct InMemoryProductCache {
    products: Arc<RwLock<Vec<Product>>>,
}

impl InMemoryProductCache {
    /// Creates an empty cache.
    pub fn new() -> Self {
        Self::default()
    }

    /// Returns a copy of the current snapshot.
    pub async fn snapshot(&self) -> Vec<Product> {
        self.products.read().await.clone()
    }

    pub async fn len(&self) -> usize {
        self.products.read().await.len()
    }

    pub async fn is_empty(&self) -> bool {
        self.products.read().await.is_empty()
    }
}

#[async_trait]
impl ProductCache for InMemoryProductCache {
    async fn refresh(&self, products: Vec<Product>) {
        let count = products.len();
        *self.products.write().await = products;
        metrics::counter!("product_cache_refreshes_total").increment(1);
        tracing::debug!(products = count, "updated product cache");
    }

    async fn lookup(&self, product_id: ProductId) -> Option<Product> {
        self.products
            .read()
            .await
            .iter()
            .find(|p| p.id == product_id)
            .cloned()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn catalog() -> Vec<Product> {
        vec![
            Product::new(1, "Laptop", 999.99),
            Product::new(2, "Phone", 499.99),
        ]
    }

    #[tokio::test]
    async fn starts_empty() {
        let cache = InMemoryProductCache::new();
        assert!(cache.is_empty().await);
        assert_eq!(cache.lookup(ProductId::new(1)).await, None);
    }

    #[tokio::test]
    async fn lookup_after_refresh() {
        let cache = InMemoryProductCache::new();
        cache.refresh(catalog()).await;

        let phone = cache.lookup(ProductId::new(2)).await.unwrap();
        assert_eq!(phone.name, "Phone");
        assert_eq!(cache.lookup(ProductId::new(3)).await, None);
    }

    #[tokio::test]
    async fn refresh_replaces_instead_of_merging() {
        let cache = InMemoryProductCache::new();
        cache.refresh(catalog()).await;
        cache
            .refresh(vec![Product::new(3, "Tablet", 299.0)])
            .await;

        assert_eq!(cache.len().await, 1);
        assert_eq!(cache.lookup(ProductId::new(1)).await, None);
        assert_eq!(cache.lookup(ProductId::new(2)).await, None);
        assert_eq!(
            cache.lookup(ProductId::new(3)).await.map(|p| p.name),
            Some("Tablet".to_string())
        );
    }

    #[tokio::test]
    async fn refresh_with_empty_list_clears() {
        let cache = InMemoryProductCache::new();
        cache.refresh(catalog()).await;
        cache.refresh(Vec::new()).await;
        assert!(cache.is_empty().await);
    }

    #[tokio::test]
    async fn lookup_returns_first_match() {
        let cache = InMemoryProductCache::new();
        cache
            .refresh(vec![
                Product::new(1, "First", 1.0),
                Product::new(1, "Second", 2.0),
            ])
            .await;

        assert_eq!(cache.lookup(ProductId::new(1)).await.unwrap().name, "First");
    }

    #[tokio::test]
    async fn clones_share_the_snapshot() {
        let cache = InMemoryProductCache::new();
        let handle = cache.clone();
        cache.refresh(catalog()).await;
        assert_eq!(handle.len().await, 2);
    }

    #[tokio::test(flavor = "multi_thread", worker_threads = 4)]
    async fn concurrent_readers_never_see_torn_snapshots() {
        // Every snapshot written holds ten products sharing one generation tag,
        // so a reader that sees mixed tags saw a partial write.
        fn generation(tag: u32) -> Vec<Product> {
            (1..=10)
                .map(|id| Product::new(id, format!("gen-{tag}"), f64::from(tag)))
                .collect()
        }

        let cache = InMemoryProductCache::new();
        cache.refresh(generation(0)).await;

        let mut handles = Vec::new();
        for writer in 0..4u32 {
            let cache = cache.clone();
            handles.push(tokio::spawn(async move {
                for round in 0..50u32 {
                    cache.refresh(generation(writer * 100 + round)).await;
                    tokio::task::yield_now().await;
                }
            }));
        }
        for _ in 0..8 {
            let cache = cache.clone();
            handles.push(tokio::spawn(async move {
                for _ in 0..200 {
                    let snapshot = cache.snapshot().await;
                    assert_eq!(snapshot.len(), 10);
                    assert!(snapshot.iter().all(|p| p.name == snapshot[0].name));
                    assert!(cache.lookup(ProductId::new(5)).await.is_some());
                    tokio::task::yield_now().await;
                }
            }));
        }

        for handle in handles {
            handle.await.unwrap();
        }
    }
}
