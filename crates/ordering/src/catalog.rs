//! Client side of the product service and an in-memory stand-in.

use std::sync::Arc;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::time::{Duration, Instant};

use async_trait::async_trait;
use common::Product;
use reqwest::Url;
use tokio::sync::RwLock;

use crate::error::CatalogError;

/// Source of the authoritative product list.
#[async_trait]
pub trait CatalogClient: Send + Sync {
    /// Fetches the full product collection.
    async fn list_products(&self) -> Result<Vec<Product>, CatalogError>;
}

/// Fetches the catalog from the product service over HTTP.
#[derive(Debug, Clone)]
pub struct HttpCatalogClient {
    client: reqwest::Client,
    products_url: Url,
}

impl HttpCatalogClient {
    /// Creates a client for the product service rooted at `base_url`.
    ///
    /// Every request is bounded by `timeout`; hitting it counts as the
    /// service being unreachable. Environment proxies are ignored.
    pub fn new(base_url: &Url, timeout: Duration) -> Result<Self, reqwest::Error> {
        let client = reqwest::Client::builder()
            .timeout(timeout)
            .no_proxy()
            .build()?;
        let mut products_url = base_url.clone();
        products_url.set_path(&format!("{}/products", base_url.path().trim_end_matches('/')));

        Ok(Self {
            client,
            products_url,
        })
    }

    /// The URL the catalog is fetched from.
    pub fn products_url(&self) -> &Url {
        &self.products_url
    }
}

#[async_trait]
impl CatalogClient for HttpCatalogClient {
    #[tracing::instrument(skip(self), fields(url = %self.products_url))]
    async fn list_products(&self) -> Result<Vec<Product>, CatalogError> {
        let started = Instant::now();

        let resp = self
            .client
            .get(self.products_url.clone())
            .send()
            .await
            .map_err(|e| CatalogError::Unreachable(e.to_string()))?;

        let status = resp.status();
        if !status.is_success() {
            return Err(CatalogError::Unreachable(format!(
                "product service returned {status}"
            )));
        }

        let body = resp.bytes().await.map_err(|e| {
            if e.is_timeout() {
                CatalogError::Unreachable(e.to_string())
            } else {
                CatalogError::Decode(e.to_string())
            }
        })?;

        // An empty catalog may be encoded as `null`.
        let products: Option<Vec<Product>> =
            serde_json::from_slice(&body).map_err(|e| CatalogError::Decode(e.to_string()))?;

        metrics::histogram!("catalog_fetch_duration_seconds")
            .record(started.elapsed().as_secs_f64());

        Ok(products.unwrap_or_default())
    }
}

#[derive(Debug, Clone)]
enum Behavior {
    Respond(Vec<Product>),
    Unreachable,
    Malformed,
}

/// In-memory catalog client for testing.
///
/// Answers with a configurable product list, or simulates an unreachable
/// service or a malformed response. Counts every call.
#[derive(Debug, Clone)]
pub struct InMemoryCatalogClient {
    behavior: Arc<RwLock<Behavior>>,
    calls: Arc<AtomicUsize>,
}

impl InMemoryCatalogClient {
    /// Creates a client answering with `products`.
    pub fn new(products: Vec<Product>) -> Self {
        Self {
            behavior: Arc::new(RwLock::new(Behavior::Respond(products))),
            calls: Arc::default(),
        }
    }

    /// Creates a client whose service is down from the start.
    pub fn unreachable() -> Self {
        Self {
            behavior: Arc::new(RwLock::new(Behavior::Unreachable)),
            calls: Arc::default(),
        }
    }

    /// Answers subsequent calls with `products`.
    pub async fn set_products(&self, products: Vec<Product>) {
        *self.behavior.write().await = Behavior::Respond(products);
    }

    /// Fails subsequent calls as unreachable.
    pub async fn set_unreachable(&self) {
        *self.behavior.write().await = Behavior::Unreachable;
    }

    /// Fails subsequent calls with a decode error.
    pub async fn set_malformed(&self) {
        *self.behavior.write().await = Behavior::Malformed;
    }

    /// Returns how many times the catalog was requested.
    pub fn call_count(&self) -> usize {
        self.calls.load(Ordering::SeqCst)
    }
}

#[async_trait]
impl CatalogClient for InMemoryCatalogClient {
    async fn list_products(&self) -> Result<Vec<Product>, CatalogError> {
        self.calls.fetch_add(1, Ordering::SeqCst);

        match &*self.behavior.read().await {
            Behavior::Respond(products) => Ok(products.clone()),
            Behavior::Unreachable => Err(CatalogError::Unreachable(
                "connection refused".to_string(),
            )),
            Behavior::Malformed => Err(CatalogError::Decode(
                "expected a sequence".to_string(),
            )),
        }
    }
}
