//! Order request and confirmation types.

use common::{OrderId, Product, ProductId};
use serde::Deserialize;

use crate::error::PlacementError;

/// Body of a `POST /orders` request.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Deserialize)]
pub struct OrderRequest {
    pub product_id: ProductId,
}

impl OrderRequest {
    /// Creates a request for the given product.
    pub fn new(product_id: impl Into<ProductId>) -> Self {
        Self {
            product_id: product_id.into(),
        }
    }

    /// Decodes a request from a JSON body.
    pub fn from_json(body: &[u8]) -> Result<Self, PlacementError> {
        serde_json::from_slice(body).map_err(|e| PlacementError::InvalidRequest(e.to_string()))
    }
}

/// Where the product data backing a placement came from.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ProductSource {
    /// A successful fetch from the product service.
    Live,
    /// The product cache, after the product service could not be reached.
    Cached,
}

impl ProductSource {
    pub fn as_str(&self) -> &'static str {
        match self {
            ProductSource::Live => "live",
            ProductSource::Cached => "cache",
        }
    }
}

impl std::fmt::Display for ProductSource {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Outcome of a successful placement.
///
/// Displays as the confirmation text returned to the client. The wording
/// drops the trailing `!` when the product came from the cache.
#[derive(Debug, Clone, PartialEq)]
pub struct OrderConfirmation {
    pub order_id: OrderId,
    pub product: Product,
    pub source: ProductSource,
}

impl std::fmt::Display for OrderConfirmation {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(
            f,
            "Order placed for {} (ID: {})",
            self.product.name, self.product.id
        )?;
        if self.source == ProductSource::Live {
            f.write_str("!")?;
        }
        Ok(())
    }
}
