//! Order placement error types.

use common::ProductId;
use store::StoreError;
use thiserror::Error;

/// Failure of a catalog fetch from the product service.
#[derive(Debug, Error)]
pub enum CatalogError {
    /// The service could not be reached, answered with a non-success
    /// status, or did not answer before the deadline.
    #[error("Product service unreachable: {0}")]
    Unreachable(String),

    /// The service answered but the body was not a product list.
    #[error("Malformed product list: {0}")]
    Decode(String),
}

/// Errors that end an order placement.
#[derive(Debug, Error)]
pub enum PlacementError {
    /// The request body is not a valid order.
    #[error("Invalid order: {0}")]
    InvalidRequest(String),

    /// The live catalog does not contain the product.
    #[error("Product not found: {0}")]
    ProductNotFound(ProductId),

    /// The product service is unreachable and the cache has no entry.
    #[error("Product service unavailable and no cache available")]
    ServiceUnavailable,

    /// The product service answered with data that could not be decoded.
    #[error("Error parsing products: {0}")]
    UpstreamDecode(String),

    /// The order could not be stored.
    #[error("Error saving order: {0}")]
    Persistence(#[from] StoreError),
}

impl PlacementError {
    /// Short label used for metrics and logs.
    pub fn reason(&self) -> &'static str {
        match self {
            PlacementError::InvalidRequest(_) => "invalid_request",
            PlacementError::ProductNotFound(_) => "product_not_found",
            PlacementError::ServiceUnavailable => "service_unavailable",
            PlacementError::UpstreamDecode(_) => "upstream_decode",
            PlacementError::Persistence(_) => "persistence",
        }
    }
}

/// Convenience type alias for placement results.
pub type Result<T> = std::result::Result<T, PlacementError>;
