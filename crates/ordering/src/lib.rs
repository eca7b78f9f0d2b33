//! Order placement for the retail backend.
//!
//! Placing an order needs live product data from the product service. When
//! that service cannot be reached, the last product list fetched
//! successfully is used instead:
//! 1. Fetch the catalog from the product service
//! 2. On success, refresh the cache and look the product up in the live list
//! 3. On failure, look the product up in the cache
//! 4. Persist the order if the product was found either way
//!
//! The live catalog is authoritative: a product missing from a successful
//! fetch is rejected even if the cache still knows it.

pub mod cache;
pub mod catalog;
pub mod error;
pub mod placement;
pub mod request;

pub use cache::{InMemoryProductCache, ProductCache};
pub use catalog::{CatalogClient, HttpCatalogClient, InMemoryCatalogClient};
pub use error::{CatalogError, PlacementError, Result};
pub use placement::OrderPlacementService;
pub use request::{OrderConfirmation, OrderRequest, ProductSource};
