//! Shared types for the retail services.
//!
//! The product and order services, the cache and the stores all speak in
//! terms of the types defined here, so the JSON shape of a product is fixed
//! in exactly one place. The `observability` and `telemetry` modules hold
//! the pieces every service binary wires up the same way.

pub mod observability;
pub mod telemetry;
pub mod types;

pub use types::{Order, OrderId, Product, ProductId};
