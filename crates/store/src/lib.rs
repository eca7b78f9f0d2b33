pub mod config;
pub mod error;
pub mod memory;
pub mod postgres;
pub mod store;

pub use common::{Order, OrderId, Product, ProductId};
pub use config::StoreConfig;
pub use error::{Result, StoreError};
pub use memory::{InMemoryOrderStore, InMemoryProductStore};
pub use postgres::{PoolSettings, PostgresOrderStore, PostgresProductStore, connect};
pub use store::{OrderStore, ProductStore, SEED_PRODUCTS, with_deadline};
