use std::time::Duration;

use async_trait::async_trait;
use sqlx::{PgPool, Row, postgres::PgPoolOptions, postgres::PgRow};

use crate::{
    Order, OrderId, Product, ProductId, Result,
    store::{OrderStore, ProductStore, SEED_PRODUCTS},
};

const CREATE_PRODUCTS_TABLE: &str = r#"
CREATE TABLE IF NOT EXISTS products (
    id SERIAL PRIMARY KEY,
    name TEXT NOT NULL,
    price DOUBLE PRECISION NOT NULL
)
"#;

const CREATE_ORDERS_TABLE: &str = r#"
CREATE TABLE IF NOT EXISTS orders (
    id SERIAL PRIMARY KEY,
    product_id INT NOT NULL
)
"#;

/// Connection pool settings shared by both stores.
#[derive(Debug, Clone)]
pub struct PoolSettings {
    pub max_connections: u32,
    /// Upper bound on waiting for a pooled connection.
    pub acquire_timeout: Duration,
}

impl Default for PoolSettings {
    fn default() -> Self {
        Self {
            max_connections: 5,
            acquire_timeout: Duration::from_secs(5),
        }
    }
}

/// Opens a PostgreSQL connection pool.
pub async fn connect(database_url: &str, settings: &PoolSettings) -> Result<PgPool> {
    let pool = PgPoolOptions::new()
        .max_connections(settings.max_connections)
        .acquire_timeout(settings.acquire_timeout)
        .connect(database_url)
        .await?;
    Ok(pool)
}

/// PostgreSQL-backed product catalog.
#[derive(Clone)]
pub struct PostgresProductStore {
    pool: PgPool,
}

impl PostgresProductStore {
    /// Creates a new PostgreSQL product store.
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }

    /// Creates the `products` table if it is missing and seeds it when empty.
    pub async fn ensure_schema(&self) -> Result<()> {
        sqlx::query(CREATE_PRODUCTS_TABLE)
            .execute(&self.pool)
            .await?;

        let mut tx = self.pool.begin().await?;

        // Serializes concurrent bootstraps so only one of them seeds.
        sqlx::query("LOCK TABLE products IN SHARE ROW EXCLUSIVE MODE")
            .execute(&mut *tx)
            .await?;

        let existing: i64 = sqlx::query_scalar("SELECT COUNT(*) FROM products")
            .fetch_one(&mut *tx)
            .await?;

        if existing == 0 {
            for (name, price) in SEED_PRODUCTS {
                sqlx::query("INSERT INTO products (name, price) VALUES ($1, $2)")
                    .bind(name)
                    .bind(price)
                    .execute(&mut *tx)
                    .await?;
            }
            tracing::info!(rows = SEED_PRODUCTS.len(), "seeded empty product catalog");
        }

        tx.commit().await?;
        Ok(())
    }

    fn row_to_product(row: PgRow) -> Result<Product> {
        Ok(Product {
            id: ProductId::new(row.try_get("id")?),
            name: row.try_get("name")?,
            price: row.try_get("price")?,
        })
    }
}

#[async_trait]
impl ProductStore for PostgresProductStore {
    async fn list_products(&self) -> Result<Vec<Product>> {
        let rows = sqlx::query("SELECT id, name, price FROM products")
            .fetch_all(&self.pool)
            .await?;

        rows.into_iter().map(Self::row_to_product).collect()
    }
}

/// PostgreSQL-backed order store.
#[derive(Clone)]
pub struct PostgresOrderStore {
    pool: PgPool,
}

impl PostgresOrderStore {
    /// Creates a new PostgreSQL order store.
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }

    /// Creates the `orders` table if it is missing.
    pub async fn ensure_schema(&self) -> Result<()> {
        sqlx::query(CREATE_ORDERS_TABLE).execute(&self.pool).await?;
        Ok(())
    }
}

#[async_trait]
impl OrderStore for PostgresOrderStore {
    async fn insert_order(&self, product_id: ProductId) -> Result<Order> {
        let id: i32 = sqlx::query_scalar("INSERT INTO orders (product_id) VALUES ($1) RETURNING id")
            .bind(product_id.as_i32())
            .fetch_one(&self.pool)
            .await?;

        Ok(Order {
            id: OrderId::new(id),
            product_id,
        })
    }
}
