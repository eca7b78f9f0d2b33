use serde::{Deserialize, Serialize};

/// Identifier of a product in the catalog.
///
/// Assigned by the catalog store (`SERIAL` column), so it maps onto a
/// 32-bit integer both in JSON and in SQL.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(transparent)]
pub struct ProductId(i32);

impl ProductId {
    /// Creates a product ID from its raw value.
    pub fn new(id: i32) -> Self {
        Self(id)
    }

    /// Returns the raw integer value.
    pub fn as_i32(&self) -> i32 {
        self.0
    }
}

impl std::fmt::Display for ProductId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.0)
    }
}

impl From<i32> for ProductId {
    fn from(id: i32) -> Self {
        Self(id)
    }
}

/// Identifier of a placed order, assigned by the order store on insert.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(transparent)]
pub struct OrderId(i32);

impl OrderId {
    /// Creates an order ID from its raw value.
    pub fn new(id: i32) -> Self {
        Self(id)
    }
}

impl std::fmt::Display for OrderId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// A catalog entry as served by the product service.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Product {
    pub id: ProductId,
    pub name: String,
    pub price: f64,
}

impl Product {
    /// Creates a new product.
    pub fn new(id: impl Into<ProductId>, name: impl Into<String>, price: f64) -> Self {
        Self {
            id: id.into(),
            name: name.into(),
            price,
        }
    }
}

/// A placed order. Only ever inserted, never updated.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct Order {
    pub id: OrderId,
    pub product_id: ProductId,
}
