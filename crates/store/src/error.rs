use std::time::Duration;

use thiserror::Error;

/// Errors that can occur when interacting with a store.
#[derive(Debug, Error)]
pub enum StoreError {
    /// A database error occurred.
    #[error("Database error: {0}")]
    Database(#[from] sqlx::Error),

    /// The store did not answer within the allotted deadline.
    #[error("Store did not respond within {0:?}")]
    Timeout(Duration),

    /// The store refused the operation.
    #[error("Store unavailable: {0}")]
    Unavailable(String),
}

/// Result type for store operations.
pub type Result<T> = std::result::Result<T, StoreError>;
