//! Store configuration loaded from environment variables.

use std::time::Duration;

use crate::postgres::PoolSettings;

/// Store settings shared by the services that own a database.
///
/// Reads from environment variables:
/// - `DATABASE_URL`: PostgreSQL URL; unset means an in-memory store
/// - `DATABASE_MAX_CONNECTIONS`: pool size (default: `5`)
/// - `STORE_TIMEOUT_MS`: deadline for a single store call (default: `5000`)
#[derive(Debug, Clone)]
pub struct StoreConfig {
    pub database_url: Option<String>,
    pub max_connections: u32,
    pub timeout: Duration,
}

impl StoreConfig {
    /// Loads configuration from environment variables, falling back to defaults.
    pub fn from_env() -> Self {
        let defaults = Self::default();
        Self {
            database_url: std::env::var("DATABASE_URL")
                .ok()
                .filter(|url| !url.is_empty()),
            max_connections: std::env::var("DATABASE_MAX_CONNECTIONS")
                .ok()
                .and_then(|n| n.parse().ok())
                .unwrap_or(defaults.max_connections),
            timeout: std::env::var("STORE_TIMEOUT_MS")
                .ok()
                .and_then(|ms| ms.parse().ok())
                .map(Duration::from_millis)
                .unwrap_or(defaults.timeout),
        }
    }

    /// Pool settings derived from this configuration. Waiting for a pooled
    /// connection shares the store deadline.
    pub fn pool_settings(&self) -> PoolSettings {
        PoolSettings {
            max_connections: self.max_connections,
            acquire_timeout: self.timeout,
        }
    }
}

impl Default for StoreConfig {
    fn default() -> Self {
        Self {
            database_url: None,
            max_connections: 5,
            timeout: Duration::from_secs(5),
        }
    }
}
