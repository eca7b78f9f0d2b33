//! Order service configuration loaded from environment variables.

use std::time::Duration;

use store::StoreConfig;

/// Server configuration with sensible defaults.
///
/// Reads from environment variables:
/// - `HOST`: bind address (default: `"0.0.0.0"`)
/// - `PORT`: listen port (default: `8083`)
/// - `RUST_LOG`: tracing filter directive (default: `"info"`)
/// - `PRODUCT_SERVICE_URL`: base URL of the product service
///   (default: `"http://localhost:8082"`)
/// - `UPSTREAM_TIMEOUT_MS`: deadline for a catalog fetch (default: `2000`)
/// - store variables, see [`StoreConfig`]
#[derive(Debug, Clone)]
pub struct Config {
    pub host: String,
    pub port: u16,
    pub log_level: String,
    pub product_service_url: String,
    pub upstream_timeout: Duration,
    pub store: StoreConfig,
}

impl Config {
    /// Loads configuration from environment variables, falling back to defaults.
    pub fn from_env() -> Self {
        let defaults = Self::default();
        Self {
            host: std::env::var("HOST").unwrap_or(defaults.host),
            port: std::env::var("PORT")
                .ok()
                .and_then(|p| p.parse().ok())
                .unwrap_or(defaults.port),
            log_level: std::env::var("RUST_LOG").unwrap_or(defaults.log_level),
            product_service_url: std::env::var("PRODUCT_SERVICE_URL")
                .ok()
                .filter(|url| !url.is_empty())
                .unwrap_or(defaults.product_service_url),
            upstream_timeout: std::env::var("UPSTREAM_TIMEOUT_MS")
                .ok()
                .and_then(|ms| ms.parse().ok())
                .map(Duration::from_millis)
                .unwrap_or(defaults.upstream_timeout),
            store: StoreConfig::from_env(),
        }
    }

    /// Returns the `"host:port"` bind address string.
    pub fn addr(&self) -> String {
        format!("{}:{}", self.host, self.port)
    }
}

impl Default for Config {
    fn default() -> Self {
        Self {
            host: "0.0.0.0".to_string(),
            port: 8083,
            log_level: "info".to_string(),
            product_service_url: "http://localhost:8082".to_string(),
            upstream_timeout: Duration::from_secs(2),
            store: StoreConfig::default(),
        }
    }
}
