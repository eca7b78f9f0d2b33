//! Gateway configuration loaded from environment variables.

use std::time::Duration;

/// Server configuration with sensible defaults.
///
/// Reads from environment variables:
/// - `HOST`: bind address (default: `"0.0.0.0"`)
/// - `PORT`: listen port (default: `8080`)
/// - `RUST_LOG`: tracing filter directive (default: `"info"`)
/// - `PRODUCT_SERVICE_URL`: target for `/products` (default: `"http://localhost:8082"`)
/// - `ORDER_SERVICE_URL`: target for `/orders` (default: `"http://localhost:8083"`)
/// - `PROXY_TIMEOUT_MS`: deadline for a forwarded request (default: `30000`)
/// - `MAX_BODY_BYTES`: largest request body forwarded (default: 2 MiB)
#[derive(Debug, Clone)]
pub struct Config {
    pub host: String,
    pub port: u16,
    pub log_level: String,
    pub product_service_url: String,
    pub order_service_url: String,
    pub proxy_timeout: Duration,
    pub max_body_bytes: usize,
}

impl Config {
    /// Loads configuration from environment variables, falling back to defaults.
    pub fn from_env() -> Self {
        let defaults = Self::default();
        Self {
            host: std::env::var("HOST").unwrap_or(defaults.host),
            port: env_parse("PORT").unwrap_or(defaults.port),
            log_level: std::env::var("RUST_LOG").unwrap_or(defaults.log_level),
            product_service_url: env_url("PRODUCT_SERVICE_URL")
                .unwrap_or(defaults.product_service_url),
            order_service_url: env_url("ORDER_SERVICE_URL").unwrap_or(defaults.order_service_url),
            proxy_timeout: env_parse("PROXY_TIMEOUT_MS")
                .map(Duration::from_millis)
                .unwrap_or(defaults.proxy_timeout),
            max_body_bytes: env_parse("MAX_BODY_BYTES").unwrap_or(defaults.max_body_bytes),
        }
    }

    /// Returns the `"host:port"` bind address string.
    pub fn addr(&self) -> String {
        format!("{}:{}", self.host, self.port)
    }
}

fn env_parse<T: std::str::FromStr>(key: &str) -> Option<T> {
    std::env::var(key).ok().and_then(|v| v.parse().ok())
}

fn env_url(key: &str) -> Option<String> {
    std::env::var(key).ok().filter(|v| !v.is_empty())
}

impl Default for Config {
    fn default() -> Self {
        Self {
            host: "0.0.0.0".to_string(),
            port: 8080,
            log_level: "info".to_string(),
            product_service_url: "http://localhost:8082".to_string(),
            order_service_url: "http://localhost:8083".to_string(),
            proxy_timeout: Duration::from_secs(30),
            max_body_bytes: 2 * 1024 * 1024,
        }
    }
}
