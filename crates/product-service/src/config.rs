//! Product service configuration loaded from environment variables.

use store::StoreConfig;

/// Server configuration with sensible defaults.
///
/// Reads from environment variables:
/// - `HOST`: bind address (default: `"0.0.0.0"`)
/// - `PORT`: listen port (default: `8082`)
/// - `RUST_LOG`: tracing filter directive (default: `"info"`)
/// - store variables, see [`StoreConfig`]
#[derive(Debug, Clone)]
pub struct Config {
    pub host: String,
    pub port: u16,
    pub log_level: String,
    pub store: StoreConfig,
}

impl Config {
    /// Loads configuration from environment variables, falling back to defaults.
    pub fn from_env() -> Self {
        Self {
            host: std::env::var("HOST").unwrap_or_else(|_| "0.0.0.0".to_string()),
            port: std::env::var("PORT")
                .ok()
                .and_then(|p| p.parse().ok())
                .unwrap_or(8082),
            log_level: std::env::var("RUST_LOG").unwrap_or_else(|_| "info".to_string()),
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
            port: 8082,
            log_level: "info".to_string(),
            store: StoreConfig::default(),
        }
    }
}
