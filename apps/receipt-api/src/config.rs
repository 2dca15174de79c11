//! Receipt API configuration module.
//!
//! Configuration is loaded from environment variables with fallback to defaults.

use serde::{Deserialize, Serialize};
use std::env;

use receipt_db::DbConfig;

/// Default HTTP port.
pub const DEFAULT_PORT: u16 = 8080;

/// Receipt API configuration.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ApiConfig {
    /// Bind address (default: 0.0.0.0)
    pub bind_addr: String,

    /// HTTP server port
    pub port: u16,

    /// SQLite database path, `:memory:` for a process-local database
    pub db_path: String,

    /// Maximum pooled connections (ignored for `:memory:`)
    pub db_max_connections: u32,
}

impl Default for ApiConfig {
    fn default() -> Self {
        ApiConfig {
            bind_addr: "0.0.0.0".to_string(),
            port: DEFAULT_PORT,
            db_path: ":memory:".to_string(),
            db_max_connections: 5,
        }
    }
}

impl ApiConfig {
    /// Load configuration from environment variables.
    pub fn load() -> Result<Self, ConfigError> {
        Self::from_lookup(|key| env::var(key).ok())
    }

    /// Builds a configuration from an arbitrary key lookup.
    ///
    /// `load()` passes the process environment; tests pass a map.
    pub fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> Result<Self, ConfigError> {
        let defaults = ApiConfig::default();

        let config = ApiConfig {
            bind_addr: lookup("RECEIPT_BIND_ADDR").unwrap_or(defaults.bind_addr),

            port: match lookup("RECEIPT_PORT") {
                Some(raw) => raw
                    .parse()
                    .map_err(|_| ConfigError::InvalidValue("RECEIPT_PORT".to_string()))?,
                None => defaults.port,
            },

            db_path: lookup("RECEIPT_DB_PATH").unwrap_or(defaults.db_path),

            db_max_connections: match lookup("RECEIPT_DB_MAX_CONNECTIONS") {
                Some(raw) => raw.parse().map_err(|_| {
                    ConfigError::InvalidValue("RECEIPT_DB_MAX_CONNECTIONS".to_string())
                })?,
                None => defaults.db_max_connections,
            },
        };

        if config.db_path.trim().is_empty() {
            return Err(ConfigError::InvalidValue("RECEIPT_DB_PATH".to_string()));
        }
        if config.db_max_connections == 0 {
            return Err(ConfigError::InvalidValue(
                "RECEIPT_DB_MAX_CONNECTIONS".to_string(),
            ));
        }

        Ok(config)
    }

    /// Returns the full bind address.
    pub fn bind_address(&self) -> String {
        format!("{}:{}", self.bind_addr, self.port)
    }

    /// Database settings derived from this configuration.
    pub fn db_config(&self) -> DbConfig {
        DbConfig::new(&self.db_path).max_connections(self.db_max_connections)
    }
}

/// Configuration error types.
#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    #[error("Invalid value for {0}")]
    InvalidValue(String),
}
