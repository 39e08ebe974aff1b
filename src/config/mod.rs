//! Gateway configuration
//!
//! One immutable `AppConfig` value loaded at startup from a JSON file and
//! passed into each component at construction time. Nothing here is mutable
//! after process start; the service key can be overridden through the
//! `TABLEGATE_SERVICE_KEY` environment variable so it stays out of the file.

use std::fs;
use std::path::Path;

use serde::{Deserialize, Serialize};
use thiserror::Error;

/// Environment variable overriding `backend.service_key`
pub const SERVICE_KEY_ENV: &str = "TABLEGATE_SERVICE_KEY";

/// Configuration errors
#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("failed to read config file: {0}")]
    Io(#[from] std::io::Error),

    #[error("failed to parse config file: {0}")]
    Parse(#[from] serde_json::Error),

    #[error("missing required config value: {0}")]
    Missing(&'static str),
}

/// Top-level gateway configuration
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct AppConfig {
    /// HTTP server settings
    #[serde(default)]
    pub server: ServerConfig,

    /// Table backend settings
    #[serde(default)]
    pub backend: BackendConfig,

    /// File storage settings
    #[serde(default)]
    pub storage: StorageConfig,

    /// Allowed-table registry; requests for any other table are rejected
    #[serde(default)]
    pub tables: Vec<String>,
}

/// HTTP server configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ServerConfig {
    /// Host to bind to (default: "0.0.0.0")
    #[serde(default = "default_host")]
    pub host: String,

    /// Port to bind to (default: 8700)
    #[serde(default = "default_port")]
    pub port: u16,

    /// CORS allowed origins; empty means permissive (any origin)
    #[serde(default)]
    pub cors_origins: Vec<String>,
}

/// Table backend (REST endpoint) configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct BackendConfig {
    /// Base URL of the hosted backend, e.g. "https://project.example.co"
    #[serde(default)]
    pub base_url: String,

    /// Path prefix of the table REST endpoint (default: "/rest/v1")
    #[serde(default = "default_rest_path")]
    pub rest_path: String,

    /// Service key sent as both `apikey` and bearer token
    #[serde(default)]
    pub service_key: String,
}

/// File storage configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct StorageConfig {
    /// Base URL of the storage API, e.g. "https://project.example.co/storage/v1"
    #[serde(default)]
    pub base_url: String,

    /// Bucket used when a request does not name one (default: "file")
    #[serde(default = "default_bucket")]
    pub default_bucket: String,
}

fn default_host() -> String {
    "0.0.0.0".to_string()
}

fn default_port() -> u16 {
    8700
}

fn default_rest_path() -> String {
    "/rest/v1".to_string()
}

fn default_bucket() -> String {
    "file".to_string()
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            host: default_host(),
            port: default_port(),
            cors_origins: Vec::new(),
        }
    }
}

impl Default for BackendConfig {
    fn default() -> Self {
        Self {
            base_url: String::new(),
            rest_path: default_rest_path(),
            service_key: String::new(),
        }
    }
}

impl Default for StorageConfig {
    fn default() -> Self {
        Self {
            base_url: String::new(),
            default_bucket: default_bucket(),
        }
    }
}

impl ServerConfig {
    /// Get the socket address string
    pub fn socket_addr(&self) -> String {
        format!("{}:{}", self.host, self.port)
    }
}

impl AppConfig {
    /// Load configuration from a JSON file, applying the service-key
    /// environment override and validating required values.
    pub fn load(path: &Path) -> Result<Self, ConfigError> {
        let raw = fs::read_to_string(path)?;
        let mut config: AppConfig = serde_json::from_str(&raw)?;

        if let Ok(key) = std::env::var(SERVICE_KEY_ENV) {
            config.backend.service_key = key;
        }

        config.validate()?;
        Ok(config)
    }

    fn validate(&self) -> Result<(), ConfigError> {
        if self.backend.base_url.is_empty() {
            return Err(ConfigError::Missing("backend.base_url"));
        }
        if self.backend.service_key.is_empty() {
            return Err(ConfigError::Missing("backend.service_key"));
        }
        if self.tables.is_empty() {
            tracing::warn!("no allowed tables configured; every table request will be rejected");
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_server_config() {
        let config = ServerConfig::default();
        assert_eq!(config.host, "0.0.0.0");
        assert_eq!(config.port, 8700);
        assert!(config.cors_origins.is_empty());
    }

    #[test]
    fn test_socket_addr() {
        let config = ServerConfig {
            port: 9000,
            ..Default::default()
        };
        assert_eq!(config.socket_addr(), "0.0.0.0:9000");
    }

    #[test]
    fn test_parse_config_with_defaults() {
        let raw = r#"{
            "backend": {"base_url": "https://x.example.co", "service_key": "k"},
            "tables": ["user"]
        }"#;
        let config: AppConfig = serde_json::from_str(raw).unwrap();
        assert_eq!(config.backend.rest_path, "/rest/v1");
        assert_eq!(config.storage.default_bucket, "file");
        assert_eq!(config.server.port, 8700);
        assert_eq!(config.tables, vec!["user"]);
    }

    #[test]
    fn test_validate_requires_base_url() {
        let config = AppConfig::default();
        assert!(matches!(
            config.validate(),
            Err(ConfigError::Missing("backend.base_url"))
        ));
    }

    #[test]
    fn test_validate_requires_service_key() {
        let config = AppConfig {
            backend: BackendConfig {
                base_url: "https://x.example.co".to_string(),
                ..Default::default()
            },
            ..Default::default()
        };
        assert!(matches!(
            config.validate(),
            Err(ConfigError::Missing("backend.service_key"))
        ));
    }
}
