//! Configuration loading and constants.
//!
//! Loads application configuration from an optional TOML file and defines the
//! fixed strings, default paths and HTTP header values used by the service.
//! `AppConfig` is the root configuration struct; every field has a default so an
//! empty file (or no file at all) yields a working configuration.

use const_format::formatcp;
use serde::Deserialize;
use std::path::{Path, PathBuf};

// =============================================================================
// HTTP
// =============================================================================

/// Default bind host (all interfaces)
pub const DEFAULT_HTTP_HOST: &str = "0.0.0.0";

/// Default listen port
pub const DEFAULT_HTTP_PORT: u16 = 5000;

/// Default socket address, for help text and logs
pub const DEFAULT_BIND_ADDR: &str = formatcp!("{}:{}", DEFAULT_HTTP_HOST, DEFAULT_HTTP_PORT);

/// Body returned by the root liveness route
pub const LIVENESS_MESSAGE: &str = "House Price Prediction API - Up and Running!";

/// Predictions depend on the request body only and must never be stored by
/// intermediaries.
pub const CACHE_CONTROL_PREDICT: &str = "no-store";

/// Seconds to wait for in-flight connections on shutdown
pub const SHUTDOWN_GRACE_SECS: u64 = 30;

// =============================================================================
// Artifacts
// =============================================================================

/// Default path of the serialized regressor
pub const DEFAULT_MODEL_PATH: &str = "best_rf_model.json";

/// Default path of the serialized feature scaler
pub const DEFAULT_SCALER_PATH: &str = "scaler.json";

// =============================================================================
// Logging
// =============================================================================

/// Default log filter when neither --log-level nor RUST_LOG is set
pub const DEFAULT_LOG_FILTER: &str = "house_price_api=info,tower_http=info";

/// Default log format (text or json)
pub const DEFAULT_LOG_FORMAT: &str = "text";

#[derive(Debug, Clone, Default, Deserialize)]
pub struct AppConfig {
    /// HTTP server configuration
    #[serde(default)]
    pub http: HttpServerConfig,
    /// Locations of the model and scaler artifacts
    #[serde(default)]
    pub artifacts: ArtifactConfig,
    /// Logging configuration
    #[serde(default)]
    pub logging: LoggingConfig,
}

/// HTTP server configuration
#[derive(Debug, Clone, Deserialize)]
pub struct HttpServerConfig {
    #[serde(default = "HttpServerConfig::default_host")]
    pub host: String,
    #[serde(default = "HttpServerConfig::default_port")]
    pub port: u16,
}

impl Default for HttpServerConfig {
    fn default() -> Self {
        Self {
            host: Self::default_host(),
            port: Self::default_port(),
        }
    }
}

impl HttpServerConfig {
    fn default_host() -> String {
        DEFAULT_HTTP_HOST.to_string()
    }

    fn default_port() -> u16 {
        DEFAULT_HTTP_PORT
    }
}

/// Artifact file locations
#[derive(Debug, Clone, Deserialize)]
pub struct ArtifactConfig {
    #[serde(default = "ArtifactConfig::default_model_path")]
    pub model_path: PathBuf,
    #[serde(default = "ArtifactConfig::default_scaler_path")]
    pub scaler_path: PathBuf,
}

impl Default for ArtifactConfig {
    fn default() -> Self {
        Self {
            model_path: Self::default_model_path(),
            scaler_path: Self::default_scaler_path(),
        }
    }
}

impl ArtifactConfig {
    fn default_model_path() -> PathBuf {
        PathBuf::from(DEFAULT_MODEL_PATH)
    }

    fn default_scaler_path() -> PathBuf {
        PathBuf::from(DEFAULT_SCALER_PATH)
    }
}

/// Log output format
#[derive(Debug, Clone, Copy, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum LogFormat {
    Text,
    Json,
}

/// Logging configuration
#[derive(Debug, Clone, Deserialize)]
pub struct LoggingConfig {
    /// Log format: "text" (human-readable, default) or "json" (structured)
    #[serde(default = "LoggingConfig::default_format")]
    pub format: LogFormat,
}

impl Default for LoggingConfig {
    fn default() -> Self {
        Self {
            format: Self::default_format(),
        }
    }
}

impl LoggingConfig {
    fn default_format() -> LogFormat {
        LogFormat::Text
    }
}

impl AppConfig {
    pub fn load<P: AsRef<Path>>(path: P) -> Result<Self, ConfigError> {
        let contents = std::fs::read_to_string(path)?;
        let config: AppConfig = toml::from_str(&contents)?;
        Ok(config)
    }

    /// Load from `path` when given, otherwise fall back to built-in defaults.
    pub fn load_or_default(path: Option<&Path>) -> Result<Self, ConfigError> {
        match path {
            Some(path) => Self::load(path),
            None => Ok(Self::default()),
        }
    }
}

#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    #[error("Failed to read config file: {0}")]
    Io(#[from] std::io::Error),
    #[error("Failed to parse config: {0}")]
    Parse(#[from] toml::de::Error),
}
