//! Configuration management for Spaceward
//!
//! Environment-based configuration with defaults, TOML file loading, and
//! validation. The platform section is consumed by the external transport
//! layer that implements `SpacePlatform`; the engine itself only carries
//! it through.

use serde::{Deserialize, Serialize};
use std::env;
use std::path::Path;
use std::time::Duration;

mod error;

pub use error::ConfigError;

/// Main application configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Config {
    /// Remote platform client configuration
    pub platform: PlatformConfig,

    /// Logging configuration
    pub logging: LoggingSettings,
}

/// Remote platform client configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PlatformConfig {
    /// Base URL of the platform API
    pub base_url: String,

    /// Per-request timeout
    #[serde(with = "humantime_serde")]
    pub request_timeout: Duration,

    /// User-Agent header sent with every request
    pub user_agent: String,
}

/// Logging configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct LoggingSettings {
    /// Log level (trace, debug, info, warn, error)
    pub level: String,

    /// Enable JSON formatting
    pub json_format: bool,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            platform: PlatformConfig::default(),
            logging: LoggingSettings::default(),
        }
    }
}

impl Default for PlatformConfig {
    fn default() -> Self {
        Self {
            base_url: "http://localhost:8080/api/v1".to_string(),
            request_timeout: Duration::from_secs(30),
            user_agent: format!("spaceward/{}", env!("CARGO_PKG_VERSION")),
        }
    }
}

impl Default for LoggingSettings {
    fn default() -> Self {
        Self {
            level: "info".to_string(),
            json_format: false,
        }
    }
}

impl Config {
    /// Load configuration from environment variables.
    ///
    /// Variables follow the pattern SPACEWARD_<SECTION>_<KEY>, e.g.
    /// SPACEWARD_PLATFORM_BASE_URL=https://platform.example.com/api/v1
    pub fn from_env() -> Result<Self, ConfigError> {
        let mut config = Self::default();

        if let Ok(base_url) = env::var("SPACEWARD_PLATFORM_BASE_URL") {
            config.platform.base_url = base_url;
        }
        if let Ok(timeout) = env::var("SPACEWARD_PLATFORM_REQUEST_TIMEOUT_SECS") {
            let secs: u64 = timeout.parse().map_err(|e| {
                ConfigError::InvalidValue(format!("Invalid request timeout: {}", e))
            })?;
            config.platform.request_timeout = Duration::from_secs(secs);
        }
        if let Ok(user_agent) = env::var("SPACEWARD_PLATFORM_USER_AGENT") {
            config.platform.user_agent = user_agent;
        }
        if let Ok(level) = env::var("SPACEWARD_LOG_LEVEL") {
            config.logging.level = level;
        }
        if let Ok(json) = env::var("SPACEWARD_LOG_JSON") {
            config.logging.json_format = json
                .parse()
                .map_err(|e| ConfigError::InvalidValue(format!("Invalid JSON log flag: {}", e)))?;
        }

        config.validate()?;
        Ok(config)
    }

    /// Load configuration from a TOML file
    pub fn from_file(path: impl AsRef<Path>) -> Result<Self, ConfigError> {
        let contents = std::fs::read_to_string(path.as_ref())
            .map_err(|e| ConfigError::FileReadError(e.to_string()))?;
        let config: Config =
            toml::from_str(&contents).map_err(|e| ConfigError::ParseError(e.to_string()))?;

        config.validate()?;
        Ok(config)
    }

    /// Validate configuration values
    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.platform.base_url.is_empty() {
            return Err(ConfigError::ValidationFailed(
                "platform.base_url must not be empty".to_string(),
            ));
        }
        if self.platform.request_timeout.is_zero() {
            return Err(ConfigError::ValidationFailed(
                "platform.request_timeout must be positive".to_string(),
            ));
        }
        if self.logging.level.parse::<crate::logging::LogLevel>().is_err() {
            return Err(ConfigError::ValidationFailed(format!(
                "unknown logging.level: {}",
                self.logging.level
            )));
        }
        Ok(())
    }
}
