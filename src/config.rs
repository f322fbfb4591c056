//! # Client Configuration
//!
//! Settings for reaching the dealership API, loaded by layering:
//! - built-in defaults;
//! - an optional `dealer-reservation.toml` file;
//! - `DEALER_`-prefixed environment variables (e.g. `DEALER_BASE_URL`).
//!
//! # Examples
//!
//! ```
//! use dealer_reservation::config::ClientConfig;
//!
//! let config = ClientConfig::default();
//! assert_eq!(config.base_url().unwrap().as_str(), "http://localhost:8000/api/");
//! assert!(config.request_timeout_ms.is_none());
//! ```

use crate::domain::value_objects::DepositRate;
use config::builder::DefaultState;
use config::{ConfigBuilder, Environment, File};
use reqwest::Url;
use serde::Deserialize;
use thiserror::Error;

/// Default configuration file name, without extension.
pub const DEFAULT_CONFIG_FILE: &str = "dealer-reservation";

/// Environment variable prefix.
pub const ENV_PREFIX: &str = "DEALER";

/// Error type for configuration loading.
#[derive(Debug, Error)]
pub enum ConfigError {
    /// A source could not be read or deserialized.
    #[error("failed to load configuration: {0}")]
    Load(#[from] config::ConfigError),

    /// The base URL is not an absolute http(s) URL.
    #[error("invalid base URL {url:?}: {reason}")]
    InvalidBaseUrl {
        /// The configured value.
        url: String,
        /// Why it was rejected.
        reason: String,
    },

    /// A zero timeout was configured.
    #[error("request timeout must be greater than zero")]
    ZeroTimeout,
}

/// Result type for configuration loading.
pub type ConfigResult<T> = Result<T, ConfigError>;

/// Remote client configuration.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
#[serde(default)]
pub struct ClientConfig {
    /// API root, e.g. `http://localhost:8000/api/`.
    pub base_url: String,

    /// Per-request timeout. `None` waits until the call resolves.
    pub request_timeout_ms: Option<u64>,

    /// Deposit fraction shown before the user confirms a reservation.
    ///
    /// Display only: the remote service charges its own rate.
    pub deposit_rate_hint: DepositRate,

    /// `User-Agent` header value.
    pub user_agent: String,
}

impl Default for ClientConfig {
    fn default() -> Self {
        Self {
            base_url: "http://localhost:8000/api/".to_string(),
            request_timeout_ms: None,
            deposit_rate_hint: DepositRate::default(),
            user_agent: concat!(env!("CARGO_PKG_NAME"), "/", env!("CARGO_PKG_VERSION"))
                .to_string(),
        }
    }
}

impl ClientConfig {
    /// Loads configuration from [`DEFAULT_CONFIG_FILE`] and the environment.
    ///
    /// # Errors
    ///
    /// Returns `ConfigError` if a source is malformed or validation fails.
    pub fn load() -> ConfigResult<Self> {
        Self::load_from(DEFAULT_CONFIG_FILE)
    }

    /// Loads configuration from an optional file at `path` and the
    /// environment.
    ///
    /// # Errors
    ///
    /// Returns `ConfigError` if a source is malformed or validation fails.
    pub fn load_from(path: impl AsRef<str>) -> ConfigResult<Self> {
        let config: Self = ConfigBuilder::<DefaultState>::default()
            .add_source(File::with_name(path.as_ref()).required(false))
            .add_source(Environment::with_prefix(ENV_PREFIX))
            .build()?
            .try_deserialize()?;
        config.validate()?;
        Ok(config)
    }

    /// Validates the configuration.
    ///
    /// # Errors
    ///
    /// - `ConfigError::InvalidBaseUrl` if the base URL is unusable
    /// - `ConfigError::ZeroTimeout` if the timeout is zero
    pub fn validate(&self) -> ConfigResult<()> {
        self.base_url()?;
        if self.request_timeout_ms == Some(0) {
            return Err(ConfigError::ZeroTimeout);
        }
        Ok(())
    }

    /// Returns the parsed base URL, with a trailing `/` so relative paths
    /// resolve beneath it.
    ///
    /// # Errors
    ///
    /// Returns `ConfigError::InvalidBaseUrl` if the value is not an absolute
    /// http(s) URL.
    pub fn base_url(&self) -> ConfigResult<Url> {
        let invalid = |reason: String| ConfigError::InvalidBaseUrl {
            url: self.base_url.clone(),
            reason,
        };

        let mut url = Url::parse(&self.base_url).map_err(|e| invalid(e.to_string()))?;
        if !matches!(url.scheme(), "http" | "https") {
            return Err(invalid(format!("unsupported scheme {}", url.scheme())));
        }
        if !url.path().ends_with('/') {
            let path = format!("{}/", url.path());
            url.set_path(&path);
        }
        Ok(url)
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;
    use rust_decimal::Decimal;

    #[test]
    fn default_is_valid() {
        assert!(ClientConfig::default().validate().is_ok());
        assert_eq!(
            ClientConfig::default().deposit_rate_hint.percent(),
            Decimal::new(5, 0)
        );
    }

    #[test]
    fn base_url_keeps_existing_slash() {
        let config = ClientConfig {
            base_url: "https://dealer.example/api/v1/".to_string(),
            ..ClientConfig::default()
        };
        assert_eq!(config.base_url().unwrap().as_str(), "https://dealer.example/api/v1/");
    }

    #[test]
    fn rejects_relative_url() {
        let config = ClientConfig {
            base_url: "/api/".to_string(),
            ..ClientConfig::default()
        };
        assert!(matches!(
            config.validate(),
            Err(ConfigError::InvalidBaseUrl { .. })
        ));
    }

    #[test]
    fn rejects_non_http_scheme() {
        let config = ClientConfig {
            base_url: "ftp://dealer.example/".to_string(),
            ..ClientConfig::default()
        };
        assert!(config.validate().is_err());
    }

    #[test]
    fn rejects_zero_timeout() {
        let config = ClientConfig {
            request_timeout_ms: Some(0),
            ..ClientConfig::default()
        };
        assert!(matches!(config.validate(), Err(ConfigError::ZeroTimeout)));
    }

    #[test]
    fn missing_file_falls_back_to_defaults() {
        let config = ClientConfig::load_from("does-not-exist/dealer-reservation").unwrap();
        assert_eq!(config.user_agent, ClientConfig::default().user_agent);
    }
}
