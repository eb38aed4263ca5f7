//! Storefront configuration.
//!
//! # Example
//!
//! ```no_run
//! use larek_shop::config::ShopConfig;
//! use std::time::Duration;
//!
//! // LAREK_API_ORIGIN=https://larek-api.nomoreparties.co
//! let config = ShopConfig::from_env()?
//!     .with_request_timeout(Duration::from_secs(5));
//! # Ok::<(), larek_shop::config::ConfigError>(())
//! ```

use std::time::Duration;
use thiserror::Error;

/// Backend origin; API and CDN bases are derived from it
pub const ENV_API_ORIGIN: &str = "LAREK_API_ORIGIN";
/// Overrides the derived API base
pub const ENV_API_URL: &str = "LAREK_API_URL";
/// Overrides the derived CDN base
pub const ENV_CDN_URL: &str = "LAREK_CDN_URL";
/// Request timeout in whole seconds
pub const ENV_REQUEST_TIMEOUT_SECS: &str = "LAREK_REQUEST_TIMEOUT_SECS";

const DEFAULT_ORIGIN: &str = "http://localhost:3000";
const DEFAULT_TIMEOUT: Duration = Duration::from_secs(10);

/// Configuration errors
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum ConfigError {
    /// Environment variable not set
    #[error("Environment variable not set: {0}")]
    EnvVarNotSet(&'static str),

    /// Environment variable set to something unusable
    #[error("Invalid value for {key}: {value:?} ({reason})")]
    InvalidValue {
        /// Variable name
        key: &'static str,
        /// Value found
        value: String,
        /// What is wrong with it
        reason: &'static str,
    },
}

/// Where the backend lives and how long to wait for it
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct ShopConfig {
    /// REST API base, e.g. `https://host/api/weblarek`
    pub api_url: String,
    /// Image base, e.g. `https://host/content/weblarek`
    pub cdn_url: String,
    /// Per-request timeout
    pub request_timeout: Duration,
}

impl ShopConfig {
    /// Configuration for a backend at `origin`
    #[must_use]
    pub fn new(origin: &str) -> Self {
        let origin = origin.trim_end_matches('/');
        Self {
            api_url: format!("{origin}/api/weblarek"),
            cdn_url: format!("{origin}/content/weblarek"),
            request_timeout: DEFAULT_TIMEOUT,
        }
    }

    /// Set the API base
    #[must_use]
    pub fn with_api_url(mut self, url: impl Into<String>) -> Self {
        self.api_url = url.into();
        self
    }

    /// Set the CDN base
    #[must_use]
    pub fn with_cdn_url(mut self, url: impl Into<String>) -> Self {
        self.cdn_url = url.into();
        self
    }

    /// Set the request timeout
    #[must_use]
    pub const fn with_request_timeout(mut self, timeout: Duration) -> Self {
        self.request_timeout = timeout;
        self
    }

    /// Load configuration from the process environment
    ///
    /// # Errors
    ///
    /// Returns [`ConfigError::EnvVarNotSet`] if `LAREK_API_ORIGIN` is missing,
    /// or [`ConfigError::InvalidValue`] if a variable cannot be used.
    pub fn from_env() -> Result<Self, ConfigError> {
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    /// Load configuration from any key/value source
    ///
    /// # Errors
    ///
    /// Same as [`ShopConfig::from_env`].
    pub fn from_lookup<F>(lookup: F) -> Result<Self, ConfigError>
    where
        F: Fn(&str) -> Option<String>,
    {
        let origin = lookup(ENV_API_ORIGIN).ok_or(ConfigError::EnvVarNotSet(ENV_API_ORIGIN))?;
        if !origin.starts_with("http://") && !origin.starts_with("https://") {
            return Err(ConfigError::InvalidValue {
                key: ENV_API_ORIGIN,
                value: origin,
                reason: "expected an http(s) URL",
            });
        }

        let mut config = Self::new(&origin);

        if let Some(url) = lookup(ENV_API_URL) {
            config = config.with_api_url(url);
        }

        if let Some(url) = lookup(ENV_CDN_URL) {
            config = config.with_cdn_url(url);
        }

        if let Some(raw) = lookup(ENV_REQUEST_TIMEOUT_SECS) {
            let secs = match raw.parse::<u64>() {
                Ok(secs) if secs > 0 => secs,
                _ => {
                    return Err(ConfigError::InvalidValue {
                        key: ENV_REQUEST_TIMEOUT_SECS,
                        value: raw,
                        reason: "expected a positive number of seconds",
                    });
                },
            };
            config = config.with_request_timeout(Duration::from_secs(secs));
        }

        Ok(config)
    }
}

impl Default for ShopConfig {
    fn default() -> Self {
        Self::new(DEFAULT_ORIGIN)
    }
}

#[cfg(test)]
mod tests {
    #![allow(clippy::unwrap_used)]

    use super::*;
    use std::collections::HashMap;

    fn lookup(pairs: &[(&str, &str)]) -> impl Fn(&str) -> Option<String> {
        let map: HashMap<String, String> = pairs
            .iter()
            .map(|(k, v)| ((*k).to_string(), (*v).to_string()))
            .collect();
        move |key| map.get(key).cloned()
    }

    #[test]
    fn derives_urls_from_origin() {
        let config = ShopConfig::from_lookup(lookup(&[(ENV_API_ORIGIN, "https://larek.example/")])).unwrap();

        assert_eq!(config.api_url, "https://larek.example/api/weblarek");
        assert_eq!(config.cdn_url, "https://larek.example/content/weblarek");
        assert_eq!(config.request_timeout, DEFAULT_TIMEOUT);
    }

    #[test]
    fn overrides_apply() {
        let config = ShopConfig::from_lookup(lookup(&[
            (ENV_API_ORIGIN, "https://larek.example"),
            (ENV_CDN_URL, "https://cdn.example"),
            (ENV_REQUEST_TIMEOUT_SECS, "3"),
        ]))
        .unwrap();

        assert_eq!(config.api_url, "https://larek.example/api/weblarek");
        assert_eq!(config.cdn_url, "https://cdn.example");
        assert_eq!(config.request_timeout, Duration::from_secs(3));
    }

    #[test]
    fn origin_is_required() {
        let error = ShopConfig::from_lookup(lookup(&[])).unwrap_err();
        assert_eq!(error, ConfigError::EnvVarNotSet(ENV_API_ORIGIN));
    }

    #[test]
    fn bad_values_are_reported() {
        let error = ShopConfig::from_lookup(lookup(&[(ENV_API_ORIGIN, "larek.example")])).unwrap_err();
        assert!(matches!(error, ConfigError::InvalidValue { key: ENV_API_ORIGIN, .. }));

        let error = ShopConfig::from_lookup(lookup(&[
            (ENV_API_ORIGIN, "http://larek.example"),
            (ENV_REQUEST_TIMEOUT_SECS, "0"),
        ]))
        .unwrap_err();
        assert!(matches!(error, ConfigError::InvalidValue { key: ENV_REQUEST_TIMEOUT_SECS, .. }));
    }

    #[test]
    fn builder_setters() {
        let config = ShopConfig::default()
            .with_api_url("http://127.0.0.1:9000/api")
            .with_request_timeout(Duration::from_millis(250));

        assert_eq!(config.api_url, "http://127.0.0.1:9000/api");
        assert_eq!(config.cdn_url, "http://localhost:3000/content/weblarek");
        assert_eq!(config.request_timeout, Duration::from_millis(250));
    }
}
