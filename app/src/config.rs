//! Application configuration.
//!
//! Every setting has a default and can be overridden through an environment
//! variable:
//!
//! | Variable                       | Default                          |
//! |--------------------------------|----------------------------------|
//! | `CONDUIT_API_URL`              | `https://api.realworld.io/api/`  |
//! | `CONDUIT_START_URL`            | `http://localhost:8000/`         |
//! | `CONDUIT_CREDENTIALS`          | unset (credentials kept in memory) |
//! | `CONDUIT_SLOW_THRESHOLD_MS`    | `500`                            |
//! | `CONDUIT_REQUEST_TIMEOUT_SECS` | `30`                             |
//! | `CONDUIT_LOG`                  | `conduit=info,conduit_runtime=info` |
//!
//! # Example
//!
//! ```no_run
//! use conduit::config::AppConfig;
//!
//! # fn main() -> Result<(), Box<dyn std::error::Error>> {
//! let config = AppConfig::from_env()?;
//! println!("API: {}", config.api_url);
//! # Ok(())
//! # }
//! ```

use crate::error::ConfigError;
use std::path::PathBuf;
use std::str::FromStr;
use std::time::Duration;
use url::Url;

/// Default RealWorld API root
pub const DEFAULT_API_URL: &str = "https://api.realworld.io/api/";

/// Default URL the application starts at
pub const DEFAULT_START_URL: &str = "http://localhost:8000/";

/// Default delay before a loading page shows its spinner
pub const DEFAULT_SLOW_THRESHOLD: Duration = Duration::from_millis(500);

/// Default HTTP request timeout
pub const DEFAULT_REQUEST_TIMEOUT: Duration = Duration::from_secs(30);

/// Default log filter
pub const DEFAULT_LOG_FILTER: &str = "conduit=info,conduit_runtime=info";

/// Application configuration
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AppConfig {
    /// API root, always ending in `/`
    pub api_url: Url,
    /// URL the application is opened at
    pub start_url: Url,
    /// File holding persisted credentials; `None` keeps them in memory
    pub credentials_path: Option<PathBuf>,
    /// Delay before a loading page shows its spinner
    pub slow_threshold: Duration,
    /// HTTP request timeout
    pub request_timeout: Duration,
    /// `tracing` filter directive
    pub log_filter: String,
}

impl Default for AppConfig {
    #[allow(clippy::expect_used)] // Constant URLs
    fn default() -> Self {
        Self {
            api_url: Url::parse(DEFAULT_API_URL).expect("default API URL is valid"),
            start_url: Url::parse(DEFAULT_START_URL).expect("default start URL is valid"),
            credentials_path: None,
            slow_threshold: DEFAULT_SLOW_THRESHOLD,
            request_timeout: DEFAULT_REQUEST_TIMEOUT,
            log_filter: DEFAULT_LOG_FILTER.to_string(),
        }
    }
}

impl AppConfig {
    /// Load configuration from the process environment
    ///
    /// # Errors
    ///
    /// Returns [`ConfigError::InvalidVariable`] if a variable is set to an
    /// unusable value.
    pub fn from_env() -> Result<Self, ConfigError> {
        Self::from_lookup(|name| std::env::var(name).ok())
    }

    /// Load configuration through an arbitrary variable lookup
    ///
    /// # Errors
    ///
    /// Returns [`ConfigError::InvalidVariable`] if a variable is set to an
    /// unusable value.
    pub fn from_lookup<F>(lookup: F) -> Result<Self, ConfigError>
    where
        F: Fn(&str) -> Option<String>,
    {
        let mut config = Self::default();

        if let Some(value) = lookup("CONDUIT_API_URL") {
            config.api_url = parse_url("CONDUIT_API_URL", &value)?;
        }
        if let Some(value) = lookup("CONDUIT_START_URL") {
            config.start_url = parse_url("CONDUIT_START_URL", &value)?;
        }
        if let Some(value) = lookup("CONDUIT_CREDENTIALS") {
            config.credentials_path = (!value.trim().is_empty()).then(|| PathBuf::from(value));
        }
        if let Some(value) = lookup("CONDUIT_SLOW_THRESHOLD_MS") {
            config.slow_threshold =
                Duration::from_millis(parse_number("CONDUIT_SLOW_THRESHOLD_MS", &value)?);
        }
        if let Some(value) = lookup("CONDUIT_REQUEST_TIMEOUT_SECS") {
            config.request_timeout =
                Duration::from_secs(parse_number("CONDUIT_REQUEST_TIMEOUT_SECS", &value)?);
        }
        if let Some(value) = lookup("CONDUIT_LOG") {
            config.log_filter = value;
        }

        if !config.api_url.path().ends_with('/') {
            let path = format!("{}/", config.api_url.path());
            config.api_url.set_path(&path);
        }

        config.validate()?;
        Ok(config)
    }

    /// Validate configuration
    ///
    /// # Errors
    ///
    /// Returns error if configuration is invalid
    pub fn validate(&self) -> Result<(), ConfigError> {
        for (name, url) in [
            ("CONDUIT_API_URL", &self.api_url),
            ("CONDUIT_START_URL", &self.start_url),
        ] {
            if !matches!(url.scheme(), "http" | "https") {
                return Err(invalid(name, "scheme must be http or https"));
            }
        }
        if self.request_timeout.is_zero() {
            return Err(invalid("CONDUIT_REQUEST_TIMEOUT_SECS", "must be > 0"));
        }
        Ok(())
    }
}

fn invalid(name: &str, reason: impl Into<String>) -> ConfigError {
    ConfigError::InvalidVariable {
        name: name.to_string(),
        reason: reason.into(),
    }
}

fn parse_url(name: &str, value: &str) -> Result<Url, ConfigError> {
    Url::parse(value.trim()).map_err(|e| invalid(name, e.to_string()))
}

fn parse_number<T>(name: &str, value: &str) -> Result<T, ConfigError>
where
    T: FromStr,
    T::Err: std::fmt::Display,
{
    value.trim().parse().map_err(|e: T::Err| invalid(name, e.to_string()))
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashMap;

    fn load(vars: &[(&str, &str)]) -> Result<AppConfig, ConfigError> {
        let vars: HashMap<String, String> = vars
            .iter()
            .map(|(k, v)| ((*k).to_string(), (*v).to_string()))
            .collect();
        AppConfig::from_lookup(|name| vars.get(name).cloned())
    }

    #[test]
    fn test_defaults() {
        let config = load(&[]).unwrap();

        assert_eq!(config, AppConfig::default());
        assert_eq!(config.slow_threshold, Duration::from_millis(500));
        assert!(config.credentials_path.is_none());
    }

    #[test]
    fn test_overrides() {
        let config = load(&[
            ("CONDUIT_API_URL", "http://localhost:3000/api"),
            ("CONDUIT_CREDENTIALS", "/tmp/conduit.json"),
            ("CONDUIT_SLOW_THRESHOLD_MS", "250"),
            ("CONDUIT_REQUEST_TIMEOUT_SECS", "5"),
            ("CONDUIT_LOG", "debug"),
        ])
        .unwrap();

        assert_eq!(config.api_url.as_str(), "http://localhost:3000/api/");
        assert_eq!(config.credentials_path, Some(PathBuf::from("/tmp/conduit.json")));
        assert_eq!(config.slow_threshold, Duration::from_millis(250));
        assert_eq!(config.request_timeout, Duration::from_secs(5));
        assert_eq!(config.log_filter, "debug");
    }

    #[test]
    fn test_blank_credentials_path_means_memory() {
        let config = load(&[("CONDUIT_CREDENTIALS", "  ")]).unwrap();
        assert!(config.credentials_path.is_none());
    }

    #[test]
    fn test_rejects_bad_number() {
        let error = load(&[("CONDUIT_SLOW_THRESHOLD_MS", "soon")]).unwrap_err();
        assert!(matches!(
            error,
            ConfigError::InvalidVariable { ref name, .. } if name == "CONDUIT_SLOW_THRESHOLD_MS"
        ));
    }

    #[test]
    fn test_rejects_non_http_scheme() {
        assert!(load(&[("CONDUIT_API_URL", "ftp://example.com/")]).is_err());
    }

    #[test]
    fn test_rejects_zero_timeout() {
        assert!(load(&[("CONDUIT_REQUEST_TIMEOUT_SECS", "0")]).is_err());
    }
}
