//! Storefront configuration loaded from environment variables.
//!
//! # Environment Variables
//!
//! All variables are optional.
//!
//! - `PUPPYRACER_HOST` - Bind address (default: 127.0.0.1)
//! - `PUPPYRACER_PORT` - Listen port (default: 3000)
//! - `PUPPYRACER_STORAGE_DIR` - Directory for persisted client state (default: .puppyracer)
//! - `PUPPYRACER_CATALOG_PATH` - YAML catalog file replacing the built-in catalog
//! - `SENTRY_DSN` - Sentry error tracking DSN
//! - `SENTRY_ENVIRONMENT` - Sentry environment name
//! - `SENTRY_SAMPLE_RATE` - Error event sample rate, 0.0-1.0 (default: 1.0)
//! - `SENTRY_TRACES_SAMPLE_RATE` - Performance trace sample rate, 0.0-1.0 (default: 0.0)

use std::net::{IpAddr, SocketAddr};
use std::path::PathBuf;

use thiserror::Error;

/// Default directory for the file-backed local storage.
pub const DEFAULT_STORAGE_DIR: &str = ".puppyracer";

/// Configuration errors that can occur during loading.
#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("Invalid environment variable {0}: {1}")]
    InvalidEnvVar(String, String),
}

/// Storefront application configuration.
#[derive(Debug, Clone)]
pub struct StorefrontConfig {
    /// IP address to bind the server to
    pub host: IpAddr,
    /// Port to listen on
    pub port: u16,
    /// Directory holding the persisted cart
    pub storage_dir: PathBuf,
    /// Catalog file; `None` uses the built-in catalog
    pub catalog_path: Option<PathBuf>,
    /// Sentry DSN for error tracking
    pub sentry_dsn: Option<String>,
    /// Sentry environment (e.g. "production")
    pub sentry_environment: Option<String>,
    /// Fraction of error events sent to Sentry
    pub sentry_sample_rate: f32,
    /// Fraction of transactions traced in Sentry
    pub sentry_traces_sample_rate: f32,
}

impl Default for StorefrontConfig {
    fn default() -> Self {
        Self {
            host: IpAddr::from([127, 0, 0, 1]),
            port: 3000,
            storage_dir: PathBuf::from(DEFAULT_STORAGE_DIR),
            catalog_path: None,
            sentry_dsn: None,
            sentry_environment: None,
            sentry_sample_rate: 1.0,
            sentry_traces_sample_rate: 0.0,
        }
    }
}

impl StorefrontConfig {
    /// Load configuration from environment variables.
    ///
    /// Calls `dotenvy::dotenv()` to load from `.env` file if present.
    ///
    /// # Errors
    ///
    /// Returns `ConfigError` if a variable is set to an unparseable value.
    pub fn from_env() -> Result<Self, ConfigError> {
        // Load .env file if present (ignore errors if not found)
        let _ = dotenvy::dotenv();
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    /// Build configuration from an arbitrary variable lookup.
    ///
    /// # Errors
    ///
    /// Returns `ConfigError` if a variable is set to an unparseable value.
    pub fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> Result<Self, ConfigError> {
        let defaults = Self::default();

        let host = parse_or(&lookup, "PUPPYRACER_HOST", defaults.host)?;
        let port = parse_or(&lookup, "PUPPYRACER_PORT", defaults.port)?;
        let storage_dir = lookup("PUPPYRACER_STORAGE_DIR")
            .filter(|v| !v.trim().is_empty())
            .map_or(defaults.storage_dir, PathBuf::from);
        let catalog_path = lookup("PUPPYRACER_CATALOG_PATH")
            .filter(|v| !v.trim().is_empty())
            .map(PathBuf::from);

        let sentry_sample_rate = parse_rate(&lookup, "SENTRY_SAMPLE_RATE", 1.0)?;
        let sentry_traces_sample_rate = parse_rate(&lookup, "SENTRY_TRACES_SAMPLE_RATE", 0.0)?;

        Ok(Self {
            host,
            port,
            storage_dir,
            catalog_path,
            sentry_dsn: lookup("SENTRY_DSN").filter(|v| !v.is_empty()),
            sentry_environment: lookup("SENTRY_ENVIRONMENT").filter(|v| !v.is_empty()),
            sentry_sample_rate,
            sentry_traces_sample_rate,
        })
    }

    /// Returns the socket address for binding the server.
    #[must_use]
    pub const fn socket_addr(&self) -> SocketAddr {
        SocketAddr::new(self.host, self.port)
    }
}

// =============================================================================
// Helper Functions
// =============================================================================

/// Parse a variable, falling back to `default` when it is unset.
fn parse_or<T>(
    lookup: &impl Fn(&str) -> Option<String>,
    key: &str,
    default: T,
) -> Result<T, ConfigError>
where
    T: std::str::FromStr,
    T::Err: std::fmt::Display,
{
    match lookup(key) {
        Some(value) => value
            .trim()
            .parse::<T>()
            .map_err(|e| ConfigError::InvalidEnvVar(key.to_string(), e.to_string())),
        None => Ok(default),
    }
}

/// Parse a sample rate, which must lie in `0.0..=1.0`.
fn parse_rate(
    lookup: &impl Fn(&str) -> Option<String>,
    key: &str,
    default: f32,
) -> Result<f32, ConfigError> {
    let rate = parse_or(lookup, key, default)?;
    if (0.0..=1.0).contains(&rate) {
        Ok(rate)
    } else {
        Err(ConfigError::InvalidEnvVar(
            key.to_string(),
            format!("must be between 0.0 and 1.0 (got {rate})"),
        ))
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use std::collections::HashMap;

    use super::*;

    fn lookup_from(vars: &[(&str, &str)]) -> impl Fn(&str) -> Option<String> {
        let vars: HashMap<String, String> = vars
            .iter()
            .map(|(k, v)| ((*k).to_string(), (*v).to_string()))
            .collect();
        move |key| vars.get(key).cloned()
    }

    #[test]
    fn test_defaults() {
        let config = StorefrontConfig::from_lookup(lookup_from(&[])).unwrap();
        assert_eq!(config.socket_addr().to_string(), "127.0.0.1:3000");
        assert_eq!(config.storage_dir, PathBuf::from(".puppyracer"));
        assert!(config.catalog_path.is_none());
        assert!(config.sentry_dsn.is_none());
    }

    #[test]
    fn test_overrides() {
        let config = StorefrontConfig::from_lookup(lookup_from(&[
            ("PUPPYRACER_HOST", "0.0.0.0"),
            ("PUPPYRACER_PORT", "8080"),
            ("PUPPYRACER_STORAGE_DIR", "/var/lib/puppyracer"),
            ("PUPPYRACER_CATALOG_PATH", "catalog.yaml"),
            ("SENTRY_TRACES_SAMPLE_RATE", "0.25"),
        ]))
        .unwrap();

        assert_eq!(config.socket_addr().to_string(), "0.0.0.0:8080");
        assert_eq!(config.storage_dir, PathBuf::from("/var/lib/puppyracer"));
        assert_eq!(config.catalog_path, Some(PathBuf::from("catalog.yaml")));
        assert!((config.sentry_traces_sample_rate - 0.25).abs() < f32::EPSILON);
    }

    #[test]
    fn test_invalid_port() {
        let err = StorefrontConfig::from_lookup(lookup_from(&[("PUPPYRACER_PORT", "http")]))
            .unwrap_err();
        assert!(matches!(err, ConfigError::InvalidEnvVar(key, _) if key == "PUPPYRACER_PORT"));
    }

    #[test]
    fn test_invalid_host() {
        let result = StorefrontConfig::from_lookup(lookup_from(&[("PUPPYRACER_HOST", "localhost")]));
        assert!(result.is_err());
    }

    #[test]
    fn test_sample_rate_out_of_range() {
        let result =
            StorefrontConfig::from_lookup(lookup_from(&[("SENTRY_SAMPLE_RATE", "1.5")]));
        assert!(result.is_err());
    }

    #[test]
    fn test_blank_storage_dir_uses_default() {
        let config =
            StorefrontConfig::from_lookup(lookup_from(&[("PUPPYRACER_STORAGE_DIR", "  ")])).unwrap();
        assert_eq!(config.storage_dir, PathBuf::from(DEFAULT_STORAGE_DIR));
    }
}
