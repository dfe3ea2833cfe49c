//! Storefront configuration loaded from environment variables.
//!
//! # Environment Variables
//!
//! All variables are optional.
//!
//! - `AMPKICKS_HOST` - Bind address (default: 127.0.0.1)
//! - `AMPKICKS_PORT` - Listen port (default: 3000)
//! - `AMPKICKS_CATALOG_PATH` - Product catalog JSON (default: data/products.json)
//! - `AMPKICKS_STORE_PATH` - JSON file for the cart and orders (default: in-memory)
//! - `AMPKICKS_STATIC_DIR` - Directory served under `/static` (default: static)
//! - `SENTRY_DSN` - Sentry error tracking DSN
//! - `SENTRY_ENVIRONMENT` - Sentry environment name
//! - `SENTRY_SAMPLE_RATE` - Error event sample rate, 0.0-1.0 (default: 1.0)
//! - `SENTRY_TRACES_SAMPLE_RATE` - Transaction sample rate, 0.0-1.0 (default: 0.0)
//!
//! Logging is controlled separately by `RUST_LOG` and `LOG_FORMAT=json`.

use std::net::{IpAddr, Ipv4Addr, SocketAddr};
use std::path::PathBuf;
use std::str::FromStr;

use thiserror::Error;

const DEFAULT_PORT: u16 = 3000;
const DEFAULT_CATALOG_PATH: &str = "data/products.json";
const DEFAULT_STATIC_DIR: &str = "static";

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
    /// Product catalog file
    pub catalog_path: PathBuf,
    /// Store file; `None` keeps the cart and orders in memory
    pub store_path: Option<PathBuf>,
    /// Directory of product images and other static assets
    pub static_dir: PathBuf,
    /// Sentry DSN for error tracking
    pub sentry_dsn: Option<String>,
    /// Sentry environment name
    pub sentry_environment: Option<String>,
    /// Fraction of error events sent to Sentry
    pub sentry_sample_rate: f32,
    /// Fraction of transactions sent to Sentry
    pub sentry_traces_sample_rate: f32,
}

impl Default for StorefrontConfig {
    fn default() -> Self {
        Self {
            host: IpAddr::V4(Ipv4Addr::LOCALHOST),
            port: DEFAULT_PORT,
            catalog_path: PathBuf::from(DEFAULT_CATALOG_PATH),
            store_path: None,
            static_dir: PathBuf::from(DEFAULT_STATIC_DIR),
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
    /// Returns `ConfigError` if a variable is set but cannot be parsed.
    pub fn from_env() -> Result<Self, ConfigError> {
        // Load .env file if present (ignore errors if not found)
        let _ = dotenvy::dotenv();

        Self::from_vars(|key| std::env::var(key).ok())
    }

    /// Build configuration from a variable lookup.
    ///
    /// # Errors
    ///
    /// Returns `ConfigError` if a variable is set but cannot be parsed.
    pub fn from_vars(lookup: impl Fn(&str) -> Option<String>) -> Result<Self, ConfigError> {
        let defaults = Self::default();

        let host = parse_or(&lookup, "AMPKICKS_HOST", defaults.host)?;
        let port = parse_or(&lookup, "AMPKICKS_PORT", defaults.port)?;
        let catalog_path = lookup("AMPKICKS_CATALOG_PATH")
            .map_or(defaults.catalog_path, PathBuf::from);
        let store_path = non_empty(&lookup, "AMPKICKS_STORE_PATH").map(PathBuf::from);
        let static_dir = lookup("AMPKICKS_STATIC_DIR").map_or(defaults.static_dir, PathBuf::from);

        let sentry_dsn = non_empty(&lookup, "SENTRY_DSN");
        let sentry_environment = non_empty(&lookup, "SENTRY_ENVIRONMENT");
        let sentry_sample_rate =
            parse_rate(&lookup, "SENTRY_SAMPLE_RATE", defaults.sentry_sample_rate)?;
        let sentry_traces_sample_rate = parse_rate(
            &lookup,
            "SENTRY_TRACES_SAMPLE_RATE",
            defaults.sentry_traces_sample_rate,
        )?;

        Ok(Self {
            host,
            port,
            catalog_path,
            store_path,
            static_dir,
            sentry_dsn,
            sentry_environment,
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

/// Get a variable, treating blank values as unset.
fn non_empty(lookup: &impl Fn(&str) -> Option<String>, key: &str) -> Option<String> {
    lookup(key).filter(|v| !v.trim().is_empty())
}

/// Parse a variable, falling back to `default` when unset.
fn parse_or<T>(
    lookup: &impl Fn(&str) -> Option<String>,
    key: &str,
    default: T,
) -> Result<T, ConfigError>
where
    T: FromStr,
    T::Err: std::fmt::Display,
{
    non_empty(lookup, key).map_or(Ok(default), |value| {
        value
            .trim()
            .parse()
            .map_err(|e: T::Err| ConfigError::InvalidEnvVar(key.to_string(), e.to_string()))
    })
}

/// Parse a sample rate and check it is within 0.0-1.0.
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

    fn vars(pairs: &[(&str, &str)]) -> impl Fn(&str) -> Option<String> {
        let map: HashMap<String, String> = pairs
            .iter()
            .map(|(k, v)| ((*k).to_string(), (*v).to_string()))
            .collect();
        move |key: &str| map.get(key).cloned()
    }

    #[test]
    fn test_defaults() {
        let config = StorefrontConfig::from_vars(vars(&[])).unwrap();
        assert_eq!(config.socket_addr().to_string(), "127.0.0.1:3000");
        assert_eq!(config.catalog_path, PathBuf::from("data/products.json"));
        assert!(config.store_path.is_none());
        assert!(config.sentry_dsn.is_none());
    }

    #[test]
    fn test_overrides() {
        let config = StorefrontConfig::from_vars(vars(&[
            ("AMPKICKS_HOST", "0.0.0.0"),
            ("AMPKICKS_PORT", "8080"),
            ("AMPKICKS_CATALOG_PATH", "/srv/catalog.json"),
            ("AMPKICKS_STORE_PATH", "/var/lib/ampkicks/store.json"),
            ("SENTRY_TRACES_SAMPLE_RATE", "0.25"),
        ]))
        .unwrap();

        assert_eq!(config.socket_addr().to_string(), "0.0.0.0:8080");
        assert_eq!(config.catalog_path, PathBuf::from("/srv/catalog.json"));
        assert_eq!(
            config.store_path,
            Some(PathBuf::from("/var/lib/ampkicks/store.json"))
        );
        assert!((config.sentry_traces_sample_rate - 0.25).abs() < f32::EPSILON);
    }

    #[test]
    fn test_blank_store_path_means_memory() {
        let config = StorefrontConfig::from_vars(vars(&[("AMPKICKS_STORE_PATH", "  ")])).unwrap();
        assert!(config.store_path.is_none());
    }

    #[test]
    fn test_invalid_port() {
        let err = StorefrontConfig::from_vars(vars(&[("AMPKICKS_PORT", "eighty")])).unwrap_err();
        assert!(matches!(err, ConfigError::InvalidEnvVar(ref key, _) if key == "AMPKICKS_PORT"));
    }

    #[test]
    fn test_invalid_host() {
        assert!(StorefrontConfig::from_vars(vars(&[("AMPKICKS_HOST", "localhost")])).is_err());
    }

    #[test]
    fn test_sample_rate_out_of_range() {
        let err =
            StorefrontConfig::from_vars(vars(&[("SENTRY_SAMPLE_RATE", "1.5")])).unwrap_err();
        assert!(err.to_string().contains("SENTRY_SAMPLE_RATE"));
    }
}
