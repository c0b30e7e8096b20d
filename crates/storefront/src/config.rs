//! Storefront configuration loaded from environment variables.
//!
//! # Environment Variables
//!
//! All optional:
//! - `CARTLINE_HOST` - Bind address (default: 127.0.0.1)
//! - `CARTLINE_PORT` - Listen port (default: 3000)
//! - `CARTLINE_DATA_DIR` - Directory holding the persisted cart (default: .cartline)
//! - `CARTLINE_STATIC_DIR` - Static assets (default: crates/storefront/static)
//! - `CARTLINE_CATALOG_URL` - Product list endpoint (default: <https://fakestoreapi.com/products>)
//! - `CARTLINE_CATALOG_TIMEOUT_SECS` - Bounded wait for one catalog fetch (default: 10)
//! - `CARTLINE_CATALOG_CACHE_TTL_SECS` - How long a fetched product list is reused (default: 300)
//! - `SENTRY_DSN` - Sentry error tracking DSN
//! - `SENTRY_ENVIRONMENT` - Sentry environment name

use std::net::{IpAddr, SocketAddr};
use std::path::PathBuf;
use std::time::Duration;

use thiserror::Error;
use url::Url;

const DEFAULT_CATALOG_URL: &str = "https://fakestoreapi.com/products";

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
    /// Directory for the durable cart store
    pub data_dir: PathBuf,
    /// Directory served under `/static`
    pub static_dir: PathBuf,
    /// Remote catalog configuration
    pub catalog: CatalogConfig,
    /// Sentry DSN for error tracking
    pub sentry_dsn: Option<String>,
    /// Sentry environment name
    pub sentry_environment: Option<String>,
}

/// Remote catalog configuration.
#[derive(Debug, Clone)]
pub struct CatalogConfig {
    /// Endpoint returning the product list as a JSON array
    pub endpoint: Url,
    /// Upper bound on one fetch
    pub timeout: Duration,
    /// How long a successful fetch is served from cache
    pub cache_ttl: Duration,
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

    /// Build the configuration from an arbitrary variable source.
    ///
    /// # Errors
    ///
    /// Returns `ConfigError` if a variable is set to an unparseable value.
    pub fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> Result<Self, ConfigError> {
        let env = Env(lookup);

        let host = env.parse_or("CARTLINE_HOST", "127.0.0.1", |v| {
            v.parse::<IpAddr>().map_err(|e| e.to_string())
        })?;
        let port = env.parse_or("CARTLINE_PORT", "3000", |v| {
            v.parse::<u16>().map_err(|e| e.to_string())
        })?;
        let data_dir = PathBuf::from(env.or_default("CARTLINE_DATA_DIR", ".cartline"));
        let static_dir =
            PathBuf::from(env.or_default("CARTLINE_STATIC_DIR", "crates/storefront/static"));

        let catalog = CatalogConfig::from_env(&env)?;

        Ok(Self {
            host,
            port,
            data_dir,
            static_dir,
            catalog,
            sentry_dsn: env.optional("SENTRY_DSN"),
            sentry_environment: env.optional("SENTRY_ENVIRONMENT"),
        })
    }

    /// Returns the socket address for binding the server.
    #[must_use]
    pub const fn socket_addr(&self) -> SocketAddr {
        SocketAddr::new(self.host, self.port)
    }
}

impl CatalogConfig {
    fn from_env<F: Fn(&str) -> Option<String>>(env: &Env<F>) -> Result<Self, ConfigError> {
        let endpoint = env.parse_or("CARTLINE_CATALOG_URL", DEFAULT_CATALOG_URL, |v| {
            Url::parse(v).map_err(|e| e.to_string())
        })?;
        let timeout = env.parse_or("CARTLINE_CATALOG_TIMEOUT_SECS", "10", parse_positive_secs)?;
        let cache_ttl = env.parse_or("CARTLINE_CATALOG_CACHE_TTL_SECS", "300", |v| {
            v.parse::<u64>()
                .map(Duration::from_secs)
                .map_err(|e| e.to_string())
        })?;

        Ok(Self {
            endpoint,
            timeout,
            cache_ttl,
        })
    }
}

// =============================================================================
// Helper Functions
// =============================================================================

/// Variable source with the default/optional helpers.
struct Env<F>(F);

impl<F: Fn(&str) -> Option<String>> Env<F> {
    /// Get an optional variable, treating empty values as unset.
    fn optional(&self, key: &str) -> Option<String> {
        (self.0)(key).filter(|v| !v.trim().is_empty())
    }

    /// Get a variable with a default value.
    fn or_default(&self, key: &str, default: &str) -> String {
        self.optional(key).unwrap_or_else(|| default.to_string())
    }

    /// Parse a variable (or its default), naming the variable on failure.
    fn parse_or<T>(
        &self,
        key: &str,
        default: &str,
        parse: impl FnOnce(&str) -> Result<T, String>,
    ) -> Result<T, ConfigError> {
        let value = self.or_default(key, default);
        parse(value.trim()).map_err(|reason| ConfigError::InvalidEnvVar(key.to_string(), reason))
    }
}

fn parse_positive_secs(value: &str) -> Result<Duration, String> {
    match value.parse::<u64>() {
        Ok(0) => Err("must be greater than zero".to_string()),
        Ok(secs) => Ok(Duration::from_secs(secs)),
        Err(e) => Err(e.to_string()),
    }
}
