//! Remote product catalog client.
//!
//! # Architecture
//!
//! - One GET to a fixed endpoint returning a JSON array of products
//! - Every fetch is bounded by a timeout; a caller may also abandon it early
//! - Successful fetches are cached in memory via `moka` (configurable TTL);
//!   failures are not cached, so the next request retries
//!
//! # Example
//!
//! ```rust,ignore
//! use cartline_storefront::catalog::CatalogClient;
//!
//! let client = CatalogClient::new(&config.catalog);
//! let products = client.products().await?;
//! ```

mod client;

pub use client::CatalogClient;

use std::time::Duration;

use thiserror::Error;

/// Errors that can occur when fetching the catalog.
#[derive(Debug, Error)]
pub enum CatalogError {
    /// Transport failure (connection refused, DNS, TLS, reset).
    #[error("HTTP error: {0}")]
    Http(#[from] reqwest::Error),

    /// The catalog answered with a non-success status.
    #[error("Catalog returned HTTP {0}")]
    Status(u16),

    /// JSON parsing failed.
    #[error("JSON parse error: {0}")]
    Parse(#[from] serde_json::Error),

    /// The bounded wait elapsed before the catalog answered.
    #[error("Catalog request timed out after {}ms", .0.as_millis())]
    Timeout(Duration),

    /// The caller abandoned the request.
    #[error("Catalog request cancelled")]
    Cancelled,
}
