//! Catalog client implementation.
//!
//! Uses `reqwest` for HTTP and `moka` for caching the product list.

use std::future::Future;
use std::sync::Arc;
use std::time::Duration;

use cartline_core::Product;
use moka::future::Cache;
use tracing::{debug, instrument};
use url::Url;

use super::CatalogError;
use crate::config::CatalogConfig;

const PRODUCTS_KEY: &str = "products";

/// Client for the remote product catalog.
///
/// Cheaply cloneable; clones share the HTTP connection pool and the cache.
#[derive(Clone)]
pub struct CatalogClient {
    inner: Arc<CatalogClientInner>,
}

struct CatalogClientInner {
    client: reqwest::Client,
    endpoint: Url,
    timeout: Duration,
    cache_ttl: Duration,
    cache: Cache<String, Arc<Vec<Product>>>,
}

impl CatalogClient {
    /// Create a new catalog client.
    #[must_use]
    pub fn new(config: &CatalogConfig) -> Self {
        let cache = Cache::builder()
            .max_capacity(1)
            .time_to_live(config.cache_ttl)
            .build();

        Self {
            inner: Arc::new(CatalogClientInner {
                client: reqwest::Client::new(),
                endpoint: config.endpoint.clone(),
                timeout: config.timeout,
                cache_ttl: config.cache_ttl,
                cache,
            }),
        }
    }

    /// The product list, from cache when a recent fetch succeeded.
    ///
    /// # Errors
    ///
    /// Returns an error if the cache is cold and the fetch fails.
    #[instrument(skip(self))]
    pub async fn products(&self) -> Result<Arc<Vec<Product>>, CatalogError> {
        if let Some(products) = self.inner.cache.get(PRODUCTS_KEY).await {
            debug!("Cache hit for products");
            return Ok(products);
        }

        let products = self.fetch_products().await?;
        Ok(self.remember(products).await)
    }

    /// Fetch the product list, bypassing the cache.
    ///
    /// # Errors
    ///
    /// Returns [`CatalogError::Timeout`] if no answer arrives within the
    /// configured timeout, or the transport, status or parse error otherwise.
    #[instrument(skip(self), fields(endpoint = %self.inner.endpoint))]
    pub async fn fetch_products(&self) -> Result<Vec<Product>, CatalogError> {
        let timeout = self.inner.timeout;
        tokio::time::timeout(timeout, self.request())
            .await
            .map_err(|_| CatalogError::Timeout(timeout))?
    }

    /// Fetch the product list unless `cancel` completes first.
    ///
    /// # Errors
    ///
    /// Returns [`CatalogError::Cancelled`] if `cancel` won, otherwise the same
    /// errors as [`fetch_products`](Self::fetch_products).
    pub async fn fetch_products_until<F>(&self, cancel: F) -> Result<Vec<Product>, CatalogError>
    where
        F: Future<Output = ()>,
    {
        tokio::select! {
            result = self.fetch_products() => result,
            () = cancel => {
                debug!("Catalog fetch cancelled");
                Err(CatalogError::Cancelled)
            }
        }
    }

    /// Fill the cache ahead of the first page view.
    ///
    /// Returns the number of products fetched.
    ///
    /// # Errors
    ///
    /// Returns an error if the fetch fails or is cancelled.
    pub async fn warm<F>(&self, cancel: F) -> Result<usize, CatalogError>
    where
        F: Future<Output = ()>,
    {
        let products = self.fetch_products_until(cancel).await?;
        Ok(self.remember(products).await.len())
    }

    async fn remember(&self, products: Vec<Product>) -> Arc<Vec<Product>> {
        let products = Arc::new(products);
        if !self.inner.cache_ttl.is_zero() {
            self.inner
                .cache
                .insert(PRODUCTS_KEY.to_string(), Arc::clone(&products))
                .await;
        }
        products
    }

    async fn request(&self) -> Result<Vec<Product>, CatalogError> {
        let response = self
            .inner
            .client
            .get(self.inner.endpoint.clone())
            .header("Accept", "application/json")
            .send()
            .await?;

        let status = response.status();
        let body = response.text().await?;

        if !status.is_success() {
            tracing::error!(
                status = %status,
                body = %body.chars().take(500).collect::<String>(),
                "Catalog returned non-success status"
            );
            return Err(CatalogError::Status(status.as_u16()));
        }

        let products: Vec<Product> = serde_json::from_str(&body).map_err(|e| {
            tracing::error!(
                error = %e,
                body = %body.chars().take(500).collect::<String>(),
                "Failed to parse catalog response"
            );
            CatalogError::Parse(e)
        })?;

        debug!(count = products.len(), "Fetched catalog");
        Ok(products)
    }
}
