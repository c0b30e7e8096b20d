//! Application state shared across handlers.

use std::sync::{Arc, Mutex, PoisonError};

use cartline_core::{CartStore, KeyValueStore};

use crate::catalog::CatalogClient;
use crate::config::StorefrontConfig;
use crate::error::AppError;
use crate::storage::FileStore;

/// Durable store behind the shared cart.
pub type SharedStore = Box<dyn KeyValueStore + Send>;

/// The cart as held by the application.
pub type SharedCart = CartStore<SharedStore>;

/// Application state shared across all handlers.
///
/// This struct is cheaply cloneable via `Arc` and provides access to the
/// configuration, the catalog client and the single cart store.
#[derive(Clone)]
pub struct AppState {
    inner: Arc<AppStateInner>,
}

struct AppStateInner {
    config: StorefrontConfig,
    catalog: CatalogClient,
    cart: Mutex<SharedCart>,
}

impl AppState {
    /// Create the application state, hydrating the cart from the configured
    /// data directory.
    #[must_use]
    pub fn new(config: StorefrontConfig) -> Self {
        let store = FileStore::new(&config.data_dir);
        Self::with_store(config, Box::new(store))
    }

    /// Create the application state on top of an arbitrary durable store.
    #[must_use]
    pub fn with_store(config: StorefrontConfig, store: SharedStore) -> Self {
        let catalog = CatalogClient::new(&config.catalog);
        let cart = CartStore::hydrate(store);
        tracing::info!(
            lines = cart.len(),
            items = cart.item_count(),
            "Cart loaded"
        );

        Self {
            inner: Arc::new(AppStateInner {
                config,
                catalog,
                cart: Mutex::new(cart),
            }),
        }
    }

    /// Get a reference to the storefront configuration.
    #[must_use]
    pub fn config(&self) -> &StorefrontConfig {
        &self.inner.config
    }

    /// Get a reference to the catalog client.
    #[must_use]
    pub fn catalog(&self) -> &CatalogClient {
        &self.inner.catalog
    }

    /// Run `f` with exclusive access to the cart.
    ///
    /// Cart operations are synchronous, so the lock is never held across an
    /// await point and each operation completes before the next begins.
    pub fn with_cart<R>(&self, f: impl FnOnce(&mut SharedCart) -> R) -> R {
        let mut cart = self
            .inner
            .cart
            .lock()
            .unwrap_or_else(PoisonError::into_inner);
        f(&mut cart)
    }

    /// Run a cart mutation on the blocking thread pool.
    ///
    /// Mutations write the durable store before returning, so they stay off
    /// the async workers.
    ///
    /// # Errors
    ///
    /// Returns [`AppError::Internal`] if the blocking task panicked.
    pub async fn update_cart<R>(
        &self,
        f: impl FnOnce(&mut SharedCart) -> R + Send + 'static,
    ) -> Result<R, AppError>
    where
        R: Send + 'static,
    {
        let state = self.clone();
        let span = tracing::Span::current();
        tokio::task::spawn_blocking(move || span.in_scope(|| state.with_cart(f)))
            .await
            .map_err(|e| AppError::Internal(e.to_string()))
    }
}
