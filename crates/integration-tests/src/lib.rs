//! Integration tests for Cartline.
//!
//! # Running Tests
//!
//! ```bash
//! cargo test -p cartline-integration-tests
//! ```
//!
//! Everything runs in-process: a fake catalog is served by a local axum
//! listener and the storefront router is driven with `tower::ServiceExt`.
//!
//! # Test Categories
//!
//! - `cart_persistence` - Cart state surviving restarts on the file store
//! - `catalog_client` - Remote catalog failures, timeouts and caching
//! - `storefront_routes` - HTTP surface of the storefront

use std::net::SocketAddr;
use std::path::Path;
use std::sync::Arc;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::time::Duration;

use axum::{Router, http::StatusCode, routing::get};
use cartline_storefront::config::{CatalogConfig, StorefrontConfig};
use serde_json::{Value, json};
use url::Url;

/// Products served by the fake catalog, shaped like the public fake store API.
#[must_use]
pub fn sample_products() -> Value {
    json!([
        {
            "id": 1,
            "title": "Fjallraven Foldsack No. 1 Backpack",
            "price": 109.95,
            "description": "Your perfect pack for everyday use",
            "category": "men's clothing",
            "image": "https://img.example/1.jpg",
            "rating": { "rate": 3.9, "count": 120 }
        },
        {
            "id": 2,
            "title": "Mens Casual Premium Slim Fit T-Shirts",
            "price": 22.3,
            "description": "Slim-fitting style",
            "category": "men's clothing",
            "image": "https://img.example/2.jpg",
            "rating": { "rate": 4.1, "count": 259 }
        },
        {
            "id": 3,
            "title": "Solid Gold Petite Micropave",
            "price": 168,
            "description": "Satisfaction guaranteed",
            "category": "jewelery",
            "image": "https://img.example/3.jpg",
            "rating": { "rate": 3.9, "count": 70 }
        }
    ])
}

/// A catalog server running on an ephemeral local port.
///
/// Routes:
/// - `/products` - [`sample_products`]
/// - `/broken` - 500 Internal Server Error
/// - `/garbage` - 200 with a body that is not JSON
/// - `/slow` - [`sample_products`] after [`FakeCatalog::SLOW_DELAY`]
pub struct FakeCatalog {
    addr: SocketAddr,
    hits: Arc<AtomicUsize>,
}

impl FakeCatalog {
    /// How long `/slow` waits before answering.
    pub const SLOW_DELAY: Duration = Duration::from_secs(5);

    /// Bind to `127.0.0.1:0` and start serving in the background.
    ///
    /// # Panics
    ///
    /// Panics if the listener cannot be bound.
    pub async fn spawn() -> Self {
        let hits = Arc::new(AtomicUsize::new(0));
        let counter = Arc::clone(&hits);

        let app = Router::new()
            .route("/products", get(|| async { axum::Json(sample_products()) }))
            .route(
                "/broken",
                get(|| async { (StatusCode::INTERNAL_SERVER_ERROR, "upstream exploded") }),
            )
            .route("/garbage", get(|| async { "<html>not json</html>" }))
            .route(
                "/slow",
                get(|| async {
                    tokio::time::sleep(Self::SLOW_DELAY).await;
                    axum::Json(sample_products())
                }),
            )
            .layer(axum::middleware::from_fn(
                move |req: axum::extract::Request, next: axum::middleware::Next| {
                    let counter = Arc::clone(&counter);
                    async move {
                        counter.fetch_add(1, Ordering::SeqCst);
                        next.run(req).await
                    }
                },
            ));

        let listener = tokio::net::TcpListener::bind("127.0.0.1:0")
            .await
            .expect("Failed to bind fake catalog");
        let addr = listener.local_addr().expect("Fake catalog has no address");
        tokio::spawn(async move {
            let _ = axum::serve(listener, app).await;
        });

        Self { addr, hits }
    }

    /// URL of one of the fake catalog's routes.
    ///
    /// # Panics
    ///
    /// Panics if `path` does not form a valid URL.
    #[must_use]
    pub fn url(&self, path: &str) -> Url {
        Url::parse(&format!("http://{}{path}", self.addr)).expect("Invalid fake catalog URL")
    }

    /// Number of requests served so far.
    #[must_use]
    pub fn hits(&self) -> usize {
        self.hits.load(Ordering::SeqCst)
    }
}

/// Catalog settings pointing at `endpoint`.
#[must_use]
pub fn catalog_config(endpoint: Url) -> CatalogConfig {
    CatalogConfig {
        endpoint,
        timeout: Duration::from_secs(2),
        cache_ttl: Duration::from_secs(300),
    }
}

/// Storefront settings with the cart stored under `data_dir`.
#[must_use]
pub fn storefront_config(endpoint: Url, data_dir: &Path) -> StorefrontConfig {
    StorefrontConfig {
        host: [127, 0, 0, 1].into(),
        port: 0,
        data_dir: data_dir.to_path_buf(),
        static_dir: concat!(env!("CARGO_MANIFEST_DIR"), "/../storefront/static").into(),
        catalog: catalog_config(endpoint),
        sentry_dsn: None,
        sentry_environment: None,
    }
}
