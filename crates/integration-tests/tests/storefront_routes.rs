//! Integration tests for the storefront HTTP surface.
//!
//! The router is driven in-process with `tower::ServiceExt::oneshot`; the
//! catalog is a local fake and the cart lives in a temporary directory.

#![allow(clippy::unwrap_used, clippy::indexing_slicing)]

use axum::{
    Router,
    body::Body,
    http::{Request, StatusCode, header},
};
use cartline_core::{CART_KEY, KeyValueStore, MemoryStore};
use cartline_integration_tests::{FakeCatalog, storefront_config};
use cartline_storefront::{app, state::AppState};
use serde_json::Value;
use tempfile::TempDir;
use tower::ServiceExt;

struct TestApp {
    router: Router,
    catalog: FakeCatalog,
    dir: TempDir,
}

impl TestApp {
    async fn new() -> Self {
        Self::with_catalog_path("/products").await
    }

    async fn with_catalog_path(path: &str) -> Self {
        let catalog = FakeCatalog::spawn().await;
        let dir = TempDir::new().unwrap();
        let config = storefront_config(catalog.url(path), dir.path());
        let router = app(AppState::new(config));
        Self {
            router,
            catalog,
            dir,
        }
    }

    /// A second app on the same data directory, as after a restart.
    fn restarted(&self) -> Router {
        let config = storefront_config(self.catalog.url("/products"), self.dir.path());
        app(AppState::new(config))
    }

    async fn get(&self, uri: &str) -> (StatusCode, Option<String>, String) {
        send(&self.router, Request::get(uri).body(Body::empty()).unwrap()).await
    }

    async fn post(&self, uri: &str, form: &str) -> (StatusCode, Option<String>, String) {
        let request = Request::post(uri)
            .header(header::CONTENT_TYPE, "application/x-www-form-urlencoded")
            .body(Body::from(form.to_string()))
            .unwrap();
        send(&self.router, request).await
    }

    fn persisted(&self) -> Value {
        let raw = std::fs::read(self.dir.path().join("cart.json")).unwrap();
        serde_json::from_slice(&raw).unwrap()
    }
}

/// Send a request and return the status, the `HX-Trigger` header and the body.
async fn send(router: &Router, request: Request<Body>) -> (StatusCode, Option<String>, String) {
    let response = router.clone().oneshot(request).await.unwrap();
    let status = response.status();
    let trigger = response
        .headers()
        .get("HX-Trigger")
        .map(|v| v.to_str().unwrap().to_string());
    let bytes = axum::body::to_bytes(response.into_body(), usize::MAX)
        .await
        .unwrap();
    (status, trigger, String::from_utf8(bytes.to_vec()).unwrap())
}

const BACKPACK: &str = "id=1&title=Backpack&image=https%3A%2F%2Fimg.example%2F1.jpg&price=109.95";
const SHIRT: &str = "id=2&title=T-Shirt&image=https%3A%2F%2Fimg.example%2F2.jpg&price=22.3";

// ============================================================================
// Catalog
// ============================================================================

#[tokio::test]
async fn test_health() {
    let app = TestApp::new().await;
    let (status, _, body) = app.get("/health").await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body, "ok");
}

#[tokio::test]
async fn test_index_lists_products() {
    let app = TestApp::new().await;
    let (status, _, body) = app.get("/").await;
    assert_eq!(status, StatusCode::OK);
    assert!(body.contains("Fjallraven Foldsack No. 1 Backpack"));
    assert!(body.contains("Mens Casual Premium Slim Fit T-Shirts"));
    assert!(body.contains("Solid Gold Petite Micropave"));
    assert!(body.contains("$109.95"));
    assert!(body.contains(r#"name="price" value="109.95""#));
}

#[tokio::test]
async fn test_search_filters_case_insensitively() {
    let app = TestApp::new().await;
    let (status, _, body) = app.get("/products?q=SHIRT").await;
    assert_eq!(status, StatusCode::OK);
    assert!(body.contains("Mens Casual Premium Slim Fit T-Shirts"));
    assert!(!body.contains("Backpack"));
    assert!(!body.contains("Micropave"));
}

#[tokio::test]
async fn test_empty_search_shows_everything() {
    let app = TestApp::new().await;
    let (_, _, body) = app.get("/products?q=").await;
    assert!(body.contains("Backpack"));
    assert!(body.contains("T-Shirts"));
    assert!(body.contains("Micropave"));
}

#[tokio::test]
async fn test_search_without_matches() {
    let app = TestApp::new().await;
    let (_, _, body) = app.get("/products?q=zzz").await;
    assert!(body.contains("No products match your search."));
}

#[tokio::test]
async fn test_catalog_failure_shows_placeholder() {
    let app = TestApp::with_catalog_path("/broken").await;
    let (status, _, body) = app.get("/").await;
    assert_eq!(status, StatusCode::OK);
    assert!(body.contains("Failed to load products."));
}

#[tokio::test]
async fn test_catalog_fetched_once_across_searches() {
    let app = TestApp::new().await;
    app.get("/").await;
    app.get("/products?q=gold").await;
    app.get("/products?q=pack").await;
    assert_eq!(app.catalog.hits(), 1);
}

// ============================================================================
// Cart
// ============================================================================

#[tokio::test]
async fn test_add_returns_badge_and_confirmation() {
    let app = TestApp::new().await;

    let (status, trigger, body) = app.post("/cart/add", BACKPACK).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(
        trigger.as_deref(),
        Some(r#"{"cart-added":{"title":"Backpack"}}"#)
    );
    assert!(body.contains(">1</span>"));

    let (_, _, body) = app.post("/cart/add", BACKPACK).await;
    assert!(body.contains(">2</span>"));

    let persisted = app.persisted();
    assert_eq!(persisted.as_array().unwrap().len(), 1);
    assert_eq!(persisted[0]["quantity"], 2);
    assert_eq!(persisted[0]["price"], "109.95");
}

#[tokio::test]
async fn test_count_reflects_all_units() {
    let app = TestApp::new().await;
    app.post("/cart/add", BACKPACK).await;
    app.post("/cart/add", SHIRT).await;
    app.post("/cart/add", SHIRT).await;

    let (status, _, body) = app.get("/cart/count").await;
    assert_eq!(status, StatusCode::OK);
    assert!(body.contains(">3</span>"));
}

#[tokio::test]
async fn test_cart_page_shows_lines_and_total() {
    let app = TestApp::new().await;
    app.post("/cart/add", BACKPACK).await;
    app.post("/cart/add", SHIRT).await;
    app.post("/cart/add", SHIRT).await;

    let (status, _, body) = app.get("/cart").await;
    assert_eq!(status, StatusCode::OK);
    assert!(body.contains("Backpack"));
    assert!(body.contains("T-Shirt"));
    assert!(body.contains("$44.60"));
    assert!(body.contains("Total: $154.55"));
}

#[tokio::test]
async fn test_sub_cent_prices_round_to_nearest_cent() {
    let app = TestApp::new().await;
    let form = "id=5&title=Sticker&image=img5&price=0.335";
    for _ in 0..3 {
        app.post("/cart/add", form).await;
    }

    let (_, _, body) = app.get("/cart").await;
    assert!(body.contains("$0.34 each"));
    assert!(body.contains("Total: $1.01"));
}

#[tokio::test]
async fn test_empty_cart_page() {
    let app = TestApp::new().await;
    let (status, _, body) = app.get("/cart").await;
    assert_eq!(status, StatusCode::OK);
    assert!(body.contains("Your cart is empty."));
}

#[tokio::test]
async fn test_increase_and_decrease() {
    let app = TestApp::new().await;
    app.post("/cart/add", SHIRT).await;

    let (status, trigger, body) = app.post("/cart/increase", "id=2").await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(trigger.as_deref(), Some("cart-updated"));
    assert!(body.contains("Total: $44.60"));

    let (_, trigger, body) = app.post("/cart/decrease", "id=2").await;
    assert_eq!(trigger.as_deref(), Some("cart-updated"));
    assert!(body.contains("Total: $22.30"));

    let (_, trigger, body) = app.post("/cart/decrease", "id=2").await;
    assert_eq!(trigger.as_deref(), Some("cart-updated"));
    assert!(body.contains("Your cart is empty."));
    assert_eq!(app.persisted(), serde_json::json!([]));
}

#[tokio::test]
async fn test_unknown_line_is_a_no_op() {
    let app = TestApp::new().await;
    app.post("/cart/add", BACKPACK).await;

    for uri in ["/cart/increase", "/cart/decrease", "/cart/remove"] {
        let (status, trigger, body) = app.post(uri, "id=99").await;
        assert_eq!(status, StatusCode::OK, "{uri}");
        assert_eq!(trigger, None, "{uri}");
        assert!(body.contains("Backpack"), "{uri}");
    }
    assert_eq!(app.persisted()[0]["quantity"], 1);
}

#[tokio::test]
async fn test_remove_and_clear() {
    let app = TestApp::new().await;
    app.post("/cart/add", BACKPACK).await;
    app.post("/cart/add", SHIRT).await;

    let (_, trigger, body) = app.post("/cart/remove", "id=1").await;
    assert_eq!(trigger.as_deref(), Some("cart-updated"));
    assert!(!body.contains("Backpack"));
    assert!(body.contains("T-Shirt"));

    let (_, trigger, body) = app.post("/cart/clear", "").await;
    assert_eq!(trigger.as_deref(), Some("cart-updated"));
    assert!(body.contains("Your cart is empty."));
    assert_eq!(app.persisted(), serde_json::json!([]));
}

#[tokio::test]
async fn test_cart_survives_restart() {
    let app = TestApp::new().await;
    app.post("/cart/add", BACKPACK).await;
    app.post("/cart/add", SHIRT).await;

    let restarted = app.restarted();
    let (_, _, body) = send(&restarted, Request::get("/cart").body(Body::empty()).unwrap()).await;
    assert!(body.contains("Backpack"));
    assert!(body.contains("T-Shirt"));
    assert!(body.contains("Total: $132.25"));
}

#[tokio::test]
async fn test_invalid_price_is_bad_request() {
    let app = TestApp::new().await;

    let (status, _, _) = app
        .post("/cart/add", "id=1&title=Backpack&image=img&price=-5")
        .await;
    assert_eq!(status, StatusCode::BAD_REQUEST);

    let (status, _, _) = app
        .post("/cart/add", "id=1&title=Backpack&image=img&price=cheap")
        .await;
    assert_eq!(status, StatusCode::BAD_REQUEST);

    let (_, _, body) = app.get("/cart/count").await;
    assert!(body.contains(">0</span>"));
}

#[tokio::test]
async fn test_failed_write_is_reported_and_changes_nothing() {
    let catalog = FakeCatalog::spawn().await;
    let dir = TempDir::new().unwrap();
    let store = MemoryStore::new();
    let config = storefront_config(catalog.url("/products"), dir.path());
    let router = app(AppState::with_store(config, Box::new(store.clone())));

    let add = |form: &'static str| {
        Request::post("/cart/add")
            .header(header::CONTENT_TYPE, "application/x-www-form-urlencoded")
            .body(Body::from(form))
            .unwrap()
    };

    let (status, _, _) = send(&router, add(BACKPACK)).await;
    assert_eq!(status, StatusCode::OK);

    store.fail_writes(true);
    let (status, trigger, body) = send(&router, add(SHIRT)).await;
    assert_eq!(status, StatusCode::INTERNAL_SERVER_ERROR);
    assert_eq!(trigger, None);
    assert_eq!(body, "Your cart could not be saved, please try again");

    let (_, _, body) = send(&router, Request::get("/cart").body(Body::empty()).unwrap()).await;
    assert!(body.contains("Backpack"));
    assert!(!body.contains("T-Shirt"));

    let persisted: Value = serde_json::from_slice(&store.get(CART_KEY).unwrap().unwrap()).unwrap();
    assert_eq!(persisted.as_array().unwrap().len(), 1);
}
