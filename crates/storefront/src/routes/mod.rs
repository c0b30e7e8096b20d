//! HTTP route handlers for the storefront.
//!
//! # Route Structure
//!
//! ```text
//! GET  /                       - Catalog page (search box, product grid, cart badge)
//! GET  /products?q=            - Product grid fragment (HTMX live search)
//!
//! # Cart (HTMX fragments)
//! GET  /cart                   - Cart page
//! POST /cart/add               - Add to cart (returns badge, triggers cart-added)
//! POST /cart/increase          - One more unit (returns cart_items fragment)
//! POST /cart/decrease          - One less unit, removing at zero
//! POST /cart/remove            - Remove line
//! POST /cart/clear             - Remove every line
//! GET  /cart/count             - Cart count badge (fragment)
//! ```

pub mod cart;
pub mod catalog;

use axum::{
    Router,
    routing::{get, post},
};

use crate::state::AppState;

/// Create the cart routes router.
pub fn cart_routes() -> Router<AppState> {
    Router::new()
        .route("/", get(cart::show))
        .route("/add", post(cart::add))
        .route("/increase", post(cart::increase))
        .route("/decrease", post(cart::decrease))
        .route("/remove", post(cart::remove))
        .route("/clear", post(cart::clear))
        .route("/count", get(cart::count))
}

/// Create all routes for the storefront.
pub fn routes() -> Router<AppState> {
    Router::new()
        // Catalog
        .route("/", get(catalog::index))
        .route("/products", get(catalog::grid))
        // Cart routes
        .nest("/cart", cart_routes())
}
