//! Catalog route handlers: the product grid and its live search.

use askama::Template;
use askama_web::WebTemplate;
use axum::{
    extract::{Query, State},
    response::IntoResponse,
};
use cartline_core::{Product, filter_products};
use serde::Deserialize;
use tracing::instrument;

use crate::state::AppState;

/// Product display data for templates.
#[derive(Clone)]
pub struct ProductView {
    pub id: i32,
    pub title: String,
    pub image: String,
    /// Formatted for display, e.g. `$109.95`
    pub price: String,
    /// Exact decimal sent back with the add-to-cart form
    pub price_value: String,
}

impl From<&Product> for ProductView {
    fn from(product: &Product) -> Self {
        Self {
            id: product.id.as_i32(),
            title: product.title.clone(),
            image: product.image.clone(),
            price: product.price.to_string(),
            price_value: product.price.amount().to_string(),
        }
    }
}

/// The rendered product grid: either products or the failure placeholder.
#[derive(Clone, Default)]
pub struct ProductGrid {
    pub products: Vec<ProductView>,
    pub failed: bool,
}

impl ProductGrid {
    /// Render `products` narrowed down to titles matching `query`.
    #[must_use]
    pub fn filtered(products: &[Product], query: &str) -> Self {
        Self {
            products: filter_products(products, query)
                .iter()
                .map(ProductView::from)
                .collect(),
            failed: false,
        }
    }

    /// The placeholder shown when the catalog could not be loaded.
    #[must_use]
    pub fn failed() -> Self {
        Self {
            products: Vec::new(),
            failed: true,
        }
    }
}

/// Search query parameters.
#[derive(Debug, Deserialize)]
pub struct SearchQuery {
    #[serde(default)]
    pub q: String,
}

/// Catalog page template.
#[derive(Template, WebTemplate)]
#[template(path = "catalog/index.html")]
pub struct CatalogIndexTemplate {
    pub grid: ProductGrid,
    pub query: String,
    pub cart_count: u64,
}

/// Product grid fragment template (for HTMX).
#[derive(Template, WebTemplate)]
#[template(path = "partials/product_grid.html")]
pub struct ProductGridTemplate {
    pub grid: ProductGrid,
}

/// Fetch the catalog and build the grid for `query`.
async fn load_grid(state: &AppState, query: &str) -> ProductGrid {
    match state.catalog().products().await {
        Ok(products) => ProductGrid::filtered(&products, query),
        Err(e) => {
            tracing::warn!(error = %e, "Failed to load products");
            ProductGrid::failed()
        }
    }
}

/// Display the catalog page.
#[instrument(skip(state))]
pub async fn index(
    State(state): State<AppState>,
    Query(query): Query<SearchQuery>,
) -> impl IntoResponse {
    let grid = load_grid(&state, &query.q).await;
    let cart_count = state.with_cart(|cart| cart.item_count());

    CatalogIndexTemplate {
        grid,
        query: query.q,
        cart_count,
    }
}

/// Re-render the product grid for a search query (HTMX).
#[instrument(skip(state))]
pub async fn grid(
    State(state): State<AppState>,
    Query(query): Query<SearchQuery>,
) -> impl IntoResponse {
    ProductGridTemplate {
        grid: load_grid(&state, &query.q).await,
    }
}
