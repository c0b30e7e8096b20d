//! Cart route handlers.
//!
//! Cart operations use HTMX for dynamic updates without full page reloads.
//! Every mutation goes through the shared [`CartStore`], which persists before
//! it commits, so the fragment returned here always matches what is on disk.

use std::fmt::Write as _;

use askama::Template;
use askama_web::WebTemplate;
use axum::{
    Form,
    extract::State,
    http::HeaderValue,
    response::{AppendHeaders, IntoResponse, Response},
};
use cartline_core::{
    CartError, CartEvent, CartLineItem, CartStore, Price, PriceError, ProductId, format_amount,
};
use serde::Deserialize;
use tracing::instrument;

use crate::error::{AppError, Result, add_breadcrumb};
use crate::state::{AppState, SharedCart};

/// Cart item display data for templates.
#[derive(Clone)]
pub struct CartItemView {
    pub id: i32,
    pub title: String,
    pub image: String,
    pub quantity: u32,
    pub price: String,
    pub line_price: String,
}

/// Cart display data for templates.
#[derive(Clone)]
pub struct CartView {
    pub items: Vec<CartItemView>,
    pub total: String,
    pub item_count: u64,
}

impl CartView {
    /// Whether there is anything to show.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.items.is_empty()
    }
}

// =============================================================================
// Type Conversions
// =============================================================================

impl From<&CartLineItem> for CartItemView {
    fn from(item: &CartLineItem) -> Self {
        Self {
            id: item.id().as_i32(),
            title: item.title().to_owned(),
            image: item.image().to_owned(),
            quantity: item.quantity().get(),
            price: item.price().to_string(),
            line_price: format_amount(item.line_total()),
        }
    }
}

impl<S> From<&CartStore<S>> for CartView {
    fn from(cart: &CartStore<S>) -> Self {
        Self {
            items: cart.snapshot().iter().map(CartItemView::from).collect(),
            total: format_amount(cart.total()),
            item_count: cart.item_count(),
        }
    }
}

// =============================================================================
// Forms and Templates
// =============================================================================

/// Add to cart form data, as carried by each product card.
#[derive(Debug, Deserialize)]
pub struct AddToCartForm {
    pub id: i32,
    pub title: String,
    pub image: String,
    pub price: String,
}

/// Form data naming one cart line.
#[derive(Debug, Deserialize)]
pub struct LineForm {
    pub id: i32,
}

/// Cart page template.
#[derive(Template, WebTemplate)]
#[template(path = "cart/show.html")]
pub struct CartShowTemplate {
    pub cart: CartView,
}

/// Cart items fragment template (for HTMX).
#[derive(Template, WebTemplate)]
#[template(path = "partials/cart_items.html")]
pub struct CartItemsTemplate {
    pub cart: CartView,
}

/// Cart count badge fragment template (for HTMX).
#[derive(Template, WebTemplate)]
#[template(path = "partials/cart_count.html")]
pub struct CartCountTemplate {
    pub count: u64,
}

/// Build an `HX-Trigger` header value announcing an add.
///
/// Header values must be visible ASCII, so control characters and anything
/// outside ASCII in the title are sent as JSON `\u` escapes.
fn added_trigger(title: &str) -> HeaderValue {
    let payload = serde_json::json!({ "cart-added": { "title": title } }).to_string();
    let mut ascii = String::with_capacity(payload.len());
    for c in payload.chars() {
        if c.is_ascii() && !c.is_ascii_control() {
            ascii.push(c);
        } else {
            let mut units = [0u16; 2];
            for unit in c.encode_utf16(&mut units) {
                let _ = write!(ascii, "\\u{unit:04x}");
            }
        }
    }
    HeaderValue::from_str(&ascii).unwrap_or_else(|_| HeaderValue::from_static("cart-added"))
}

/// Apply a line operation and render the updated cart items.
async fn update_line(
    state: &AppState,
    op: impl FnOnce(&mut SharedCart) -> std::result::Result<CartEvent, CartError> + Send + 'static,
) -> Result<Response> {
    let (event, cart) = state
        .update_cart(move |cart| {
            let event = op(cart)?;
            Ok::<_, CartError>((event, CartView::from(&*cart)))
        })
        .await??;

    tracing::debug!(?event, "Cart updated");
    let fragment = CartItemsTemplate { cart };
    if event.is_change() {
        Ok((AppendHeaders([("HX-Trigger", "cart-updated")]), fragment).into_response())
    } else {
        Ok(fragment.into_response())
    }
}

// =============================================================================
// Handlers
// =============================================================================

/// Display cart page.
#[instrument(skip(state))]
pub async fn show(State(state): State<AppState>) -> impl IntoResponse {
    let cart = state.with_cart(|cart| CartView::from(&*cart));
    CartShowTemplate { cart }
}

/// Add item to cart (HTMX).
///
/// Returns the updated count badge plus an `HX-Trigger` carrying the product
/// title, which the page turns into a confirmation.
#[instrument(skip(state))]
pub async fn add(State(state): State<AppState>, Form(form): Form<AddToCartForm>) -> Result<Response> {
    let price: Price = form
        .price
        .parse()
        .map_err(|e: PriceError| AppError::BadRequest(e.to_string()))?;
    let id = ProductId::new(form.id);

    let AddToCartForm { title, image, .. } = form;
    let (event, count) = state
        .update_cart(move |cart| {
            let event = cart.add(id, title, image, price)?;
            Ok::<_, CartError>((event, cart.item_count()))
        })
        .await??;

    let CartEvent::Added { title, quantity, .. } = event else {
        return Ok(CartCountTemplate { count }.into_response());
    };
    tracing::info!(product_id = %id, %quantity, "Added to cart");
    add_breadcrumb("cart", "Added to cart", Some(&[("product_id", &id.to_string())]));

    Ok((
        AppendHeaders([("HX-Trigger", added_trigger(&title))]),
        CartCountTemplate { count },
    )
        .into_response())
}

/// Increase a line's quantity (HTMX).
#[instrument(skip(state))]
pub async fn increase(State(state): State<AppState>, Form(form): Form<LineForm>) -> Result<Response> {
    let id = ProductId::new(form.id);
    update_line(&state, move |cart| cart.increase(id)).await
}

/// Decrease a line's quantity, removing it at zero (HTMX).
#[instrument(skip(state))]
pub async fn decrease(State(state): State<AppState>, Form(form): Form<LineForm>) -> Result<Response> {
    let id = ProductId::new(form.id);
    update_line(&state, move |cart| cart.decrease(id)).await
}

/// Remove a line (HTMX).
#[instrument(skip(state))]
pub async fn remove(State(state): State<AppState>, Form(form): Form<LineForm>) -> Result<Response> {
    let id = ProductId::new(form.id);
    update_line(&state, move |cart| cart.remove(id)).await
}

/// Empty the cart (HTMX).
#[instrument(skip(state))]
pub async fn clear(State(state): State<AppState>) -> Result<Response> {
    update_line(&state, SharedCart::clear).await
}

/// Get cart count badge (HTMX).
#[instrument(skip(state))]
pub async fn count(State(state): State<AppState>) -> impl IntoResponse {
    CartCountTemplate {
        count: state.with_cart(|cart| cart.item_count()),
    }
}
