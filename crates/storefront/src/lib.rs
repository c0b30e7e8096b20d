//! Cartline storefront library.
//!
//! This crate provides the storefront functionality as a library,
//! allowing it to be tested and reused.

#![cfg_attr(not(test), forbid(unsafe_code))]

pub mod catalog;
pub mod config;
pub mod error;
pub mod routes;
pub mod state;
pub mod storage;

use axum::{Router, routing::get};
use tower::ServiceBuilder;
use tower_http::{services::ServeDir, trace::TraceLayer};

use state::AppState;

/// Build the storefront router.
///
/// Sentry layers are added by the binary so tests can drive the router
/// without a Sentry hub.
pub fn app(state: AppState) -> Router {
    let static_dir = ServeDir::new(&state.config().static_dir);

    Router::new()
        .route("/health", get(health))
        .merge(routes::routes())
        .nest_service("/static", static_dir)
        .layer(ServiceBuilder::new().layer(TraceLayer::new_for_http()))
        .with_state(state)
}

/// Liveness health check endpoint.
///
/// Returns "ok" if the server is running. Does not check the catalog.
async fn health() -> &'static str {
    "ok"
}
