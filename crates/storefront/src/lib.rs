//! Boutique storefront library.
//!
//! Serves the static catalog (products, categories and promotional spots)
//! as a read-only JSON API. The router lives here so it can be tested and
//! embedded without the binary.

#![cfg_attr(not(test), forbid(unsafe_code))]

pub mod catalog;
pub mod config;
pub mod error;
pub mod routes;
pub mod search;
pub mod state;

use axum::{Router, http::Method, routing::get};
use tower_http::{cors::CorsLayer, trace::TraceLayer};

use crate::state::AppState;

/// Build the application router with request tracing and, when an origin is
/// configured, CORS for browser clients.
pub fn app(state: AppState) -> Router {
    let cors = state.config().allowed_origin.clone().map(|origin| {
        CorsLayer::new()
            .allow_origin(origin)
            .allow_methods([Method::GET])
    });

    let router = Router::new()
        .route("/health", get(health))
        .merge(routes::routes())
        .with_state(state)
        .layer(TraceLayer::new_for_http());

    match cors {
        Some(cors) => router.layer(cors),
        None => router,
    }
}

/// Liveness health check endpoint.
///
/// Returns "ok" if the server is running.
async fn health() -> &'static str {
    "ok"
}
