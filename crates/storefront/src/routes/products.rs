//! Product route handlers.

use axum::{
    Json,
    extract::{Query, State},
    response::{IntoResponse, Response},
};
use boutique_core::ProductsResponse;
use serde::Deserialize;
use tracing::instrument;

use crate::error::{AppError, Result};
use crate::search;
use crate::state::AppState;

/// Longest accepted search term, in characters.
const MAX_SEARCH_TERM_CHARS: usize = 200;

/// Product listing query parameters.
#[derive(Debug, Deserialize)]
pub struct ProductsQuery {
    /// Search term. Blank means a plain listing.
    pub q: Option<String>,
}

/// List products, or search them when `q` is given.
///
/// GET /api/products
/// GET /api/products?q=<term>
///
/// # Errors
///
/// Returns `AppError::BadRequest` if the search term is too long.
#[instrument(skip(state))]
pub async fn index(
    State(state): State<AppState>,
    Query(query): Query<ProductsQuery>,
) -> Result<Response> {
    let products = &state.catalog().products;

    let Some(term) = query.q.as_deref().map(str::trim).filter(|q| !q.is_empty()) else {
        return Ok(Json(ProductsResponse {
            products: products.clone(),
        })
        .into_response());
    };

    if term.chars().count() > MAX_SEARCH_TERM_CHARS {
        return Err(AppError::BadRequest(format!(
            "search term exceeds {MAX_SEARCH_TERM_CHARS} characters"
        )));
    }

    Ok(Json(ProductsResponse {
        products: search::search(products, term),
    })
    .into_response())
}
