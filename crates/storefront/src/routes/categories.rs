//! Category route handlers.

use axum::{Json, extract::State};
use boutique_core::CategoriesResponse;
use tracing::instrument;

use crate::state::AppState;

/// List every category.
///
/// GET /api/categories
#[instrument(skip(state))]
pub async fn index(State(state): State<AppState>) -> Json<CategoriesResponse> {
    Json(CategoriesResponse {
        categories: state.catalog().categories.clone(),
    })
}
