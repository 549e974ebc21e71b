//! Promotion route handlers.

use axum::{Json, extract::State};
use boutique_core::PromotionsResponse;
use tracing::instrument;

use crate::state::AppState;

/// List every promotional spot.
///
/// GET /api/promotions
#[instrument(skip(state))]
pub async fn index(State(state): State<AppState>) -> Json<PromotionsResponse> {
    Json(PromotionsResponse {
        promotional_spots: state.catalog().promotional_spots.clone(),
    })
}
