//! Recommendation REST API: enriched report and per-customer listing.

use axum::extract::{Path, State};
use axum::Json;
use custlysis_core::reports::EnrichedRecommendation;
use custlysis_core::types::RecommendationRecord;

use crate::rest::AppState;

/// GET /api/recommendations/detailed: Every recommendation with customer,
/// product, segment, rationale and priority.
#[utoipa::path(
    get,
    path = "/api/recommendations/detailed",
    tag = "Recommendations",
    responses((status = 200, description = "Enriched recommendations", body = [EnrichedRecommendation]))
)]
pub async fn detailed(State(state): State<AppState>) -> Json<Vec<EnrichedRecommendation>> {
    let recommendations = state.store.recommendations.find_all();
    let assignments = state.store.segment_assignments.find_all();
    metrics::counter!("recommendations.detailed.requests").increment(1);
    Json(
        state
            .enricher
            .enrich(&recommendations, &assignments, state.store.as_ref()),
    )
}

/// GET /api/recommendations/customer/:customer_id: Raw recommendations for one customer.
#[utoipa::path(
    get,
    path = "/api/recommendations/customer/{customer_id}",
    tag = "Recommendations",
    params(("customer_id" = i64, Path, description = "Customer id")),
    responses((status = 200, description = "Recommendations", body = [RecommendationRecord]))
)]
pub async fn by_customer(
    State(state): State<AppState>,
    Path(customer_id): Path<i64>,
) -> Json<Vec<RecommendationRecord>> {
    Json(state.store.recommendations_for_customer(customer_id))
}
