//! Segmentation REST API: assignment records, segment statistics and the
//! external model operations.

use axum::extract::{Path, State};
use axum::http::StatusCode;
use axum::Json;
use custlysis_core::reports::SegmentStat;
use custlysis_core::types::{SegmentAssignment, SegmentKey};
use custlysis_core::CustlysisError;
use custlysis_ml_bridge::ModelRequest;
use custlysis_segmentation::{compute_segment_stats, SegmentLookup};

use crate::rest::{store_error, ApiError, AppState};

/// GET /api/segmentation/segments: Per-segment statistics.
#[utoipa::path(
    get,
    path = "/api/segmentation/segments",
    tag = "Segmentation",
    responses((status = 200, description = "Statistics for every segment", body = [SegmentStat]))
)]
pub async fn segment_stats(State(state): State<AppState>) -> Json<Vec<SegmentStat>> {
    let assignments = state.store.segment_assignments.find_all();
    metrics::counter!("segmentation.stats.requests").increment(1);
    Json(compute_segment_stats(&assignments))
}

/// GET /api/segmentation/labels: All segment assignments.
#[utoipa::path(
    get,
    path = "/api/segmentation/labels",
    tag = "Segmentation",
    responses((status = 200, description = "All assignments", body = [SegmentAssignment]))
)]
pub async fn list_assignments(State(state): State<AppState>) -> Json<Vec<SegmentAssignment>> {
    Json(state.store.segment_assignments.find_all())
}

/// GET /api/segmentation/customer/:customer_id: The customer's current
/// assignment, i.e. the first one found.
#[utoipa::path(
    get,
    path = "/api/segmentation/customer/{customer_id}",
    tag = "Segmentation",
    params(("customer_id" = i64, Path, description = "Customer id")),
    responses(
        (status = 200, description = "Current assignment", body = SegmentAssignment),
        (status = 404, description = "Customer has no assignment"),
    )
)]
pub async fn customer_segment(
    State(state): State<AppState>,
    Path(customer_id): Path<i64>,
) -> Result<Json<SegmentAssignment>, StatusCode> {
    let assignments = state.store.segment_assignments.find_all();
    SegmentLookup::build(&assignments)
        .current(customer_id)
        .cloned()
        .map(Json)
        .ok_or(StatusCode::NOT_FOUND)
}

pub async fn get_assignment(
    State(state): State<AppState>,
    Path((customer_id, segment_id)): Path<(i64, String)>,
) -> Result<Json<SegmentAssignment>, StatusCode> {
    state
        .store
        .segment_assignments
        .find_by_id(&SegmentKey {
            customer_id,
            segment_id,
        })
        .map(Json)
        .ok_or(StatusCode::NOT_FOUND)
}

pub async fn create_assignment(
    State(state): State<AppState>,
    Json(assignment): Json<SegmentAssignment>,
) -> Result<(StatusCode, Json<SegmentAssignment>), ApiError> {
    let saved = state
        .store
        .segment_assignments
        .save(assignment)
        .map_err(store_error)?;
    metrics::counter!("store.records.created", "entity" => "segment_assignment").increment(1);
    Ok((StatusCode::CREATED, Json(saved)))
}

pub async fn update_assignment(
    State(state): State<AppState>,
    Path((customer_id, segment_id)): Path<(i64, String)>,
    Json(assignment): Json<SegmentAssignment>,
) -> Result<Json<SegmentAssignment>, ApiError> {
    let key = SegmentKey {
        customer_id,
        segment_id,
    };
    match state
        .store
        .segment_assignments
        .update(&key, assignment)
        .map_err(store_error)?
    {
        Some(saved) => Ok(Json(saved)),
        None => Err(store_error(CustlysisError::NotFound {
            entity: "segment_assignment",
            key: key.to_string(),
        })),
    }
}

pub async fn delete_assignment(
    State(state): State<AppState>,
    Path((customer_id, segment_id)): Path<(i64, String)>,
) -> StatusCode {
    let key = SegmentKey {
        customer_id,
        segment_id,
    };
    if state.store.segment_assignments.delete_by_id(&key) {
        StatusCode::NO_CONTENT
    } else {
        StatusCode::NOT_FOUND
    }
}

// ─── Model operations ──────────────────────────────────────────────────────

/// POST /api/segmentation/train: Retrain the segmentation model.
#[utoipa::path(
    post,
    path = "/api/segmentation/train",
    tag = "Segmentation",
    responses(
        (status = 200, description = "Script output", body = String, content_type = "text/plain"),
        (status = 502, description = "Script exited non-zero; body starts with \"Training failed: \"", body = String, content_type = "text/plain"),
        (status = 500, description = "Script could not be run; body starts with \"Error: \"", body = String, content_type = "text/plain"),
    )
)]
pub async fn train_model(State(state): State<AppState>) -> (StatusCode, String) {
    run_model(&state, ModelRequest::train()).await
}

/// POST /api/segmentation/predict/:customer_id: Predict one customer's segment.
#[utoipa::path(
    post,
    path = "/api/segmentation/predict/{customer_id}",
    tag = "Segmentation",
    params(("customer_id" = i64, Path, description = "Customer id")),
    responses(
        (status = 200, description = "Script output", body = String, content_type = "text/plain"),
        (status = 502, description = "Script exited non-zero", body = String, content_type = "text/plain"),
        (status = 500, description = "Script could not be run", body = String, content_type = "text/plain"),
    )
)]
pub async fn predict_segment(
    State(state): State<AppState>,
    Path(customer_id): Path<i64>,
) -> (StatusCode, String) {
    run_model(&state, ModelRequest::predict(customer_id)).await
}

/// GET /api/segmentation/model-segments: Segment definitions known to the model.
#[utoipa::path(
    get,
    path = "/api/segmentation/model-segments",
    tag = "Segmentation",
    responses(
        (status = 200, description = "Script output", body = String, content_type = "text/plain"),
        (status = 502, description = "Script exited non-zero", body = String, content_type = "text/plain"),
        (status = 500, description = "Script could not be run", body = String, content_type = "text/plain"),
    )
)]
pub async fn model_segments(State(state): State<AppState>) -> (StatusCode, String) {
    run_model(&state, ModelRequest::list_segments()).await
}

async fn run_model(state: &AppState, request: ModelRequest) -> (StatusCode, String) {
    let operation = request.operation;
    let outcome = state.bridge.run(request).await;
    let status = if outcome.succeeded {
        StatusCode::OK
    } else if outcome.exit_code.is_some() {
        StatusCode::BAD_GATEWAY
    } else {
        StatusCode::INTERNAL_SERVER_ERROR
    };
    (status, operation.response_text(&outcome))
}
