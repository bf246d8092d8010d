//! Shared REST state, error bodies and operational endpoints.

use axum::extract::State;
use axum::http::StatusCode;
use axum::Json;
use custlysis_core::CustlysisError;
use custlysis_ml_bridge::ModelBridge;
use custlysis_personalization::RecommendationEnricher;
use custlysis_store::DataStore;
use serde::Serialize;
use std::sync::Arc;
use std::time::Instant;
use tracing::error;
use utoipa::ToSchema;

/// Shared application state for REST handlers.
#[derive(Clone)]
pub struct AppState {
    pub store: Arc<DataStore>,
    pub bridge: Arc<ModelBridge>,
    pub enricher: Arc<RecommendationEnricher>,
    pub node_id: String,
    pub start_time: Instant,
}

impl AppState {
    pub fn new(store: Arc<DataStore>, bridge: Arc<ModelBridge>, node_id: String) -> Self {
        Self {
            store,
            bridge,
            enricher: Arc::new(RecommendationEnricher::default()),
            node_id,
            start_time: Instant::now(),
        }
    }
}

pub type ApiError = (StatusCode, Json<ErrorResponse>);

pub fn api_error(status: StatusCode, error: &str, message: impl Into<String>) -> ApiError {
    (
        status,
        Json(ErrorResponse {
            error: error.to_string(),
            message: message.into(),
        }),
    )
}

/// Map a store failure to its HTTP rendering.
pub fn store_error(e: CustlysisError) -> ApiError {
    match e {
        CustlysisError::NotFound { .. } => api_error(StatusCode::NOT_FOUND, "not_found", e.to_string()),
        CustlysisError::MissingKey(_) => api_error(StatusCode::BAD_REQUEST, "missing_key", e.to_string()),
        other => {
            error!(error = %other, "Store operation failed");
            api_error(
                StatusCode::INTERNAL_SERVER_ERROR,
                "store_failed",
                "Internal processing error",
            )
        }
    }
}

/// GET /health: Health check endpoint.
#[utoipa::path(
    get,
    path = "/health",
    tag = "Operations",
    responses((status = 200, description = "Service is healthy", body = HealthResponse))
)]
pub async fn health_check(State(state): State<AppState>) -> Json<HealthResponse> {
    Json(HealthResponse {
        status: "healthy".to_string(),
        node_id: state.node_id.clone(),
        uptime_secs: state.start_time.elapsed().as_secs(),
    })
}

/// GET /ready: Readiness probe.
pub async fn readiness() -> StatusCode {
    StatusCode::OK
}

/// GET /live: Liveness probe.
pub async fn liveness() -> StatusCode {
    StatusCode::OK
}

#[derive(Debug, Serialize, ToSchema)]
pub struct ErrorResponse {
    pub error: String,
    pub message: String,
}

#[derive(Debug, Serialize, ToSchema)]
pub struct HealthResponse {
    pub status: String,
    pub node_id: String,
    pub uptime_secs: u64,
}
