//! API server: builds the REST router and starts the HTTP and metrics listeners.

use crate::crud_rest::crud_router;
use crate::recommendation_rest;
use crate::rest::{self, AppState};
use crate::segmentation_rest;
use crate::swagger::ApiDoc;
use axum::routing::{get, post};
use axum::Router;
use custlysis_core::config::AppConfig;
use std::net::SocketAddr;
use tower_http::compression::CompressionLayer;
use tower_http::cors::CorsLayer;
use tower_http::trace::TraceLayer;
use tracing::info;
use utoipa::OpenApi;
use utoipa_swagger_ui::SwaggerUi;

/// Main API server.
pub struct ApiServer {
    config: AppConfig,
    state: AppState,
}

impl ApiServer {
    pub fn new(config: AppConfig, state: AppState) -> Self {
        Self { config, state }
    }

    /// Full application router with middleware.
    pub fn router(&self) -> Router {
        let store = &self.state.store;

        Router::new()
            // Segmentation
            .route("/api/segmentation", post(segmentation_rest::create_assignment))
            .route("/api/segmentation/segments", get(segmentation_rest::segment_stats))
            .route("/api/segmentation/labels", get(segmentation_rest::list_assignments))
            .route(
                "/api/segmentation/customer/:customer_id",
                get(segmentation_rest::customer_segment),
            )
            .route("/api/segmentation/train", post(segmentation_rest::train_model))
            .route(
                "/api/segmentation/predict/:customer_id",
                post(segmentation_rest::predict_segment),
            )
            .route(
                "/api/segmentation/model-segments",
                get(segmentation_rest::model_segments),
            )
            .route(
                "/api/segmentation/:customer_id/:segment_id",
                get(segmentation_rest::get_assignment)
                    .put(segmentation_rest::update_assignment)
                    .delete(segmentation_rest::delete_assignment),
            )
            // Recommendations
            .route(
                "/api/recommendations/detailed",
                get(recommendation_rest::detailed),
            )
            .route(
                "/api/recommendations/customer/:customer_id",
                get(recommendation_rest::by_customer),
            )
            // Operational endpoints
            .route("/health", get(rest::health_check))
            .route("/ready", get(rest::readiness))
            .route("/live", get(rest::liveness))
            .with_state(self.state.clone())
            // Table CRUD
            .merge(crud_router("/api/recommendations", store.recommendations.clone()))
            .merge(crud_router("/api/customers", store.customers.clone()))
            .merge(crud_router("/api/products", store.products.clone()))
            .merge(crud_router("/api/accounts", store.accounts.clone()))
            .merge(crud_router("/api/transactions", store.transactions.clone()))
            .merge(crud_router("/api/campaigns", store.campaign_responses.clone()))
            .merge(crud_router("/api/interactions", store.interactions.clone()))
            .merge(SwaggerUi::new("/swagger-ui").url("/api-docs/openapi.json", ApiDoc::openapi()))
            // Middleware
            .layer(CompressionLayer::new())
            .layer(CorsLayer::permissive())
            .layer(TraceLayer::new_for_http())
    }

    /// Start the HTTP REST server.
    pub async fn start_http(&self) -> anyhow::Result<()> {
        let app = self.router();

        let addr = SocketAddr::new(self.config.api.host.parse()?, self.config.api.http_port);

        info!(addr = %addr, "Starting HTTP server");

        let listener = tokio::net::TcpListener::bind(addr).await?;
        axum::serve(listener, app).await?;

        Ok(())
    }

    /// Start the metrics server on a separate port.
    pub async fn start_metrics(&self) -> anyhow::Result<()> {
        metrics_exporter_prometheus::PrometheusBuilder::new()
            .with_http_listener(SocketAddr::new(
                self.config.api.host.parse()?,
                self.config.metrics.port,
            ))
            .install()?;

        info!(port = self.config.metrics.port, "Metrics exporter started");
        Ok(())
    }
}
