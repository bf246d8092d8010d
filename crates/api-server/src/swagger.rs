//! OpenAPI specification and Swagger UI configuration.

use utoipa::OpenApi;

#[derive(OpenApi)]
#[openapi(
    info(
        title = "Custlysis API",
        version = "0.1.0",
        description = "Customer analytics for retail banking.\n\nSegment statistics, explained product recommendations, and segmentation model training.",
        license(name = "MIT"),
    ),
    tags(
        (name = "Segmentation", description = "Segment assignments, statistics and model operations"),
        (name = "Recommendations", description = "Enriched product recommendations"),
        (name = "Operations", description = "Health, readiness, and liveness probes"),
    ),
    paths(
        // Segmentation
        crate::segmentation_rest::segment_stats,
        crate::segmentation_rest::list_assignments,
        crate::segmentation_rest::customer_segment,
        crate::segmentation_rest::train_model,
        crate::segmentation_rest::predict_segment,
        crate::segmentation_rest::model_segments,
        // Recommendations
        crate::recommendation_rest::detailed,
        crate::recommendation_rest::by_customer,
        // Operations
        crate::rest::health_check,
    ),
    components(schemas(
        custlysis_core::types::Customer,
        custlysis_core::types::Product,
        custlysis_core::types::Account,
        custlysis_core::types::Transaction,
        custlysis_core::types::CampaignResponse,
        custlysis_core::types::Interaction,
        custlysis_core::types::RecommendationRecord,
        custlysis_core::types::SegmentAssignment,
        custlysis_core::reports::SegmentStat,
        custlysis_core::reports::EnrichedRecommendation,
        custlysis_core::reports::Priority,
        crate::rest::ErrorResponse,
        crate::rest::HealthResponse,
    ))
)]
pub struct ApiDoc;
