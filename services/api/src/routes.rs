use crate::infra::AppState;
use axum::http::{header, StatusCode};
use axum::response::IntoResponse;
use axum::Extension;
use axum::Json;
use climate_sense::advisor::{
    advisor_router, Assessment, ClimateAdvisorService, ClimateRepository, TextGenerator,
};
use climate_sense::error::AppError;
use climate_sense::footprint::{validate_inputs, UserInputs};
use serde::Deserialize;
use serde_json::json;
use std::sync::Arc;

/// Anonymous scoring request; nothing is stored.
#[derive(Debug, Deserialize)]
pub(crate) struct EstimateRequest {
    pub(crate) inputs: UserInputs,
}

pub(crate) fn with_advisor_routes<G, R>(service: Arc<ClimateAdvisorService<G, R>>) -> axum::Router
where
    G: TextGenerator + 'static,
    R: ClimateRepository + 'static,
{
    advisor_router(service)
        .route("/health", axum::routing::get(healthcheck))
        .route("/ready", axum::routing::get(readiness_endpoint))
        .route("/metrics", axum::routing::get(metrics_endpoint))
        .route("/api/v1/estimate", axum::routing::post(estimate_endpoint))
}

pub(crate) async fn healthcheck() -> Json<serde_json::Value> {
    Json(json!({ "status": "ok" }))
}

pub(crate) async fn readiness_endpoint(Extension(state): Extension<AppState>) -> impl IntoResponse {
    let ready = state.readiness.load(std::sync::atomic::Ordering::Relaxed);
    let status = if ready {
        StatusCode::OK
    } else {
        StatusCode::SERVICE_UNAVAILABLE
    };

    let payload = if ready {
        json!({ "status": "ready" })
    } else {
        json!({ "status": "initializing" })
    };

    (status, Json(payload))
}

pub(crate) async fn metrics_endpoint(Extension(state): Extension<AppState>) -> impl IntoResponse {
    (
        StatusCode::OK,
        [(header::CONTENT_TYPE, "text/plain; version=0.0.4")],
        state.metrics.render(),
    )
}

pub(crate) async fn estimate_endpoint(
    Json(payload): Json<EstimateRequest>,
) -> Result<Json<Assessment>, AppError> {
    validate_inputs(&payload.inputs)?;
    Ok(Json(Assessment::from_inputs(&payload.inputs)))
}
