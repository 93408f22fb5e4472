use crate::infra::AppState;
use axum::http::{header, StatusCode};
use axum::response::IntoResponse;
use axum::Extension;
use axum::Json;
use internship_pipeline::workflows::internship::{
    pipeline_router, CandidateLifecycleService, CandidateRepository, StaffDirectory,
    StaffRepository,
};
use serde_json::json;
use std::sync::Arc;

pub(crate) fn with_pipeline_routes<C, S>(
    candidates: Arc<CandidateLifecycleService<C, S>>,
    staff: Arc<StaffDirectory<S>>,
) -> axum::Router
where
    C: CandidateRepository + 'static,
    S: StaffRepository + 'static,
{
    pipeline_router(candidates, staff)
        .route("/health", axum::routing::get(healthcheck))
        .route("/ready", axum::routing::get(readiness_endpoint))
        .route("/metrics", axum::routing::get(metrics_endpoint))
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
