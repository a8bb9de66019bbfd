use crate::infra::{load_catalog, AppState};
use axum::http::{header, StatusCode};
use axum::response::IntoResponse;
use axum::Extension;
use axum::Json;
use label_guard::analysis::{analysis_router, AnalysisEngine};
use label_guard::catalog::{CatalogSummary, SnapshotCatalog};
use label_guard::error::AppError;
use serde_json::json;
use std::sync::Arc;
use tracing::{info, warn};

pub(crate) fn with_service_routes(engine: Arc<AnalysisEngine<SnapshotCatalog>>) -> axum::Router {
    analysis_router(engine)
        .route("/health", axum::routing::get(healthcheck))
        .route("/ready", axum::routing::get(readiness_endpoint))
        .route("/metrics", axum::routing::get(metrics_endpoint))
        .route("/api/v1/catalog", axum::routing::get(catalog_endpoint))
        .route(
            "/api/v1/catalog/reload",
            axum::routing::post(catalog_reload_endpoint),
        )
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

pub(crate) async fn catalog_endpoint(Extension(state): Extension<AppState>) -> Json<CatalogSummary> {
    Json(state.catalog.summary())
}

/// Re-reads the configured catalog. A failed read leaves the current snapshot serving.
pub(crate) async fn catalog_reload_endpoint(
    Extension(state): Extension<AppState>,
) -> Result<Json<CatalogSummary>, AppError> {
    let snapshot = load_catalog(&state.catalog_config).map_err(|err| {
        warn!(error = %err, "catalog reload failed; keeping previous snapshot");
        err
    })?;
    state.catalog.replace(snapshot);

    let summary = state.catalog.summary();
    info!(
        additives = summary.additive_count,
        alternatives = summary.alternative_count,
        "catalog reloaded"
    );
    Ok(Json(summary))
}
