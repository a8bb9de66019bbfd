use std::sync::Arc;

use axum::{
    extract::{rejection::JsonRejection, State},
    http::StatusCode,
    response::{IntoResponse, Response},
    routing::post,
    Json, Router,
};
use serde_json::json;
use tracing::warn;

use super::{AnalysisEngine, AnalysisError, AnalysisRequest};
use crate::catalog::AdditiveCatalog;

/// Router exposing the label analysis endpoint.
pub fn analysis_router<C>(engine: Arc<AnalysisEngine<C>>) -> Router
where
    C: AdditiveCatalog + 'static,
{
    Router::new()
        .route("/api/v1/analyze", post(analyze_handler::<C>))
        .with_state(engine)
}

pub(crate) async fn analyze_handler<C>(
    State(engine): State<Arc<AnalysisEngine<C>>>,
    request: Result<Json<AnalysisRequest>, JsonRejection>,
) -> Response
where
    C: AdditiveCatalog + 'static,
{
    let Json(request) = match request {
        Ok(request) => request,
        Err(rejection) => {
            let payload = json!({
                "error": rejection.body_text(),
            });
            return (rejection.status(), Json(payload)).into_response();
        }
    };

    match engine.analyze(request).await {
        Ok(result) => (StatusCode::OK, Json(result)).into_response(),
        Err(AnalysisError::Input(error)) => {
            let payload = json!({
                "error": error.to_string(),
            });
            (StatusCode::BAD_REQUEST, Json(payload)).into_response()
        }
        Err(AnalysisError::Collaborator(error)) => {
            warn!(error = %error, "catalog read failed during analysis");
            let payload = json!({
                "error": error.to_string(),
            });
            (StatusCode::SERVICE_UNAVAILABLE, Json(payload)).into_response()
        }
    }
}
