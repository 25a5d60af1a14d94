// GET handlers: version, api/health

use axum::{extract::State, http::StatusCode, response::IntoResponse};

use super::AppState;
use crate::aggregator;
use crate::error::HealthError;
use crate::version::{NAME, VERSION};

/// GET /version — returns service name and version (from Cargo.toml at build time).
pub(super) async fn version_handler() -> impl IntoResponse {
    axum::Json(serde_json::json!({
        "name": NAME,
        "version": VERSION,
    }))
}

/// GET /api/health — runs one aggregation and returns the six-key metric
/// mapping. 403 when access is denied, 503 when the store is unavailable.
pub(super) async fn api_health_handler(State(state): State<AppState>) -> impl IntoResponse {
    match aggregator::fetch_health_data(state.store.clone()).await {
        Ok(snapshot) => axum::Json(snapshot.metrics).into_response(),
        Err(e) => {
            let status = match e {
                HealthError::AccessDenied { .. } => StatusCode::FORBIDDEN,
                HealthError::Unavailable(_) => StatusCode::SERVICE_UNAVAILABLE,
            };
            tracing::warn!(error = %e, operation = "fetch_health_data", "aggregation run failed");
            (status, axum::Json(serde_json::json!({ "error": e.to_string() }))).into_response()
        }
    }
}
