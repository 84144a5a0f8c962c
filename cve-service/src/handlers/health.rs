use crate::services::get_metrics;
use crate::startup::AppState;
use axum::{extract::State, http::StatusCode, response::IntoResponse, Json};
use serde_json::json;

/// Liveness probe. Answers 200 even when the store is down so the process
/// is not restarted for an outage it cannot recover from.
pub async fn health_check(State(state): State<AppState>) -> impl IntoResponse {
    let database = if state.query.is_available() {
        "available"
    } else {
        "unavailable"
    };

    Json(json!({
        "status": "ok",
        "service": "cve-service",
        "version": env!("CARGO_PKG_VERSION"),
        "database": database
    }))
}

/// Readiness probe: the store must be connected and answer `ping`.
pub async fn readiness_check(State(state): State<AppState>) -> impl IntoResponse {
    match state.query.ping().await {
        Ok(_) => {
            tracing::debug!("Readiness check passed");
            StatusCode::OK
        }
        Err(e) => {
            tracing::warn!(error = %e, "Readiness check failed");
            StatusCode::SERVICE_UNAVAILABLE
        }
    }
}

/// Metrics endpoint for Prometheus scraping.
pub async fn metrics_handler() -> impl IntoResponse {
    (
        StatusCode::OK,
        [("content-type", "text/plain; charset=utf-8")],
        get_metrics(),
    )
}
