//! Health check endpoint handlers.
//!
//! Provides simple health checks for monitoring and load balancers.

use axum::{
    Json,
    extract::State,
    http::StatusCode,
    response::{IntoResponse, Response},
};
use codelist_persistence::backends::SearchBackend;
use tracing::{debug, warn};

use crate::state::AppState;

/// Handler for the health check endpoint.
///
/// Asks the search backend for its health.
///
/// # HTTP Request
///
/// `GET [base]/health`
///
/// # Response
///
/// - `200 OK` - Backend is healthy
/// - `503 Service Unavailable` - Backend is unreachable or unhealthy
pub async fn health_handler<B>(State(state): State<AppState<B>>) -> Response
where
    B: SearchBackend + 'static,
{
    debug!("Processing health check request");

    let backend = state.backend();
    let timestamp = chrono::Utc::now().to_rfc3339();

    match backend.health_check().await {
        Ok(()) => {
            let body = serde_json::json!({
                "status": "healthy",
                "backend": backend.name(),
                "timestamp": timestamp
            });
            (StatusCode::OK, Json(body)).into_response()
        }
        Err(e) => {
            warn!(backend = backend.name(), error = %e, "Health check failed");
            let body = serde_json::json!({
                "status": "unhealthy",
                "backend": backend.name(),
                "timestamp": timestamp
            });
            (StatusCode::SERVICE_UNAVAILABLE, Json(body)).into_response()
        }
    }
}

/// Handler for the liveness probe.
///
/// # HTTP Request
///
/// `GET [base]/_liveness`
pub async fn liveness_handler() -> impl IntoResponse {
    StatusCode::OK
}
