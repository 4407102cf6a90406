//! Liveness and readiness probes

use axum::extract::State;
use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use axum::Json;
use serde_json::json;

use crate::server::SharedState;

/// GET /health/live — the process is up and serving
pub async fn live() -> Json<serde_json::Value> {
    Json(json!({ "status": "ok" }))
}

/// GET /health/ready — SQL reachable and, when synchronization is
/// enabled, the remote host responds
pub async fn ready(State(state): State<SharedState>) -> Response {
    if let Err(e) = state.store.ping().await {
        tracing::warn!(error = %e, "readiness: database unreachable");
        return unavailable("database");
    }

    if let Some(remote) = &state.remote
        && let Err(e) = remote.ping().await
    {
        tracing::warn!(error = %e, "readiness: remote host unreachable");
        return unavailable("remote");
    }

    Json(json!({ "status": "ready" })).into_response()
}

fn unavailable(dependency: &str) -> Response {
    (
        StatusCode::SERVICE_UNAVAILABLE,
        Json(json!({ "status": "unavailable", "dependency": dependency })),
    )
        .into_response()
}
