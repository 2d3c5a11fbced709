pub mod auth;
pub mod jobs;
pub mod oauth;
pub mod users;

use axum::{extract::State, Json};
use reproot_core::error::AppError;

use crate::AppState;

/// GET /health: liveness plus a store ping.
pub async fn health_check(State(state): State<AppState>) -> Result<Json<serde_json::Value>, AppError> {
    state.store.health_check().await.map_err(|e| {
        tracing::error!(error = %e, "Store health check failed");
        e
    })?;

    Ok(Json(serde_json::json!({
        "status": "healthy",
        "service": state.config.service_name,
        "version": state.config.service_version,
        "checks": {
            "mongodb": "up"
        }
    })))
}
