use super::AppState;
use crate::{err_response, ok_response, response::ResponseCode};
use axum::{
    extract::{Query, State},
    response::{IntoResponse, Response},
};
use serde::Deserialize;
use serde_json::json;

#[derive(Debug, Deserialize)]
pub struct HealthQuery {
    #[serde(default)]
    detail: bool,
}

/// Liveness check
#[utoipa::path(
    get,
    path = "/health",
    tag = "health",
    params(("detail" = Option<bool>, Query, description = "Include version and timestamp")),
    responses((status = 200, description = "Service is up"))
)]
pub async fn health_check(Query(params): Query<HealthQuery>) -> Response {
    if params.detail {
        ok_response!(json!({
            "status": "healthy",
            "version": env!("CARGO_PKG_VERSION"),
            "timestamp": chrono::Utc::now().to_rfc3339(),
        }))
        .into_response()
    } else {
        ok_response!(json!({"status": "ok"})).into_response()
    }
}

/// Persistence backend check
#[utoipa::path(
    get,
    path = "/api/health/db",
    tag = "health",
    responses(
        (status = 200, description = "Backend reachable"),
        (status = 503, description = "Backend unreachable")
    )
)]
pub async fn db_health_check(State(state): State<AppState>) -> Response {
    match state.store.health_check().await {
        Ok(true) => ok_response!(json!({
            "database": state.store.backend_name(),
            "status": "healthy",
            "timestamp": chrono::Utc::now().to_rfc3339(),
        }))
        .into_response(),
        Ok(false) => err_response!(
            ResponseCode::SERVICE_UNAVAILABLE,
            "Database connection is unhealthy"
        )
        .into_response(),
        Err(e) => {
            tracing::error!("Database health check failed: {}", e);
            err_response!(ResponseCode::SERVICE_UNAVAILABLE).into_response()
        }
    }
}

/// File storage check
#[utoipa::path(
    get,
    path = "/api/health/storage",
    tag = "health",
    responses(
        (status = 200, description = "Storage reachable"),
        (status = 503, description = "Storage unreachable")
    )
)]
pub async fn storage_health_check(State(state): State<AppState>) -> Response {
    match state.storage.health_check().await {
        Ok(true) => ok_response!(json!({
            "storage": "healthy",
            "timestamp": chrono::Utc::now().to_rfc3339(),
        }))
        .into_response(),
        Ok(false) => {
            err_response!(ResponseCode::SERVICE_UNAVAILABLE, "Storage is unavailable")
                .into_response()
        }
        Err(e) => {
            tracing::error!("Storage health check failed: {}", e);
            err_response!(ResponseCode::SERVICE_UNAVAILABLE).into_response()
        }
    }
}
