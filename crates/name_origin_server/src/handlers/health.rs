//! GET /health - liveness plus a database ping. Public.

use std::sync::Arc;

use axum::{http::StatusCode, Extension, Json};
use name_origin_core::{db, OriginService};
use serde::Serialize;

#[derive(Debug, Serialize)]
pub struct HealthResponse {
    pub status: &'static str,
    pub database: &'static str,
}

pub async fn health(
    Extension(service): Extension<Arc<OriginService>>,
) -> (StatusCode, Json<HealthResponse>) {
    match db::ping(service.repository().pool()).await {
        Ok(()) => (
            StatusCode::OK,
            Json(HealthResponse {
                status: "ok",
                database: "healthy",
            }),
        ),
        Err(e) => {
            tracing::warn!("Database health check failed: {e}");
            (
                StatusCode::SERVICE_UNAVAILABLE,
                Json(HealthResponse {
                    status: "degraded",
                    database: "unhealthy",
                }),
            )
        }
    }
}
