//! System endpoints: service banner and health check.

use axum::http::StatusCode;
use axum::response::IntoResponse;
use axum::routing::get;
use axum::{Json, Router};
use chrono::Utc;
use serde::Serialize;
use utoipa::ToSchema;

use crate::app_state::AppState;

/// Health check response.
#[derive(Debug, Serialize, ToSchema)]
pub struct HealthResponse {
    status: String,
    timestamp: String,
    version: String,
}

/// Root banner response.
#[derive(Debug, Serialize, ToSchema)]
pub struct RootResponse {
    status: &'static str,
    message: &'static str,
    docs: &'static str,
    health: &'static str,
}

/// `GET /`: Service banner.
#[utoipa::path(
    get,
    path = "/",
    tag = "System",
    summary = "Service banner",
    description = "Returns the service name and where to find docs and health.",
    responses(
        (status = 200, description = "Banner", body = RootResponse),
    )
)]
pub async fn root_handler() -> impl IntoResponse {
    Json(RootResponse {
        status: "ok",
        message: "SafeRound API",
        docs: "/swagger-ui",
        health: "/health",
    })
}

/// `GET /health`: Service health status.
#[utoipa::path(
    get,
    path = "/health",
    tag = "System",
    summary = "Health check",
    description = "Returns service health status, version, and current timestamp.",
    responses(
        (status = 200, description = "Service is healthy", body = HealthResponse),
    )
)]
pub async fn health_handler() -> impl IntoResponse {
    (
        StatusCode::OK,
        Json(HealthResponse {
            status: "healthy".to_string(),
            timestamp: Utc::now().to_rfc3339(),
            version: env!("CARGO_PKG_VERSION").to_string(),
        }),
    )
}

/// System routes.
pub fn routes() -> Router<AppState> {
    Router::new()
        .route("/", get(root_handler))
        .route("/health", get(health_handler))
}
