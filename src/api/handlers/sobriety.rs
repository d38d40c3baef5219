//! Sobriety assessment handlers.

use axum::extract::State;
use axum::extract::rejection::JsonRejection;
use axum::response::IntoResponse;
use axum::routing::post;
use axum::{Json, Router};

use crate::api::dto::RecommendationRequest;
use crate::app_state::AppState;
use crate::domain::{SobrietyResult, SobrietyTelemetry};
use crate::error::{ApiError, ErrorResponse};

/// `POST /sobriety/assess`: Score behavioral telemetry.
///
/// Always answers with a usable result; upstream trouble degrades to a
/// BAC-based default.
///
/// # Errors
///
/// Returns [`ApiError::Validation`] for negative or non-finite telemetry.
#[utoipa::path(
    post,
    path = "/sobriety/assess",
    tag = "Sobriety",
    summary = "Assess sobriety from test telemetry",
    description = "Sends jitter, reaction latency, typing metrics and BAC to the generative model and returns its score. Falls back to a deterministic BAC-based result when the model is unavailable.",
    request_body = SobrietyTelemetry,
    responses(
        (status = 200, description = "Assessment", body = SobrietyResult),
        (status = 400, description = "Invalid telemetry", body = ErrorResponse),
    )
)]
pub async fn assess(
    State(state): State<AppState>,
    payload: Result<Json<SobrietyTelemetry>, JsonRejection>,
) -> Result<impl IntoResponse, ApiError> {
    let Json(telemetry) = payload?;
    let result = state.sobriety.assess(&telemetry).await?;
    Ok(Json(result))
}

/// `POST /sobriety/recommend`: BAC-only recommendation.
///
/// # Errors
///
/// Returns [`ApiError::Validation`] for a negative BAC or reaction time.
#[utoipa::path(
    post,
    path = "/sobriety/recommend",
    tag = "Sobriety",
    summary = "Short recommendation from BAC",
    description = "Lightweight variant of the assessment using only BAC and an optional reaction time.",
    request_body = RecommendationRequest,
    responses(
        (status = 200, description = "Recommendation", body = SobrietyResult),
        (status = 400, description = "Invalid input", body = ErrorResponse),
    )
)]
pub async fn recommend(
    State(state): State<AppState>,
    payload: Result<Json<RecommendationRequest>, JsonRejection>,
) -> Result<impl IntoResponse, ApiError> {
    let Json(req) = payload?;
    let result = state
        .sobriety
        .recommend(req.bac, req.reaction_time_ms)
        .await?;
    Ok(Json(result))
}

/// Sobriety routes.
pub fn routes() -> Router<AppState> {
    Router::new()
        .route("/sobriety/assess", post(assess))
        .route("/sobriety/recommend", post(recommend))
}
