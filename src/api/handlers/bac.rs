//! BAC estimation handler.

use axum::extract::State;
use axum::extract::rejection::JsonRejection;
use axum::response::IntoResponse;
use axum::routing::post;
use axum::{Json, Router};

use crate::api::dto::BacEstimateRequest;
use crate::app_state::AppState;
use crate::domain::{BacQuery, BacResult, estimate};
use crate::error::{ApiError, ErrorResponse};

/// `POST /bac/estimate`: Widmark BAC estimate with risk tier.
///
/// # Errors
///
/// Returns [`ApiError::Validation`] for non-positive weight or negative
/// alcohol / elapsed time.
#[utoipa::path(
    post,
    path = "/bac/estimate",
    tag = "BAC",
    summary = "Estimate blood alcohol concentration",
    description = "Computes BAC with the Widmark formula from weight, sex, alcohol grams and elapsed minutes, and classifies it as green, yellow or red. A red result records a guardian notification.",
    request_body = BacEstimateRequest,
    responses(
        (status = 200, description = "Estimate computed", body = BacResult),
        (status = 400, description = "Invalid input", body = ErrorResponse),
    )
)]
pub async fn estimate_bac(
    State(state): State<AppState>,
    payload: Result<Json<BacEstimateRequest>, JsonRejection>,
) -> Result<impl IntoResponse, ApiError> {
    let Json(req) = payload?;
    let query = BacQuery::try_from(&req)?;
    let result = estimate(&query);
    if result.notify_guardian {
        state.guardian.notify(req.user_id.as_deref(), result.bac);
    }
    Ok(Json(result))
}

/// BAC routes.
pub fn routes() -> Router<AppState> {
    Router::new().route("/bac/estimate", post(estimate_bac))
}
