//! Drink validation handler.

use axum::extract::State;
use axum::extract::rejection::JsonRejection;
use axum::response::IntoResponse;
use axum::routing::post;
use axum::{Json, Router};

use crate::api::dto::{ValidateDrinkRequest, ValidateDrinkResponse};
use crate::app_state::AppState;
use crate::error::{ApiError, ErrorResponse};

/// `POST /validate-drink`: Apply cut-off and cooldown policy to a scan.
///
/// Policy denials are returned with status 200 and `allowed = false`.
///
/// # Errors
///
/// Returns [`ApiError::Validation`] for malformed input and
/// [`ApiError::Store`] when the store fails.
#[utoipa::path(
    post,
    path = "/validate-drink",
    tag = "Drinks",
    summary = "Validate and record a drink",
    description = "Denies unknown or cut-off users, enforces the cooldown since the last accepted drink, and records the drink when allowed.",
    request_body = ValidateDrinkRequest,
    responses(
        (status = 200, description = "Policy outcome", body = ValidateDrinkResponse),
        (status = 400, description = "Invalid input", body = ErrorResponse),
        (status = 500, description = "Store failure", body = ErrorResponse),
    )
)]
pub async fn validate_drink(
    State(state): State<AppState>,
    payload: Result<Json<ValidateDrinkRequest>, JsonRejection>,
) -> Result<impl IntoResponse, ApiError> {
    let Json(req) = payload?;
    let outcome = state
        .drink_validation
        .validate_drink(&req.user_id, &req.drink_id, req.alcohol_grams, req.scanned_at)
        .await?;
    Ok(Json(ValidateDrinkResponse::from(&outcome)))
}

/// Drink routes.
pub fn routes() -> Router<AppState> {
    Router::new().route("/validate-drink", post(validate_drink))
}
