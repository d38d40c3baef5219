//! Sobriety DTOs. Telemetry and results use the domain types directly.

use serde::Deserialize;
use utoipa::ToSchema;

/// Request body for `POST /sobriety/recommend`.
#[derive(Debug, Deserialize, ToSchema)]
pub struct RecommendationRequest {
    /// Current BAC (≥ 0).
    pub bac: f64,
    /// Optional single reaction-time measurement in milliseconds (≥ 0).
    #[serde(default)]
    pub reaction_time_ms: Option<f64>,
}
