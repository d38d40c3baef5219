//! BAC estimation DTOs.

use serde::Deserialize;
use utoipa::ToSchema;

use crate::domain::{BacQuery, BiologicalSex};
use crate::error::ValidationError;

/// Request body for `POST /bac/estimate`.
#[derive(Debug, Deserialize, ToSchema)]
pub struct BacEstimateRequest {
    /// Caller reference only; not used in the computation.
    #[serde(default)]
    pub user_id: Option<String>,
    /// Body weight in kilograms (> 0).
    pub weight_kg: f64,
    /// Biological sex.
    pub sex: BiologicalSex,
    /// Cumulative alcohol ingested, in grams (≥ 0).
    pub alcohol_grams: f64,
    /// Minutes since drinking started (≥ 0).
    pub time_elapsed_minutes: f64,
}

impl TryFrom<&BacEstimateRequest> for BacQuery {
    type Error = ValidationError;

    fn try_from(req: &BacEstimateRequest) -> Result<Self, Self::Error> {
        Self::new(
            req.weight_kg,
            req.sex,
            req.alcohol_grams,
            req.time_elapsed_minutes,
        )
    }
}
