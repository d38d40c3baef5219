//! Drink validation DTOs.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use utoipa::ToSchema;

use crate::service::{OutcomeCode, ValidationOutcome};

/// Request body for `POST /validate-drink`.
#[derive(Debug, Deserialize, ToSchema)]
pub struct ValidateDrinkRequest {
    /// User attempting to log a drink.
    pub user_id: String,
    /// Scanned drink code.
    pub drink_id: String,
    /// Alcohol mass in grams (≥ 0).
    pub alcohol_grams: f64,
    /// Scan time (ISO-8601). Defaults to server time.
    #[serde(default)]
    pub scanned_at: Option<DateTime<Utc>>,
}

/// Response body for `POST /validate-drink`.
#[derive(Debug, Serialize, Deserialize, ToSchema)]
pub struct ValidateDrinkResponse {
    /// Whether the drink was accepted and recorded.
    pub allowed: bool,
    /// `OK`, `COOLDOWN` or `SERVICE_DENIED`.
    pub reason: OutcomeCode,
    /// Human-readable explanation.
    pub message: String,
    /// Previous drink time, present for cooldowns.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub last_drink_at: Option<DateTime<Utc>>,
}

impl From<&ValidationOutcome> for ValidateDrinkResponse {
    fn from(outcome: &ValidationOutcome) -> Self {
        Self {
            allowed: outcome.is_allowed(),
            reason: outcome.code(),
            message: outcome.message(),
            last_drink_at: outcome.last_drink_at(),
        }
    }
}

#[cfg(test)]
mod tests {
    use chrono::Duration;

    use super::*;
    use crate::service::DenialReason;

    #[test]
    fn cooldown_serializes_with_last_drink() {
        let last = Utc::now();
        let outcome = ValidationOutcome::Cooldown {
            last_drink_at: last,
            window: Duration::seconds(120),
        };
        let resp = ValidateDrinkResponse::from(&outcome);
        assert!(!resp.allowed);
        assert_eq!(resp.reason, OutcomeCode::Cooldown);
        assert_eq!(resp.last_drink_at, Some(last));
    }

    #[test]
    fn allowed_omits_last_drink() {
        let resp = ValidateDrinkResponse::from(&ValidationOutcome::Allowed);
        let json = serde_json::to_value(&resp).unwrap_or_default();
        assert_eq!(json["allowed"], true);
        assert_eq!(json["reason"], "OK");
        assert!(json.get("last_drink_at").is_none());
    }

    #[test]
    fn denial_uses_service_denied_code() {
        let resp =
            ValidateDrinkResponse::from(&ValidationOutcome::ServiceDenied(DenialReason::CutOff));
        assert_eq!(resp.reason, OutcomeCode::ServiceDenied);
        assert_eq!(resp.message, "Service denied. You are cut off.");
    }
}
