//! Drink validation: the cooldown and cut-off policy gate.

use std::sync::Arc;

use chrono::{DateTime, Duration, Utc};
use serde::{Deserialize, Serialize};
use utoipa::ToSchema;

use crate::domain::DrinkEvent;
use crate::error::ApiError;
use crate::persistence::DrinkStore;

/// Why service was denied outright.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DenialReason {
    /// No user record for the id.
    UserNotFound,
    /// The user's cut-off flag is set.
    CutOff,
}

impl DenialReason {
    /// Message shown to the user.
    #[must_use]
    pub const fn message(self) -> &'static str {
        match self {
            Self::UserNotFound => "User not found.",
            Self::CutOff => "Service denied. You are cut off.",
        }
    }
}

/// Wire code of a [`ValidationOutcome`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum OutcomeCode {
    /// Drink accepted.
    Ok,
    /// Too soon after the previous drink.
    Cooldown,
    /// User unknown or cut off.
    ServiceDenied,
}

/// Closed set of results of a validation attempt. Denials are values, not
/// errors.
#[derive(Debug, Clone, PartialEq)]
pub enum ValidationOutcome {
    /// Accepted; the drink has been stored.
    Allowed,
    /// Rejected; the previous drink is still inside the cooldown window.
    Cooldown {
        /// Timestamp of the previous accepted drink.
        last_drink_at: DateTime<Utc>,
        /// Configured window, for the user-facing message.
        window: Duration,
    },
    /// Rejected regardless of timing.
    ServiceDenied(DenialReason),
}

impl ValidationOutcome {
    /// `true` only for [`ValidationOutcome::Allowed`].
    #[must_use]
    pub const fn is_allowed(&self) -> bool {
        matches!(self, Self::Allowed)
    }

    /// Wire code for this outcome.
    #[must_use]
    pub const fn code(&self) -> OutcomeCode {
        match self {
            Self::Allowed => OutcomeCode::Ok,
            Self::Cooldown { .. } => OutcomeCode::Cooldown,
            Self::ServiceDenied(_) => OutcomeCode::ServiceDenied,
        }
    }

    /// Human-readable message.
    #[must_use]
    pub fn message(&self) -> String {
        match self {
            Self::Allowed => "Drink validated.".to_string(),
            Self::Cooldown { window, .. } => {
                format!("Please wait {} between drinks.", describe_window(*window))
            }
            Self::ServiceDenied(reason) => reason.message().to_string(),
        }
    }

    /// Previous drink time, set only for cooldowns.
    #[must_use]
    pub const fn last_drink_at(&self) -> Option<DateTime<Utc>> {
        match self {
            Self::Cooldown { last_drink_at, .. } => Some(*last_drink_at),
            Self::Allowed | Self::ServiceDenied(_) => None,
        }
    }
}

fn describe_window(window: Duration) -> String {
    let secs = window.num_seconds();
    match (secs % 60, secs / 60) {
        (0, 1) => "1 minute".to_string(),
        (0, mins) if mins > 1 => format!("{mins} minutes"),
        _ => format!("{secs} seconds"),
    }
}

/// Policy gate invoked once per drink scan.
///
/// The lookup of the latest drink and the insert are two separate store
/// calls. Two concurrent scans for one user can both pass the cooldown
/// check; preventing that is up to the store.
#[derive(Debug, Clone)]
pub struct DrinkValidationService {
    store: Arc<dyn DrinkStore>,
    cooldown: Duration,
}

impl DrinkValidationService {
    /// Creates a service over `store` with the given cooldown window.
    ///
    /// Negative windows count as zero; windows beyond what [`Duration`]
    /// can represent saturate at [`Duration::MAX`].
    #[must_use]
    pub fn new(store: Arc<dyn DrinkStore>, cooldown_seconds: i64) -> Self {
        Self {
            store,
            cooldown: Duration::try_seconds(cooldown_seconds.max(0)).unwrap_or(Duration::MAX),
        }
    }

    /// Returns the configured cooldown window.
    #[must_use]
    pub const fn cooldown(&self) -> Duration {
        self.cooldown
    }

    /// Validates a drink scan and records it when allowed.
    ///
    /// The effective timestamp is `scanned_at`, or now. A scan is in
    /// cooldown when `effective - last < cooldown` (strict), which includes
    /// scans timestamped before the latest stored drink.
    ///
    /// # Errors
    ///
    /// Returns [`ApiError::Validation`] for malformed input and
    /// [`ApiError::Store`] if any store call fails; nothing is recorded in
    /// either case.
    pub async fn validate_drink(
        &self,
        user_id: &str,
        drink_id: &str,
        alcohol_grams: f64,
        scanned_at: Option<DateTime<Utc>>,
    ) -> Result<ValidationOutcome, ApiError> {
        let now = scanned_at.unwrap_or_else(Utc::now);
        let candidate = DrinkEvent::new(drink_id, user_id, alcohol_grams, now)?;

        let Some(user) = self.store.find_user(user_id).await? else {
            tracing::debug!(user_id, "drink denied: unknown user");
            return Ok(ValidationOutcome::ServiceDenied(DenialReason::UserNotFound));
        };
        if user.is_cut_off {
            tracing::debug!(user_id, "drink denied: user cut off");
            return Ok(ValidationOutcome::ServiceDenied(DenialReason::CutOff));
        }

        if let Some(last) = self.store.find_most_recent_drink(user_id).await?
            && now - last.timestamp < self.cooldown
        {
            tracing::debug!(user_id, last_drink_at = %last.timestamp, "drink in cooldown");
            return Ok(ValidationOutcome::Cooldown {
                last_drink_at: last.timestamp,
                window: self.cooldown,
            });
        }

        self.store.insert_drink(candidate).await?;
        tracing::info!(user_id, drink_id, alcohol_grams, "drink accepted");
        Ok(ValidationOutcome::Allowed)
    }
}
