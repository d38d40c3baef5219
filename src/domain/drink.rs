//! Accepted drink events.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::error::ValidationError;

/// One accepted drink. Immutable once stored; never deleted by the core.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct DrinkEvent {
    /// Scanned drink code. Not required to be unique.
    pub drink_id: String,
    /// Owning user.
    pub user_id: String,
    /// Alcohol mass in grams, never negative.
    pub alcohol_grams: f64,
    /// When the drink was scanned (UTC).
    pub timestamp: DateTime<Utc>,
}

impl DrinkEvent {
    /// Validates and builds a drink event.
    ///
    /// # Errors
    ///
    /// Returns [`ValidationError`] if `alcohol_grams` is negative or not
    /// finite. Identifiers are opaque and taken as given.
    pub fn new(
        drink_id: impl Into<String>,
        user_id: impl Into<String>,
        alcohol_grams: f64,
        timestamp: DateTime<Utc>,
    ) -> Result<Self, ValidationError> {
        if !alcohol_grams.is_finite() || alcohol_grams < 0.0 {
            return Err(ValidationError::new(
                "alcohol_grams",
                "must be zero or greater",
            ));
        }
        Ok(Self {
            drink_id: drink_id.into(),
            user_id: user_id.into(),
            alcohol_grams,
            timestamp,
        })
    }
}
