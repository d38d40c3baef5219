//! Widmark blood-alcohol estimation and risk tiering.
//!
//! Pure and deterministic: no I/O, no shared state. Inputs are validated
//! when a [`BacQuery`] is constructed, so [`estimate`] is total over every
//! query that exists.

use serde::{Deserialize, Serialize};
use utoipa::ToSchema;

use super::user::BiologicalSex;
use crate::error::ValidationError;

/// Body-water distribution ratio for males.
pub const R_MALE: f64 = 0.68;
/// Body-water distribution ratio for females.
pub const R_FEMALE: f64 = 0.55;
/// Metabolic elimination in BAC percentage points per hour.
pub const ELIMINATION_PER_HOUR: f64 = 0.015;
/// Lower bound (inclusive) of the YELLOW tier.
pub const YELLOW_THRESHOLD: f64 = 0.08;
/// Lower bound (inclusive) of the RED tier.
pub const RED_THRESHOLD: f64 = 0.12;

/// Coarse BAC risk classification.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "lowercase")]
pub enum BacTier {
    /// Below the legal driving limit.
    Green,
    /// At or above 0.08.
    Yellow,
    /// At or above 0.12; triggers guardian notification.
    Red,
}

impl BacTier {
    /// Classifies an already-rounded BAC value.
    #[must_use]
    pub fn classify(bac: f64) -> Self {
        if bac >= RED_THRESHOLD {
            Self::Red
        } else if bac >= YELLOW_THRESHOLD {
            Self::Yellow
        } else {
            Self::Green
        }
    }
}

/// Validated input to [`estimate`].
#[derive(Debug, Clone, PartialEq)]
pub struct BacQuery {
    weight_kg: f64,
    sex: BiologicalSex,
    alcohol_grams: f64,
    elapsed_minutes: f64,
}

impl BacQuery {
    /// Validates and builds a query.
    ///
    /// # Errors
    ///
    /// Returns [`ValidationError`] if `weight_kg` is not strictly positive,
    /// if `alcohol_grams` / `elapsed_minutes` are negative or not finite, or
    /// if the combination overflows the estimate.
    pub fn new(
        weight_kg: f64,
        sex: BiologicalSex,
        alcohol_grams: f64,
        elapsed_minutes: f64,
    ) -> Result<Self, ValidationError> {
        if !weight_kg.is_finite() || weight_kg <= 0.0 {
            return Err(ValidationError::new(
                "weight_kg",
                "must be greater than zero",
            ));
        }
        if !alcohol_grams.is_finite() || alcohol_grams < 0.0 {
            return Err(ValidationError::new(
                "alcohol_grams",
                "must be zero or greater",
            ));
        }
        if !elapsed_minutes.is_finite() || elapsed_minutes < 0.0 {
            return Err(ValidationError::new(
                "time_elapsed_minutes",
                "must be zero or greater",
            ));
        }
        if !peak_bac(weight_kg, sex, alcohol_grams).is_finite() {
            return Err(ValidationError::new(
                "alcohol_grams",
                "out of range for the given weight",
            ));
        }
        Ok(Self {
            weight_kg,
            sex,
            alcohol_grams,
            elapsed_minutes,
        })
    }
}

/// Widmark peak BAC before elimination.
fn peak_bac(weight_kg: f64, sex: BiologicalSex, alcohol_grams: f64) -> f64 {
    let r = match sex {
        BiologicalSex::Male => R_MALE,
        BiologicalSex::Female => R_FEMALE,
    };
    (alcohol_grams / (weight_kg * 1000.0 * r)) * 100.0
}

/// Output of [`estimate`].
#[derive(Debug, Clone, Copy, PartialEq, Serialize, ToSchema)]
pub struct BacResult {
    /// Estimated BAC percentage, rounded to 4 decimals, never negative.
    pub bac: f64,
    /// Risk tier derived from the rounded BAC.
    pub status: BacTier,
    /// `true` iff the tier is [`BacTier::Red`].
    pub notify_guardian: bool,
}

/// Estimates BAC with the Widmark formula and classifies it.
#[must_use]
pub fn estimate(query: &BacQuery) -> BacResult {
    let peak = peak_bac(query.weight_kg, query.sex, query.alcohol_grams);
    let eliminated = ELIMINATION_PER_HOUR * (query.elapsed_minutes / 60.0);
    let bac = round_bac((peak - eliminated).max(0.0));
    let status = BacTier::classify(bac);
    BacResult {
        bac,
        status,
        notify_guardian: status == BacTier::Red,
    }
}

/// Rounds to 4 decimal places, halves away from zero.
#[must_use]
pub fn round_bac(bac: f64) -> f64 {
    (bac * 10_000.0).round() / 10_000.0
}
