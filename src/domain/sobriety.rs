//! Sobriety test telemetry and assessment results.

use serde::{Deserialize, Serialize};
use utoipa::ToSchema;

use crate::error::ValidationError;

/// One 3-axis accelerometer sample from the straight-line walk test.
#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize, Deserialize, ToSchema)]
pub struct JitterSample {
    /// X axis.
    #[serde(default)]
    pub x: f64,
    /// Y axis.
    #[serde(default)]
    pub y: f64,
    /// Z axis.
    #[serde(default)]
    pub z: f64,
}

/// Summary of the typing test.
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize, ToSchema)]
pub struct TypingTest {
    /// Number of typos made.
    #[serde(default)]
    pub typo_count: u32,
    /// Typing speed in words per minute.
    #[serde(default)]
    pub speed_wpm: f64,
    /// The text the user actually entered.
    #[serde(default)]
    pub text_entered: String,
}

/// Behavioral telemetry submitted for an assessment. Every field defaults
/// when omitted.
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize, ToSchema)]
pub struct SobrietyTelemetry {
    /// Jitter samples collected over the observation window.
    #[serde(default)]
    pub straight_line_jitter: Vec<JitterSample>,
    /// Reaction latencies in milliseconds (typically 5 taps).
    #[serde(default)]
    pub reaction_latencies_ms: Vec<f64>,
    /// Typing test summary.
    #[serde(default)]
    pub typing_test: TypingTest,
    /// Current BAC.
    #[serde(default)]
    pub bac: f64,
}

impl SobrietyTelemetry {
    /// Checks the boundary constraints on every field.
    ///
    /// # Errors
    ///
    /// Returns [`ValidationError`] naming the first offending field.
    pub fn validate(&self) -> Result<(), ValidationError> {
        validate_bac(self.bac)?;
        let jitter_ok = self
            .straight_line_jitter
            .iter()
            .all(|s| s.x.is_finite() && s.y.is_finite() && s.z.is_finite());
        if !jitter_ok {
            return Err(ValidationError::new(
                "straight_line_jitter",
                "samples must be finite numbers",
            ));
        }
        if self
            .reaction_latencies_ms
            .iter()
            .any(|ms| !ms.is_finite() || *ms < 0.0)
        {
            return Err(ValidationError::new(
                "reaction_latencies_ms",
                "latencies must be zero or greater",
            ));
        }
        if !self.typing_test.speed_wpm.is_finite() || self.typing_test.speed_wpm < 0.0 {
            return Err(ValidationError::new(
                "typing_test.speed_wpm",
                "must be zero or greater",
            ));
        }
        Ok(())
    }
}

/// Checks that a BAC value is finite and non-negative.
///
/// # Errors
///
/// Returns [`ValidationError`] on `bac`.
pub fn validate_bac(bac: f64) -> Result<(), ValidationError> {
    if !bac.is_finite() || bac < 0.0 {
        return Err(ValidationError::new("bac", "must be zero or greater"));
    }
    Ok(())
}

/// Outcome of a sobriety assessment.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, ToSchema)]
pub struct SobrietyResult {
    /// 0–100, where 100 is fully sober.
    pub sobriety_score: u8,
    /// Short human-readable advice.
    pub recommendation: String,
    /// Whether the person may be in immediate danger.
    pub is_emergency: bool,
}
