//! AI-assisted sobriety assessment with deterministic degradation.
//!
//! Every path returns a usable [`SobrietyResult`]: a missing credential, an
//! exhausted model list, a transport failure or an unreadable answer all
//! collapse to a safe default instead of an error.

use std::sync::Arc;

use serde_json::{Map, Value};

use crate::config::SobrietyConfig;
use crate::domain::sobriety::validate_bac;
use crate::domain::{SobrietyResult, SobrietyTelemetry};
use crate::error::ValidationError;
use crate::upstream::{GenerateContentRequest, GenerateContentResponse, GenerativeClient};

/// Score reported when nothing better is known.
pub const NEUTRAL_SCORE: u8 = 50;
/// Recommendation for `assess` when no credential is configured.
pub const ASSESS_NOT_CONFIGURED: &str = "AI assessment is not configured. Cannot assess sobriety.";
/// Recommendation for `recommend` when no credential is configured.
pub const RECOMMEND_NOT_CONFIGURED: &str =
    "AI assessment is not configured. Stay safe: if you've been drinking, don't drive.";
/// Recommendation when the model's answer is not a JSON object.
pub const UNPARSEABLE_RECOMMENDATION: &str = "Unable to assess. Response could not be parsed.";
/// Recommendation when the model's JSON omits the field.
pub const MISSING_RECOMMENDATION: &str = "Unable to assess.";

const ASSESS_MAX_TOKENS: u32 = 512;
const RECOMMEND_MAX_TOKENS: u32 = 256;

/// Statuses after which the next model is tried: billing/permission, model
/// unavailable, rate limited.
const FALLTHROUGH_STATUSES: [u16; 3] = [403, 404, 429];

const DRIVING_RULE: &str = "CRITICAL: If the user's BAC (blood alcohol content) is greater \
     than 0.08, you MUST recommend that they do not drive, regardless of any other signal.";

/// Fully defaulted intermediate produced by [`decode_assessment`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AssessmentRecord {
    /// Raw score, not yet clamped.
    pub sobriety_score: i64,
    /// Recommendation text.
    pub recommendation: String,
    /// Emergency flag.
    pub is_emergency: bool,
}

impl AssessmentRecord {
    fn unparseable() -> Self {
        Self {
            sobriety_score: i64::from(NEUTRAL_SCORE),
            recommendation: UNPARSEABLE_RECOMMENDATION.to_string(),
            is_emergency: false,
        }
    }

    fn from_object(map: &Map<String, Value>) -> Self {
        Self {
            sobriety_score: map
                .get("sobriety_score")
                .and_then(coerce_score)
                .unwrap_or(i64::from(NEUTRAL_SCORE)),
            recommendation: map
                .get("recommendation")
                .and_then(coerce_text)
                .unwrap_or_else(|| MISSING_RECOMMENDATION.to_string()),
            is_emergency: map
                .get("is_emergency")
                .and_then(coerce_flag)
                .unwrap_or(false),
        }
    }
}

impl From<AssessmentRecord> for SobrietyResult {
    fn from(record: AssessmentRecord) -> Self {
        let score = u8::try_from(record.sobriety_score.clamp(0, 100)).unwrap_or(NEUTRAL_SCORE);
        Self {
            sobriety_score: score,
            recommendation: record.recommendation,
            is_emergency: record.is_emergency,
        }
    }
}

/// Sobriety scorer backed by a generative model.
#[derive(Debug, Clone)]
pub struct SobrietyService {
    client: Arc<dyn GenerativeClient>,
    api_key: Option<String>,
    models: Vec<String>,
}

impl SobrietyService {
    /// Creates a service using `client` for every upstream call.
    #[must_use]
    pub fn new(client: Arc<dyn GenerativeClient>, config: &SobrietyConfig) -> Self {
        Self {
            client,
            api_key: config.api_key.clone().filter(|key| !key.trim().is_empty()),
            models: config.models.clone(),
        }
    }

    /// `true` when a credential is present.
    #[must_use]
    pub const fn is_configured(&self) -> bool {
        self.api_key.is_some()
    }

    /// Scores full telemetry.
    ///
    /// # Errors
    ///
    /// Returns [`ValidationError`] only for invalid telemetry; upstream
    /// trouble never surfaces as an error.
    pub async fn assess(
        &self,
        telemetry: &SobrietyTelemetry,
    ) -> Result<SobrietyResult, ValidationError> {
        telemetry.validate()?;
        let Some(api_key) = self.api_key.as_deref() else {
            return Ok(not_configured(ASSESS_NOT_CONFIGURED));
        };

        let prompt = build_assessment_prompt(telemetry);
        match self.generate(api_key, prompt, ASSESS_MAX_TOKENS).await {
            Some(text) => Ok(decode_assessment(&text).into()),
            None => Ok(bac_fallback(telemetry.bac)),
        }
    }

    /// Lightweight BAC-only recommendation.
    ///
    /// # Errors
    ///
    /// Returns [`ValidationError`] if `bac` or `reaction_time_ms` is
    /// negative or not finite.
    pub async fn recommend(
        &self,
        bac: f64,
        reaction_time_ms: Option<f64>,
    ) -> Result<SobrietyResult, ValidationError> {
        validate_bac(bac)?;
        if let Some(ms) = reaction_time_ms
            && (!ms.is_finite() || ms < 0.0)
        {
            return Err(ValidationError::new(
                "reaction_time_ms",
                "must be zero or greater",
            ));
        }
        let Some(api_key) = self.api_key.as_deref() else {
            return Ok(not_configured(RECOMMEND_NOT_CONFIGURED));
        };

        let prompt = build_recommendation_prompt(bac, reaction_time_ms);
        match self.generate(api_key, prompt, RECOMMEND_MAX_TOKENS).await {
            Some(text) => Ok(decode_assessment(&text).into()),
            None => Ok(bac_fallback(bac)),
        }
    }

    /// Tries each model in order and returns the first non-empty text.
    async fn generate(&self, api_key: &str, prompt: String, max_tokens: u32) -> Option<String> {
        let request = GenerateContentRequest::json_prompt(prompt, max_tokens);
        tracing::debug!(
            models = self.models.len(),
            prompt_len = request.prompt().map_or(0, str::len),
            "requesting assessment"
        );
        let mut last_error: Option<String> = None;

        for model in &self.models {
            let response = match self.client.generate_content(model, api_key, &request).await {
                Ok(response) => response,
                Err(err) => {
                    tracing::error!(model = %model, error = %err, "upstream request failed");
                    return None;
                }
            };

            if FALLTHROUGH_STATUSES.contains(&response.status) {
                tracing::warn!(
                    model = %model,
                    status = response.status,
                    body = %truncate(&response.body, 400),
                    "model unavailable, trying next"
                );
                last_error = Some(format!("{}: {}", response.status, truncate(&response.body, 400)));
                continue;
            }
            if !response.is_success() {
                tracing::error!(
                    model = %model,
                    status = response.status,
                    body = %truncate(&response.body, 400),
                    "upstream returned a non-retryable status"
                );
                return None;
            }

            let envelope: GenerateContentResponse = match serde_json::from_str(&response.body) {
                Ok(envelope) => envelope,
                Err(err) => {
                    tracing::error!(model = %model, error = %err, "upstream envelope did not parse");
                    return None;
                }
            };
            if let Some(text) = envelope.extract_text() {
                tracing::debug!(model = %model, "model answered");
                return Some(text);
            }
            last_error = Some("empty or blocked response".to_string());
        }

        if let Some(last_error) = last_error {
            tracing::warn!(%last_error, "all models failed, using fallback");
        }
        None
    }
}

fn not_configured(recommendation: &str) -> SobrietyResult {
    SobrietyResult {
        sobriety_score: NEUTRAL_SCORE,
        recommendation: recommendation.to_string(),
        is_emergency: false,
    }
}

fn truncate(text: &str, max_chars: usize) -> &str {
    text.char_indices()
        .nth(max_chars)
        .map_or(text, |(idx, _)| text.get(..idx).unwrap_or(text))
}

/// Prompt for a full telemetry assessment.
#[must_use]
pub fn build_assessment_prompt(telemetry: &SobrietyTelemetry) -> String {
    let serialized =
        serde_json::to_string_pretty(telemetry).unwrap_or_else(|_| format!("{telemetry:?}"));
    format!(
        "You are a safety assistant. Based on the following sobriety test telemetry \
         (including BAC), return a JSON object with exactly: sobriety_score (integer 0-100, \
         100 = fully sober), recommendation (short string), is_emergency (boolean). \
         Consider the user's BAC, high jitter, slow reactions (reaction_latencies_ms) and \
         many typos as signs of impairment. Set is_emergency true only if you believe the \
         person may be in immediate danger. {DRIVING_RULE}\n\nTelemetry:\n{serialized}\n\n\
         Respond with only valid JSON, no markdown."
    )
}

/// Prompt for the BAC-only recommendation.
#[must_use]
pub fn build_recommendation_prompt(bac: f64, reaction_time_ms: Option<f64>) -> String {
    let mut prompt = format!(
        "You are a safety assistant. Based ONLY on the following, return a JSON object with \
         exactly: sobriety_score (integer 0-100, 100 = fully sober), recommendation (one short \
         sentence for the user), is_emergency (boolean). BAC above 0.08 is illegal to drive \
         in the US; above 0.15 is high risk. Reaction time over 400ms may suggest impairment. \
         Set is_emergency true only if immediate danger. {DRIVING_RULE}\n\nBAC: {bac:.3}\n"
    );
    if let Some(ms) = reaction_time_ms {
        prompt.push_str(&format!("Reaction time (ms): {ms}\n"));
    }
    prompt.push_str("\nRespond with only valid JSON, no markdown.");
    prompt
}

/// Removes a surrounding markdown code fence (with optional language tag).
#[must_use]
pub fn strip_code_fence(text: &str) -> &str {
    let trimmed = text.trim();
    let Some(rest) = trimmed.strip_prefix("```") else {
        return trimmed;
    };
    let rest = rest.trim_start_matches(|c: char| c.is_ascii_alphanumeric() || c == '_');
    let rest = rest
        .strip_prefix("\r\n")
        .or_else(|| rest.strip_prefix('\n'))
        .unwrap_or(rest);
    let rest = rest.trim_end();
    rest.strip_suffix("```").unwrap_or(rest).trim()
}

/// Tolerant decode of a model answer. Never fails: a non-object answer
/// yields the "could not be parsed" record, and missing fields default.
#[must_use]
pub fn decode_assessment(text: &str) -> AssessmentRecord {
    match serde_json::from_str::<Value>(strip_code_fence(text)) {
        Ok(Value::Object(map)) => AssessmentRecord::from_object(&map),
        _ => AssessmentRecord::unparseable(),
    }
}

#[allow(clippy::cast_possible_truncation)]
fn coerce_score(value: &Value) -> Option<i64> {
    let as_int = |f: f64| f.is_finite().then(|| f.trunc() as i64);
    match value {
        Value::Number(n) => n.as_i64().or_else(|| n.as_f64().and_then(as_int)),
        Value::String(s) => {
            let s = s.trim();
            s.parse::<i64>()
                .ok()
                .or_else(|| s.parse::<f64>().ok().and_then(as_int))
        }
        _ => None,
    }
}

fn coerce_text(value: &Value) -> Option<String> {
    match value {
        Value::Null => None,
        Value::String(s) => Some(s.clone()),
        other => Some(other.to_string()),
    }
}

/// Truthiness of the emergency flag. Unrecognized non-empty values count as
/// raised so an emergency signal is never dropped.
fn coerce_flag(value: &Value) -> Option<bool> {
    match value {
        Value::Null => None,
        Value::Bool(b) => Some(*b),
        Value::Number(n) => Some(n.as_f64().is_some_and(|f| f != 0.0)),
        Value::String(s) => match s.trim().to_ascii_lowercase().as_str() {
            "" | "false" | "0" | "no" => Some(false),
            _ => Some(true),
        },
        Value::Array(items) => Some(!items.is_empty()),
        Value::Object(map) => Some(!map.is_empty()),
    }
}

/// Deterministic BAC-banded result used when the model is unavailable.
/// Never flags an emergency.
#[must_use]
#[allow(clippy::cast_possible_truncation, clippy::cast_sign_loss)]
pub fn bac_fallback(bac: f64) -> SobrietyResult {
    let recommendation = if bac >= 0.15 {
        "High BAC. Do not drive. Consider a ride share or designated driver."
    } else if bac >= 0.08 {
        "BAC at or above legal limit. Do not drive."
    } else if bac > 0.0 {
        "You have consumed alcohol. Allow time before driving or use a ride share."
    } else {
        "You are sober. Stay safe."
    };
    let score = (100.0 - bac * 500.0).round().clamp(0.0, 100.0) as u8;
    SobrietyResult {
        sobriety_score: score,
        recommendation: recommendation.to_string(),
        is_emergency: false,
    }
}
