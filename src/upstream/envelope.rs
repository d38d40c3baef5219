//! Wire types for `generateContent`.
//!
//! Decoding is lenient: every field defaults, so any JSON object decodes and
//! only a non-object body (or invalid JSON) fails.

use serde::{Deserialize, Serialize};

/// Candidate finish reasons that indicate a blocked or truncated answer.
const LIMITED_FINISH_REASONS: [&str; 3] = ["SAFETY", "RECITATION", "OTHER"];

/// Request body.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct GenerateContentRequest {
    /// Conversation turns; always a single user turn here.
    pub contents: Vec<Content>,
    /// Sampling settings.
    pub generation_config: GenerationConfig,
}

impl GenerateContentRequest {
    /// Builds a single-prompt request asking for a JSON answer.
    #[must_use]
    pub fn json_prompt(prompt: impl Into<String>, max_output_tokens: u32) -> Self {
        Self {
            contents: vec![Content {
                parts: vec![Part {
                    text: Some(prompt.into()),
                }],
            }],
            generation_config: GenerationConfig {
                temperature: 0.2,
                max_output_tokens,
                response_mime_type: "application/json".to_string(),
            },
        }
    }

    /// The prompt text of the first part, if any.
    #[must_use]
    pub fn prompt(&self) -> Option<&str> {
        self.contents
            .first()
            .and_then(|c| c.parts.first())
            .and_then(|p| p.text.as_deref())
    }
}

/// Sampling settings.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct GenerationConfig {
    /// Sampling temperature.
    pub temperature: f32,
    /// Upper bound on generated tokens.
    pub max_output_tokens: u32,
    /// Requested MIME type of the answer.
    pub response_mime_type: String,
}

/// A list of parts.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Content {
    /// Parts of this content block.
    #[serde(default)]
    pub parts: Vec<Part>,
}

/// A text part.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Part {
    /// Text, absent for non-text parts.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub text: Option<String>,
}

/// Success envelope.
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct GenerateContentResponse {
    /// Generated candidates.
    #[serde(default)]
    pub candidates: Vec<Candidate>,
    /// Prompt-level feedback, present when the prompt was blocked.
    #[serde(default)]
    pub prompt_feedback: Option<PromptFeedback>,
}

/// One generated candidate.
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Candidate {
    /// Generated content.
    #[serde(default)]
    pub content: Option<Content>,
    /// Why generation stopped.
    #[serde(default)]
    pub finish_reason: Option<String>,
}

/// Prompt-level feedback.
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PromptFeedback {
    /// Block reason code.
    #[serde(default)]
    pub block_reason: Option<String>,
    /// Human-readable block reason.
    #[serde(default)]
    pub block_reason_message: Option<String>,
}

impl GenerateContentResponse {
    /// Text of the first part of the first candidate, trimmed. `None` when
    /// there are no candidates or the text is empty.
    #[must_use]
    pub fn extract_text(&self) -> Option<String> {
        let Some(first) = self.candidates.first() else {
            if let Some(reason) = self.prompt_feedback.as_ref().and_then(|f| {
                f.block_reason
                    .as_deref()
                    .or(f.block_reason_message.as_deref())
            }) {
                tracing::warn!(reason, "prompt blocked upstream");
            }
            return None;
        };
        if let Some(reason) = first.finish_reason.as_deref()
            && LIMITED_FINISH_REASONS.contains(&reason)
        {
            tracing::warn!(finish_reason = reason, "response blocked or limited");
        }
        let text = first
            .content
            .as_ref()?
            .parts
            .first()?
            .text
            .as_deref()?
            .trim();
        (!text.is_empty()).then(|| text.to_string())
    }
}

#[cfg(test)]
#[allow(clippy::panic)]
mod tests {
    use super::*;

    fn decode(raw: &str) -> GenerateContentResponse {
        let Ok(resp) = serde_json::from_str(raw) else {
            panic!("envelope should decode: {raw}");
        };
        resp
    }

    #[test]
    fn request_serializes_camel_case() {
        let req = GenerateContentRequest::json_prompt("hello", 512);
        let Ok(value) = serde_json::to_value(&req) else {
            panic!("serializable");
        };
        assert_eq!(value["contents"][0]["parts"][0]["text"], "hello");
        assert_eq!(value["generationConfig"]["maxOutputTokens"], 512);
        assert_eq!(
            value["generationConfig"]["responseMimeType"],
            "application/json"
        );
        assert_eq!(req.prompt(), Some("hello"));
    }

    #[test]
    fn extracts_trimmed_first_part() {
        let resp = decode(
            r#"{"candidates":[{"content":{"parts":[{"text":"  {\"a\":1} \n"},{"text":"ignored"}]},"finishReason":"STOP"}]}"#,
        );
        assert_eq!(resp.extract_text().as_deref(), Some(r#"{"a":1}"#));
    }

    #[test]
    fn no_candidates_is_none() {
        assert!(decode("{}").extract_text().is_none());
        assert!(
            decode(r#"{"candidates":[],"promptFeedback":{"blockReason":"SAFETY"}}"#)
                .extract_text()
                .is_none()
        );
    }

    #[test]
    fn whitespace_text_is_none() {
        let resp = decode(r#"{"candidates":[{"content":{"parts":[{"text":"   "}]}}]}"#);
        assert!(resp.extract_text().is_none());
    }

    #[test]
    fn missing_parts_is_none() {
        let resp = decode(r#"{"candidates":[{"finishReason":"SAFETY"}]}"#);
        assert!(resp.extract_text().is_none());
    }

    #[test]
    fn non_object_body_fails_to_decode() {
        assert!(serde_json::from_str::<GenerateContentResponse>("[1,2]").is_err());
        assert!(serde_json::from_str::<GenerateContentResponse>("<html>").is_err());
    }
}
