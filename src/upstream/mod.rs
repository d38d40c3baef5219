//! Outbound collaborators: the generative-language API.
//!
//! [`GenerativeClient`] is the seam the sobriety service depends on. One call
//! is exactly one attempt against one model; fallback across models is the
//! caller's job.

pub mod envelope;
pub mod gemini;

use async_trait::async_trait;

pub use envelope::{GenerateContentRequest, GenerateContentResponse, GenerationConfig};
pub use gemini::GeminiHttpClient;

/// Raw upstream reply: status code plus undecoded body.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct UpstreamResponse {
    /// HTTP status code.
    pub status: u16,
    /// Response body as text.
    pub body: String,
}

impl UpstreamResponse {
    /// `true` for 2xx statuses.
    #[must_use]
    pub const fn is_success(&self) -> bool {
        self.status >= 200 && self.status < 300
    }
}

/// Failure below HTTP: connect, TLS, timeout, or body read.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
#[error("upstream transport failure: {0}")]
pub struct TransportError(pub String);

impl From<reqwest::Error> for TransportError {
    fn from(err: reqwest::Error) -> Self {
        if err.is_timeout() {
            Self(format!("request timed out: {err}"))
        } else {
            Self(err.to_string())
        }
    }
}

/// Issues a single `generateContent` call.
#[async_trait]
pub trait GenerativeClient: Send + Sync + std::fmt::Debug {
    /// Posts `request` to `model` using `api_key`.
    ///
    /// Non-2xx statuses are *not* errors here; they come back in
    /// [`UpstreamResponse::status`].
    ///
    /// # Errors
    ///
    /// Returns [`TransportError`] when no HTTP response was obtained.
    async fn generate_content(
        &self,
        model: &str,
        api_key: &str,
        request: &GenerateContentRequest,
    ) -> Result<UpstreamResponse, TransportError>;
}
