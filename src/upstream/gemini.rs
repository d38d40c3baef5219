//! Reqwest-backed `generateContent` adapter.
//!
//! This adapter owns transport details only: URL construction, credential
//! header, timeout, and reading the body. Status interpretation and model
//! fallback live in the sobriety service.

use std::time::Duration;

use async_trait::async_trait;
use reqwest::Client;

use super::{GenerateContentRequest, GenerativeClient, TransportError, UpstreamResponse};

const API_KEY_HEADER: &str = "x-goog-api-key";

/// HTTP client for the generative-language REST API.
///
/// Holds one long-lived [`Client`]; clone it freely, clones share the
/// connection pool.
#[derive(Debug, Clone)]
pub struct GeminiHttpClient {
    client: Client,
    base_url: String,
}

impl GeminiHttpClient {
    /// Builds an adapter whose every request is bounded by `timeout`.
    ///
    /// # Errors
    ///
    /// Returns an error when the reqwest client cannot be constructed.
    pub fn new(base_url: impl Into<String>, timeout: Duration) -> Result<Self, reqwest::Error> {
        let client = Client::builder().timeout(timeout).build()?;
        Ok(Self::with_client(client, base_url))
    }

    /// Wraps an existing, externally owned client.
    #[must_use]
    pub fn with_client(client: Client, base_url: impl Into<String>) -> Self {
        Self {
            client,
            base_url: base_url.into().trim_end_matches('/').to_string(),
        }
    }

    /// Endpoint for `model`.
    #[must_use]
    pub fn endpoint(&self, model: &str) -> String {
        format!("{}/{model}:generateContent", self.base_url)
    }
}

#[async_trait]
impl GenerativeClient for GeminiHttpClient {
    async fn generate_content(
        &self,
        model: &str,
        api_key: &str,
        request: &GenerateContentRequest,
    ) -> Result<UpstreamResponse, TransportError> {
        let response = self
            .client
            .post(self.endpoint(model))
            .header(API_KEY_HEADER, api_key)
            .json(request)
            .send()
            .await?;

        let status = response.status().as_u16();
        let body = response.text().await?;
        Ok(UpstreamResponse { status, body })
    }
}
