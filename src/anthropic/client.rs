// Anthropic Messages API client
// Author: kelexine (https://github.com/kelexine)

use super::MessagesApi;
use crate::config::AnthropicConfig;
use crate::error::{Result, VisionError};
use crate::metrics;
use crate::models::anthropic::ErrorResponse;
use crate::models::{MessagesRequest, MessagesResponse};
use crate::utils::logging::sanitize;
use async_trait::async_trait;
use reqwest::Client;
use std::time::{Duration, Instant};
use tracing::{debug, error};

/// Client for the Anthropic Messages API.
///
/// Holds the API key and a pooled HTTP client. Does not retry: every
/// failure is returned to the caller on the first attempt.
pub struct AnthropicClient {
    http_client: Client,
    base_url: String,
    api_key: String,
    api_version: String,
}

impl AnthropicClient {
    /// Create a client from configuration.
    ///
    /// Fails with `MissingApiKey` when neither `anthropic.api_key` nor
    /// `ANTHROPIC_API_KEY` provides a key.
    pub fn new(config: &AnthropicConfig) -> Result<Self> {
        let api_key = config.resolve_api_key().ok_or(VisionError::MissingApiKey)?;

        let http_client = Client::builder()
            .timeout(Duration::from_secs(config.timeout_seconds))
            .connect_timeout(Duration::from_secs(config.connect_timeout_seconds))
            .pool_idle_timeout(Duration::from_secs(90))
            .tcp_nodelay(true)
            .use_rustls_tls()
            .build()?;

        debug!("Created Anthropic HTTP client for {}", config.api_base_url);

        Ok(Self {
            http_client,
            base_url: config.api_base_url.trim_end_matches('/').to_string(),
            api_key,
            api_version: config.api_version.clone(),
        })
    }

    /// Get the API base URL
    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    fn messages_url(&self) -> String {
        format!("{}/v1/messages", self.base_url)
    }

    /// Extract error message from API response JSON
    fn extract_error_message(response_text: &str) -> Option<String> {
        let parsed: ErrorResponse = serde_json::from_str(response_text).ok()?;
        parsed.error.message.or(parsed.error.error_type)
    }
}

impl std::fmt::Debug for AnthropicClient {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("AnthropicClient")
            .field("base_url", &self.base_url)
            .field("api_key", &"[REDACTED]")
            .field("api_version", &self.api_version)
            .finish()
    }
}

#[async_trait]
impl MessagesApi for AnthropicClient {
    async fn create_message(&self, request: &MessagesRequest) -> Result<MessagesResponse> {
        let url = self.messages_url();
        debug!("Calling Messages API for model: {}", request.model);

        let start = Instant::now();
        let response = self
            .http_client
            .post(&url)
            .header("x-api-key", &self.api_key)
            .header("anthropic-version", &self.api_version)
            .header("content-type", "application/json")
            .json(request)
            .send()
            .await?;
        metrics::record_api_call(&request.model, start.elapsed().as_secs_f64());

        let status = response.status();
        let response_text = response.text().await?;

        if !status.is_success() {
            error!(
                "Anthropic API error: HTTP {} - Response body: {}",
                status,
                sanitize(&response_text)
            );
            let message =
                Self::extract_error_message(&response_text).unwrap_or(response_text);
            return Err(VisionError::from_status(status.as_u16(), message));
        }

        let parsed: MessagesResponse = serde_json::from_str(&response_text).map_err(|e| {
            error!("Failed to parse Messages API response: {}", e);
            VisionError::MalformedResponse(format!("Response parsing error: {}", e))
        })?;

        debug!(
            "Received response {} ({} content blocks, stop_reason: {:?})",
            parsed.id,
            parsed.content.len(),
            parsed.stop_reason
        );
        Ok(parsed)
    }
}
