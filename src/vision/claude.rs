// Claude-backed Vision implementation
// Author: kelexine (https://github.com/kelexine)

use super::models::{detect_media_type, MediaType};
use super::{Vision, VisionReply, DEFAULT_MODEL};
use crate::anthropic::MessagesApi;
use crate::error::{Result, VisionError};
use crate::metrics;
use crate::models::{ContentBlock, Message, MessagesRequest};
use crate::usage::TokenUsage;
use async_trait::async_trait;
use base64::Engine;
use std::sync::Arc;
use tracing::debug;

/// Output cap for every vision query.
pub const MAX_OUTPUT_TOKENS: u32 = 4096;

/// Sampling temperature; zero keeps answers reproducible.
pub const TEMPERATURE: f32 = 0.0;

/// Answers image queries through the Anthropic Messages API.
///
/// The client is injected already authenticated; this type never touches
/// credentials or retries failed calls.
pub struct ClaudeVision {
    client: Arc<dyn MessagesApi>,
    model: String,
}

impl ClaudeVision {
    /// Create an adapter using [`DEFAULT_MODEL`].
    pub fn new(client: Arc<dyn MessagesApi>) -> Self {
        Self::with_model(client, DEFAULT_MODEL)
    }

    pub fn with_model(client: Arc<dyn MessagesApi>, model: impl Into<String>) -> Self {
        Self {
            client,
            model: model.into(),
        }
    }
}

/// Compose the single-turn request for a vision query.
///
/// The user message carries the image block first (when present), then the
/// query text. The system message goes in the top-level `system` field.
pub fn build_request(
    model: &str,
    system_message: &str,
    query: &str,
    image: Option<(&[u8], MediaType)>,
) -> MessagesRequest {
    let mut content = Vec::with_capacity(2);
    if let Some((bytes, media_type)) = image {
        let data = base64::engine::general_purpose::STANDARD.encode(bytes);
        content.push(ContentBlock::base64_image(media_type, data));
    }
    content.push(ContentBlock::text(query));

    MessagesRequest {
        model: model.to_string(),
        messages: vec![Message::user(content)],
        system: Some(system_message.to_string()),
        max_tokens: MAX_OUTPUT_TOKENS,
        temperature: Some(TEMPERATURE),
    }
}

#[async_trait]
impl Vision for ClaudeVision {
    fn model(&self) -> &str {
        &self.model
    }

    async fn query(
        &self,
        system_message: &str,
        query: &str,
        image_bytes: Option<&[u8]>,
    ) -> Result<VisionReply> {
        // Empty bytes count as no image
        let image = image_bytes
            .filter(|bytes| !bytes.is_empty())
            .map(|bytes| (bytes, detect_media_type(bytes)));
        let media_label = image.map(|(_, media_type)| media_type.mime_type());

        debug!(
            model = %self.model,
            media_type = media_label.unwrap_or("none"),
            image_bytes = image.map(|(bytes, _)| bytes.len()).unwrap_or(0),
            "Sending vision query"
        );

        let request = build_request(&self.model, system_message, query, image);
        let response = match self.client.create_message(&request).await {
            Ok(response) => response,
            Err(e) => {
                metrics::record_query(&self.model, media_label, e.kind());
                return Err(e);
            }
        };

        let usage = TokenUsage::from(&response.usage);
        metrics::record_tokens(&self.model, usage.input_tokens, usage.output_tokens);
        debug!(
            model = %self.model,
            input_tokens = usage.input_tokens,
            output_tokens = usage.output_tokens,
            "Vision query completed"
        );

        let reason = match response.content.into_iter().next() {
            Some(ContentBlock::Text { text }) => {
                metrics::record_query(&self.model, media_label, "success");
                return Ok(VisionReply {
                    text,
                    model: self.model.clone(),
                    usage,
                });
            }
            Some(other) => format!("first content block is '{}', expected text", other.kind()),
            None => "response has no content blocks".to_string(),
        };

        metrics::record_query(&self.model, media_label, "malformed_response");
        Err(VisionError::MissingText { reason, usage })
    }
}
