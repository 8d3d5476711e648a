//! Anthropic Messages API type definitions.
//!
//! This module defines the request and response structures for the [Anthropic Messages API](https://docs.anthropic.com/en/api/messages).
//! Only the subset needed for single-turn vision queries is modelled.

// Author: kelexine (https://github.com/kelexine)

use crate::vision::MediaType;
use serde::{Deserialize, Serialize};
use serde_json::Value;

/// Anthropic Messages API request structure.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct MessagesRequest {
    /// The model that will complete your prompt.
    pub model: String,

    /// Input messages.
    pub messages: Vec<Message>,

    /// System prompt, sent as a top-level field rather than a message.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub system: Option<String>,

    /// The maximum number of tokens to generate before stopping.
    pub max_tokens: u32,

    /// Amount of randomness injected into the response.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub temperature: Option<f32>,
}

/// A single message in the conversation.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Message {
    /// The role of the message sender ("user" or "assistant").
    pub role: String,
    /// The content blocks of the message.
    pub content: Vec<ContentBlock>,
}

impl Message {
    pub fn user(content: Vec<ContentBlock>) -> Self {
        Self {
            role: "user".to_string(),
            content,
        }
    }
}

/// Content block types
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum ContentBlock {
    /// A text content block.
    Text { text: String },
    /// An image content block.
    Image { source: ImageSource },
    /// Extended thinking block, only seen in responses.
    Thinking {
        thinking: String,
        #[serde(default, skip_serializing_if = "Option::is_none")]
        signature: Option<String>,
    },
    /// A tool use request from the model.
    ToolUse { id: String, name: String, input: Value },
    /// Any block type not modelled above (`redacted_thinking`, `server_tool_use`, ...).
    /// Only ever produced when reading responses.
    #[serde(other, skip_serializing)]
    Unknown,
}

impl ContentBlock {
    pub fn text(text: impl Into<String>) -> Self {
        ContentBlock::Text { text: text.into() }
    }

    pub fn base64_image(media_type: MediaType, data: String) -> Self {
        ContentBlock::Image {
            source: ImageSource::Base64 { media_type, data },
        }
    }

    /// Short name of the block type, as it appears on the wire.
    pub fn kind(&self) -> &'static str {
        match self {
            ContentBlock::Text { .. } => "text",
            ContentBlock::Image { .. } => "image",
            ContentBlock::Thinking { .. } => "thinking",
            ContentBlock::ToolUse { .. } => "tool_use",
            ContentBlock::Unknown => "unknown",
        }
    }
}

/// Image source for vision content
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "lowercase")]
pub enum ImageSource {
    #[serde(rename = "base64")]
    Base64 { media_type: MediaType, data: String },
}

/// Anthropic Messages API response.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct MessagesResponse {
    /// Unique object identifier.
    pub id: String,

    /// Object type (always "message").
    #[serde(rename = "type")]
    pub response_type: String,

    /// Conversational role of the generated message (always "assistant").
    pub role: String,

    /// Content generated by the model.
    pub content: Vec<ContentBlock>,

    /// The model that handled the request.
    pub model: String,

    /// The reason why the model stopped generating.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub stop_reason: Option<String>,

    /// The sequence that caused the model to stop (if applicable).
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub stop_sequence: Option<String>,

    /// Billing and rate-limit usage.
    pub usage: Usage,
}

/// Token usage statistics.
#[derive(Debug, Clone, Serialize, Deserialize, Default)]
pub struct Usage {
    /// The number of input tokens which were used.
    pub input_tokens: u32,

    /// The number of output tokens which were used.
    pub output_tokens: u32,

    /// The number of input tokens used to create the cache.
    #[serde(skip_serializing_if = "is_zero", default)]
    pub cache_creation_input_tokens: u32,

    /// The number of input tokens read from the cache.
    #[serde(skip_serializing_if = "is_zero", default)]
    pub cache_read_input_tokens: u32,
}

/// Helper function to skip serializing zero values
fn is_zero(val: &u32) -> bool {
    *val == 0
}

/// Error envelope returned by the API on non-2xx responses.
#[derive(Debug, Clone, Deserialize)]
pub struct ErrorResponse {
    pub error: ErrorDetail,
}

#[derive(Debug, Clone, Deserialize)]
pub struct ErrorDetail {
    #[serde(rename = "type")]
    pub error_type: Option<String>,
    pub message: Option<String>,
}
