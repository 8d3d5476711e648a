// Error types for claude-vision
// Author: kelexine (https://github.com/kelexine)

use crate::usage::TokenUsage;
use thiserror::Error;

#[derive(Error, Debug)]
pub enum VisionError {
    #[error("Configuration error: {0}")]
    Config(String),

    #[error("Config parsing error: {0}")]
    ConfigParsing(#[from] config::ConfigError),

    #[error("Missing API key: set anthropic.api_key or ANTHROPIC_API_KEY")]
    MissingApiKey,

    #[error("Authentication failed: {0}")]
    Authentication(String),

    #[error("Rate limited: {0}")]
    TooManyRequests(String),

    #[error("Anthropic API overloaded: {0}")]
    Overloaded(String),

    #[error("Service unavailable: {0}")]
    ServiceUnavailable(String),

    #[error("Anthropic API error (HTTP {status}): {message}")]
    AnthropicApi { status: u16, message: String },

    #[error("Malformed response: {0}")]
    MalformedResponse(String),

    /// The call succeeded and was billed, but no text could be taken from it.
    #[error("Response has no text answer: {reason}")]
    MissingText { reason: String, usage: TokenUsage },

    #[error("HTTP error: {0}")]
    Http(#[from] reqwest::Error),

    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
}

impl VisionError {
    /// Map a non-success HTTP status from the Messages API to an error variant.
    pub fn from_status(status: u16, message: String) -> Self {
        match status {
            401 | 403 => VisionError::Authentication(message),
            429 => VisionError::TooManyRequests(message),
            529 => VisionError::Overloaded(message),
            500..=599 => {
                VisionError::ServiceUnavailable(format!("HTTP {}: {}", status, message))
            }
            _ => VisionError::AnthropicApi { status, message },
        }
    }

    /// Short label used for metrics.
    pub fn kind(&self) -> &'static str {
        match self {
            VisionError::Config(_) | VisionError::ConfigParsing(_) => "config",
            VisionError::MissingApiKey | VisionError::Authentication(_) => "authentication",
            VisionError::TooManyRequests(_) => "rate_limited",
            VisionError::Overloaded(_) => "overloaded",
            VisionError::ServiceUnavailable(_) => "unavailable",
            VisionError::AnthropicApi { .. } => "api_error",
            VisionError::MalformedResponse(_)
            | VisionError::MissingText { .. }
            | VisionError::Json(_) => "malformed_response",
            VisionError::Http(_) => "http",
            VisionError::Io(_) => "io",
        }
    }

    /// Usage reported by a successful API call that still ended in this error.
    pub fn billed_usage(&self) -> Option<TokenUsage> {
        match self {
            VisionError::MissingText { usage, .. } => Some(*usage),
            _ => None,
        }
    }
}

pub type Result<T> = std::result::Result<T, VisionError>;
