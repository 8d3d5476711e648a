//! Vision capability: answer a text query about an optional image.
//!
//! [`Vision`] is the provider-neutral interface. [`ClaudeVision`] implements
//! it on top of the Anthropic Messages API; other providers plug in as
//! further implementations, chosen by [`vision_from_config`].
//!
//! # Submodules
//!
//! - `models`: Media types and byte-signature sniffing.
//! - `claude`: The Anthropic-backed adapter and request composition.
//!
//! Author: kelexine (<https://github.com/kelexine>)

pub mod claude;
pub mod models;

pub use claude::{build_request, ClaudeVision, MAX_OUTPUT_TOKENS, TEMPERATURE};
pub use models::{detect_media_type, MediaType};

use crate::anthropic::AnthropicClient;
use crate::config::AppConfig;
use crate::error::{Result, VisionError};
use crate::usage::{accumulate_token_usage, TokenUsage, UsageByModel};
use async_trait::async_trait;
use std::sync::Arc;

/// Model used when none is configured.
pub const DEFAULT_MODEL: &str = "claude-3-haiku-20240307";

/// Result of one vision query, including the usage it consumed.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct VisionReply {
    pub text: String,
    /// Model the usage is attributed to.
    pub model: String,
    pub usage: TokenUsage,
}

#[async_trait]
pub trait Vision: Send + Sync {
    /// Model identifier usage is recorded under.
    fn model(&self) -> &str;

    /// Run one single-turn query and return the text with its usage delta.
    ///
    /// Upstream failures are returned unchanged; nothing is retried.
    async fn query(
        &self,
        system_message: &str,
        query: &str,
        image_bytes: Option<&[u8]>,
    ) -> Result<VisionReply>;

    /// Run one query and fold its usage into `usage_by_model`.
    ///
    /// Usage from a response that was billed but carried no text is still
    /// recorded before the error is returned.
    ///
    /// The map update is a plain read-modify-write; callers sharing one map
    /// across tasks must serialize access (see [`crate::usage::SharedUsage`]).
    async fn query_image(
        &self,
        system_message: &str,
        query: &str,
        image_bytes: Option<&[u8]>,
        usage_by_model: &mut UsageByModel,
    ) -> Result<String> {
        match self.query(system_message, query, image_bytes).await {
            Ok(reply) => {
                accumulate_token_usage(
                    usage_by_model,
                    &reply.model,
                    reply.usage.input_tokens,
                    reply.usage.output_tokens,
                );
                Ok(reply.text)
            }
            Err(e) => {
                if let Some(usage) = e.billed_usage() {
                    accumulate_token_usage(
                        usage_by_model,
                        self.model(),
                        usage.input_tokens,
                        usage.output_tokens,
                    );
                }
                Err(e)
            }
        }
    }
}

/// Build the configured vision provider.
pub fn vision_from_config(config: &AppConfig) -> Result<Arc<dyn Vision>> {
    match config.vision.provider.as_str() {
        "anthropic" => {
            let client = AnthropicClient::new(&config.anthropic)?;
            Ok(Arc::new(ClaudeVision::with_model(
                Arc::new(client),
                config.anthropic.model.clone(),
            )))
        }
        other => Err(VisionError::Config(format!(
            "Unknown vision provider: {}",
            other
        ))),
    }
}
