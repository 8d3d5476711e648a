// Anthropic API client module
// Author: kelexine (https://github.com/kelexine)

mod client;

pub use client::AnthropicClient;

use crate::error::Result;
use crate::models::{MessagesRequest, MessagesResponse};
use async_trait::async_trait;

/// The "create message" capability of a Messages API backend.
///
/// Implementations are expected to be pre-authenticated; callers only
/// supply the request body. Failures are returned as-is, without retries.
#[async_trait]
pub trait MessagesApi: Send + Sync {
    async fn create_message(&self, request: &MessagesRequest) -> Result<MessagesResponse>;
}
