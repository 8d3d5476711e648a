// claude-vision - Image-to-text queries against the Anthropic Messages API
// Author: kelexine (https://github.com/kelexine)

pub mod anthropic;
pub mod cli;
pub mod config;
pub mod error;
pub mod metrics;
pub mod models;
pub mod usage;
pub mod utils;
pub mod vision;

pub use anthropic::{AnthropicClient, MessagesApi};
pub use error::{Result, VisionError};
pub use usage::{accumulate_token_usage, SharedUsage, TokenUsage, UsageByModel};
pub use vision::{detect_media_type, ClaudeVision, MediaType, Vision, VisionReply};
