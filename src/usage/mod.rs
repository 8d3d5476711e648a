//! Token usage accounting per model.
//!
//! Usage maps are owned by the caller and accumulated into across calls.
//! Entries are only ever created or grown, never removed.
//!
//! `accumulate_token_usage` performs an unsynchronized read-modify-write on
//! a `&mut UsageByModel`; when one map is shared between tasks, wrap it in
//! [`SharedUsage`] instead.
//!
//! Author: kelexine (<https://github.com/kelexine>)

use parking_lot::Mutex;
use serde::{Deserialize, Serialize};
use std::collections::HashMap;
use std::sync::Arc;

/// Token counts for one model, or one call.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct TokenUsage {
    pub input_tokens: u64,
    pub output_tokens: u64,
    pub total_tokens: u64,
}

impl TokenUsage {
    pub fn new(input_tokens: u64, output_tokens: u64) -> Self {
        Self {
            input_tokens,
            output_tokens,
            total_tokens: input_tokens.saturating_add(output_tokens),
        }
    }

    /// Add another usage record; `total_tokens` is recomputed from the parts.
    pub fn add(&mut self, other: TokenUsage) {
        self.input_tokens = self.input_tokens.saturating_add(other.input_tokens);
        self.output_tokens = self.output_tokens.saturating_add(other.output_tokens);
        self.total_tokens = self.input_tokens.saturating_add(self.output_tokens);
    }
}

impl From<&crate::models::Usage> for TokenUsage {
    fn from(usage: &crate::models::Usage) -> Self {
        TokenUsage::new(usage.input_tokens as u64, usage.output_tokens as u64)
    }
}

/// Accumulated usage keyed by model identifier.
pub type UsageByModel = HashMap<String, TokenUsage>;

/// Add `input_tokens`/`output_tokens` to the entry for `model`, creating it if absent.
pub fn accumulate_token_usage(
    usage_by_model: &mut UsageByModel,
    model: &str,
    input_tokens: u64,
    output_tokens: u64,
) {
    usage_by_model
        .entry(model.to_string())
        .or_default()
        .add(TokenUsage::new(input_tokens, output_tokens));
}

/// A usage map that can be shared between concurrent tasks.
#[derive(Debug, Clone, Default)]
pub struct SharedUsage {
    inner: Arc<Mutex<UsageByModel>>,
}

impl SharedUsage {
    pub fn new() -> Self {
        Self::default()
    }

    /// Fold a per-call usage delta into the shared map.
    pub fn record(&self, model: &str, usage: TokenUsage) {
        let mut map = self.inner.lock();
        accumulate_token_usage(&mut map, model, usage.input_tokens, usage.output_tokens);
    }

    pub fn get(&self, model: &str) -> Option<TokenUsage> {
        self.inner.lock().get(model).copied()
    }

    /// Copy of the current totals.
    pub fn snapshot(&self) -> UsageByModel {
        self.inner.lock().clone()
    }
}
