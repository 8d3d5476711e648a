//! Data models for the Anthropic Messages API.
//!
//! This module contains the type definitions for request/response bodies
//! exchanged with the upstream API (`anthropic`).

// Author: kelexine (https://github.com/kelexine)

pub mod anthropic;

pub use anthropic::{ContentBlock, ImageSource, Message, MessagesRequest, MessagesResponse, Usage};
