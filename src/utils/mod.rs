//! Utility functions and helpers for claude-vision.
//!
//! # Submodules
//!
//! - `logging`: Tracing initialization and API key scrubbing.
//!
//! Author: kelexine (<https://github.com/kelexine>)

pub mod logging;
