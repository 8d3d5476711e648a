// CLI module for claude-vision
// Author: kelexine (https://github.com/kelexine)

use clap::Parser;
use std::path::PathBuf;

/// claude-vision - Ask a Claude vision model about an image
#[derive(Parser, Debug)]
#[command(name = "claude-vision", version, about, long_about = None)]
pub struct Args {
    /// Image file to attach (PNG, JPEG or WEBP). Omit for a text-only query.
    #[arg(short, long)]
    pub image: Option<PathBuf>,

    /// Question or instruction about the image
    #[arg(short, long)]
    pub query: String,

    /// System message sent alongside the query
    #[arg(short, long, default_value = "You are a helpful vision assistant.")]
    pub system: String,

    /// Model override (otherwise taken from config)
    #[arg(short, long, env = "CLAUDE_VISION_MODEL")]
    pub model: Option<String>,

    /// Explicit config file instead of ~/.claude-vision/config.toml
    #[arg(short, long)]
    pub config: Option<PathBuf>,

    /// Print accumulated token usage as JSON to stderr
    #[arg(long)]
    pub show_usage: bool,
}
