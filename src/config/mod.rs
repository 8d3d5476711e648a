// Configuration module
// Author: kelexine (https://github.com/kelexine)

mod models;

pub use models::*;

use crate::error::{Result, VisionError};
use config::{Config, Environment, File};
use std::path::{Path, PathBuf};

impl AppConfig {
    /// Load configuration from multiple sources with precedence:
    /// 1. Environment variables (highest)
    /// 2. Config file at `~/.claude-vision/config.toml`
    /// 3. Defaults (lowest)
    pub fn load() -> Result<Self> {
        Self::build(File::with_name(&Self::default_config_path()).required(false))
    }

    /// Load configuration from an explicit file, which must exist.
    /// Environment variables still override values from the file.
    pub fn load_from(path: &Path) -> Result<Self> {
        Self::build(File::from(path).required(true))
    }

    fn build(file: File<config::FileSourceFile, config::FileFormat>) -> Result<Self> {
        let config = Config::builder()
            // Start with defaults
            .add_source(Config::try_from(&Self::default())?)
            .add_source(file)
            // Override with environment variables, e.g. CLAUDE_VISION_ANTHROPIC__MODEL
            .add_source(
                Environment::with_prefix("CLAUDE_VISION")
                    .prefix_separator("_")
                    .separator("__"),
            )
            .build()
            .map_err(|e| VisionError::Config(e.to_string()))?;

        config
            .try_deserialize()
            .map_err(|e| VisionError::Config(e.to_string()))
    }

    fn default_config_path() -> String {
        dirs::home_dir()
            .unwrap_or_else(|| PathBuf::from("."))
            .join(".claude-vision")
            .join("config.toml")
            .to_string_lossy()
            .to_string()
    }
}
