// claude-vision - Image-to-text queries against the Anthropic Messages API
// Author: kelexine (https://github.com/kelexine)

use anyhow::{Context, Result};
use claude_vision::cli::Args;
use claude_vision::config::AppConfig;
use claude_vision::usage::UsageByModel;
use claude_vision::utils::logging;
use claude_vision::vision::vision_from_config;
use clap::Parser;
use tracing::{error, info};

#[tokio::main]
async fn main() -> Result<()> {
    // Parse CLI arguments
    let args = Args::parse();

    // Phase 1: Load configuration
    let mut config = match &args.config {
        Some(path) => AppConfig::load_from(path)?,
        None => AppConfig::load()?,
    };
    if let Some(model) = &args.model {
        config.anthropic.model = model.clone();
    }

    // Phase 2: Initialize logging
    logging::init(&config.logging)?;
    info!("Starting claude-vision v{}", env!("CARGO_PKG_VERSION"));

    // Phase 3: Read the image, if any
    let image_bytes = match &args.image {
        Some(path) => Some(
            tokio::fs::read(path)
                .await
                .with_context(|| format!("Failed to read image {}", path.display()))?,
        ),
        None => None,
    };

    // Phase 4: Build provider and run the query
    let vision = vision_from_config(&config)?;
    let mut usage_by_model = UsageByModel::new();

    let answer = vision
        .query_image(
            &args.system,
            &args.query,
            image_bytes.as_deref(),
            &mut usage_by_model,
        )
        .await;

    let answer = match answer {
        Ok(text) => text,
        Err(e) => {
            let message = if config.logging.sanitize_tokens {
                logging::sanitize(&e.to_string())
            } else {
                e.to_string()
            };
            error!("Vision query failed: {}", message);
            anyhow::bail!(message);
        }
    };

    println!("{}", answer);

    if args.show_usage {
        eprintln!("{}", serde_json::to_string_pretty(&usage_by_model)?);
    }

    Ok(())
}
