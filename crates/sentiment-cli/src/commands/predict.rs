//! `sentiment predict` command.

use clap::Args;

use sentiment_config::ServiceConfig;
use sentiment_runtime::{ModelPool, PoolConfig};
use sentiment_types::SentimentInput;

use crate::shared;

/// Score one text with the configured model.
#[derive(Debug, Args)]
pub struct PredictArgs {
    /// Text to score.
    pub text: String,
    /// Model path or URL (overrides `model.source`).
    #[arg(long)]
    pub model: Option<String>,
}

/// Executes the predict command.
pub async fn execute(config: &ServiceConfig, args: &PredictArgs) -> anyhow::Result<()> {
    let model = shared::load_standalone_model(config, args.model.as_deref()).await?;
    let pool = ModelPool::from_model(
        model,
        &PoolConfig {
            size: 1,
            acquire_timeout: None,
        },
    )?;

    let output = pool
        .acquire_and_score(SentimentInput::new(args.text.clone()))
        .await
        .map_err(|e| anyhow::anyhow!("prediction failed: {e}"))?;

    println!("{}", serde_json::to_string_pretty(&output)?);
    Ok(())
}
