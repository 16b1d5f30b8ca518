//! `sentiment inspect` command.
//!
//! Loads and validates a model artifact and prints what it contains.

use clap::Args;

use sentiment_config::ServiceConfig;
use sentiment_model::ModelInfo;
use sentiment_types::ColumnType;

use crate::output;
use crate::shared;

/// Validate a model artifact and describe it.
#[derive(Debug, Args)]
pub struct InspectArgs {
    /// Model path or URL (overrides `model.source`).
    #[arg(long)]
    pub model: Option<String>,
    /// Print the description as JSON.
    #[arg(long)]
    pub json: bool,
}

/// Executes the inspect command.
pub async fn execute(config: &ServiceConfig, args: &InspectArgs) -> anyhow::Result<()> {
    let model = shared::load_standalone_model(config, args.model.as_deref()).await?;
    let info = model.info();

    if args.json {
        println!("{}", serde_json::to_string_pretty(&describe(info))?);
        return Ok(());
    }

    output::print_success(&format!("model '{}' is valid", info.name));
    println!();
    println!("Model");
    println!("{}", "─".repeat(40));
    println!("  Name        : {}", info.name);
    if let Some(desc) = &info.description {
        println!("  Description : {desc}");
    }
    println!("  Format      : v{}", info.format_version);
    println!("  SHA-256     : {}", info.sha256);
    println!("  Vocabulary  : {} terms", info.vocabulary_size);
    println!("  N-grams     : up to {}", info.ngram_length);
    println!();
    println!("Schema");
    for (name, ty) in &info.input_columns {
        println!("  in  {name:<16} {ty:?}");
    }
    for (name, ty) in &info.output_columns {
        println!("  out {name:<16} {ty:?}");
    }
    Ok(())
}

fn describe(info: &ModelInfo) -> serde_json::Value {
    fn columns(cols: &[(String, ColumnType)]) -> Vec<serde_json::Value> {
        cols.iter()
            .map(|(name, ty)| serde_json::json!({ "name": name, "type": ty }))
            .collect()
    }
    serde_json::json!({
        "name": info.name,
        "description": info.description,
        "format_version": info.format_version,
        "sha256": info.sha256,
        "vocabulary_size": info.vocabulary_size,
        "ngram_length": info.ngram_length,
        "inputs": columns(&info.input_columns),
        "outputs": columns(&info.output_columns),
    })
}
