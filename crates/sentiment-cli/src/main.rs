//! sentiment CLI - binary sentiment prediction service.

use clap::{Parser, Subcommand};
use tracing_subscriber::fmt::format::FmtSpan;

mod commands;
mod output;
pub(crate) mod shared;

/// Serve and query a pre-trained sentiment model.
#[derive(Debug, Parser)]
#[command(name = "sentiment", version, about)]
struct Cli {
    /// Configuration file path.
    #[arg(short, long, global = true)]
    config: Option<String>,

    /// Verbosity level (-v, -vv). Overrides `logging.level`.
    #[arg(short, long, action = clap::ArgAction::Count, global = true)]
    verbose: u8,

    /// Log output format: plain (default) or json (for log aggregation).
    #[arg(long, global = true, default_value = "plain", value_parser = ["plain", "json"])]
    log_format: String,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Debug, Subcommand)]
enum Commands {
    /// Start the HTTP prediction server.
    Serve(commands::serve::ServeArgs),
    /// Score one text locally and print the prediction.
    Predict(commands::predict::PredictArgs),
    /// Load and validate a model artifact, then describe it.
    Inspect(commands::inspect::InspectArgs),
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();
    let config = shared::load_config(cli.config.as_deref())?;

    let filter = shared::log_filter(cli.verbose, &config.logging.level);
    match cli.log_format.as_str() {
        "json" => tracing_subscriber::fmt()
            .with_env_filter(filter)
            .json()
            .with_target(true)
            .with_span_events(FmtSpan::CLOSE)
            .init(),
        _ => tracing_subscriber::fmt().with_env_filter(filter).init(),
    };

    tracing::debug!(config = ?cli.config, "sentiment starting");

    match &cli.command {
        Commands::Serve(args) => commands::serve::execute(config, args).await,
        Commands::Predict(args) => commands::predict::execute(&config, args).await,
        Commands::Inspect(args) => commands::inspect::execute(&config, args).await,
    }
}
