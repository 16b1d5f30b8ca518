//! Shared helpers used across CLI commands.

use std::sync::Arc;

use sentiment_config::ServiceConfig;
use sentiment_model::{load_model, ModelSource, SentimentModel};
use sentiment_types::ColumnMapping;

use crate::output;

/// Loads layered configuration (defaults, file, `SENTIMENT_*` env).
///
/// # Errors
///
/// Returns an error if the file is missing or a value is invalid.
pub fn load_config(path: Option<&str>) -> anyhow::Result<ServiceConfig> {
    sentiment_config::load_config(path).map_err(|e| anyhow::anyhow!("{e}"))
}

/// Chooses the tracing filter: `-v` flags win over the configured level.
pub fn log_filter(verbose: u8, configured: &str) -> String {
    match verbose {
        0 => configured.to_string(),
        1 => "debug".to_string(),
        _ => "trace".to_string(),
    }
}

/// Loads the model named by `source`, or by the config when `None`.
///
/// # Errors
///
/// Returns an error if the artifact cannot be fetched, parsed, or
/// validated; diagnostics are printed first.
pub async fn load_standalone_model(
    config: &ServiceConfig,
    source: Option<&str>,
) -> anyhow::Result<Arc<SentimentModel>> {
    let source = ModelSource::parse(source.unwrap_or(&config.model.source));
    load_model(&source, &config.model.cache_dir, &ColumnMapping::sentiment())
        .await
        .map_err(|e| {
            output::print_diagnostics(&e);
            anyhow::anyhow!("model load failed: {e}")
        })
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn verbosity_overrides_configured_level() {
        assert_eq!(log_filter(0, "warn"), "warn");
        assert_eq!(log_filter(1, "warn"), "debug");
        assert_eq!(log_filter(3, "warn"), "trace");
    }

    #[tokio::test]
    async fn standalone_model_uses_override() {
        let dir = tempfile::tempdir().expect("tmp");
        let mut config = ServiceConfig::default();
        config.model.cache_dir = dir.path().to_path_buf();
        config.model.source = dir.path().join("missing.json").display().to_string();
        let bundled = concat!(env!("CARGO_MANIFEST_DIR"), "/../../models/sentiment_model.json");

        let model = load_standalone_model(&config, Some(bundled))
            .await
            .expect("override wins");
        assert_eq!(model.info().name, "demo-sentiment-lexicon");
        assert!(load_standalone_model(&config, None).await.is_err());
    }
}
