//! `sentiment serve` command.
//!
//! Loads the model pool and serves `POST /predict` over HTTP until
//! Ctrl-C, then closes the pool and drains in-flight predictions.

use std::sync::Arc;

use clap::Args;

use sentiment_config::ServiceConfig;
use sentiment_runtime::ModelPool;
use sentiment_transport_http::HttpServer;

use crate::output;

/// Start the HTTP prediction server.
#[derive(Debug, Args)]
pub struct ServeArgs {
    /// Interface to bind (overrides `server.host`).
    #[arg(long)]
    pub host: Option<String>,
    /// TCP port (overrides `server.port`).
    #[arg(long)]
    pub port: Option<u16>,
    /// Model path or URL (overrides `model.source`).
    #[arg(long)]
    pub model: Option<String>,
    /// Number of scoring handles (overrides `pool.size`).
    #[arg(long)]
    pub pool_size: Option<usize>,
}

impl ServeArgs {
    /// Applies command-line overrides on top of the loaded config.
    pub fn apply(&self, config: &mut ServiceConfig) {
        if let Some(host) = &self.host {
            config.server.host = host.clone();
        }
        if let Some(port) = self.port {
            config.server.port = port;
        }
        if let Some(model) = &self.model {
            config.model.source = model.clone();
        }
        if let Some(size) = self.pool_size {
            config.pool.size = size;
        }
    }
}

/// Executes the serve command.
pub async fn execute(mut config: ServiceConfig, args: &ServeArgs) -> anyhow::Result<()> {
    args.apply(&mut config);
    config.validate().map_err(|e| anyhow::anyhow!("{e}"))?;

    let pool = Arc::new(load_pool(&config).await?);
    let server = HttpServer::new(pool.clone(), &config.server.host, config.server.port);

    let shutdown = async {
        if let Err(e) = tokio::signal::ctrl_c().await {
            tracing::warn!(error = %e, "cannot listen for shutdown signal");
            std::future::pending::<()>().await;
        }
        tracing::info!("shutdown signal received");
    };
    server
        .run_until(shutdown)
        .await
        .map_err(|e| anyhow::anyhow!("server error: {e}"))?;

    pool.close();
    pool.drain().await;
    tracing::info!("in-flight predictions drained");
    Ok(())
}

/// Loads the pool, or starts unavailable when `model.require_loaded` is off.
async fn load_pool(config: &ServiceConfig) -> anyhow::Result<ModelPool> {
    match ModelPool::load(&config.model_pool()).await {
        Ok(pool) => Ok(pool),
        Err(e) if !config.model.require_loaded => {
            tracing::warn!(
                source = %config.model.source,
                error = %e,
                "model failed to load; serving with predictions unavailable"
            );
            Ok(ModelPool::unavailable(e.to_string()))
        }
        Err(e) => {
            output::print_error(&format!("cannot load model from {}", config.model.source));
            output::print_diagnostics(&e);
            Err(anyhow::anyhow!("model load failed: {e}"))
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use sentiment_runtime::Predictor;

    fn no_overrides() -> ServeArgs {
        ServeArgs {
            host: None,
            port: None,
            model: None,
            pool_size: None,
        }
    }

    #[test]
    fn overrides_replace_config_values() {
        let mut config = ServiceConfig::default();
        let args = ServeArgs {
            host: Some("0.0.0.0".into()),
            port: Some(9000),
            model: Some("https://example.com/m.zip".into()),
            pool_size: Some(8),
        };
        args.apply(&mut config);
        assert_eq!(config.server.host, "0.0.0.0");
        assert_eq!(config.server.port, 9000);
        assert_eq!(config.model.source, "https://example.com/m.zip");
        assert_eq!(config.pool.size, 8);
    }

    #[test]
    fn absent_overrides_keep_config() {
        let mut config = ServiceConfig::default();
        no_overrides().apply(&mut config);
        assert_eq!(config.server.port, 8080);
        assert_eq!(config.pool.size, 4);
    }

    #[tokio::test]
    async fn missing_model_is_fatal_by_default() {
        let dir = tempfile::tempdir().expect("tmp");
        let mut config = ServiceConfig::default();
        config.model.source = dir.path().join("absent.zip").display().to_string();
        config.model.cache_dir = dir.path().to_path_buf();
        assert!(load_pool(&config).await.is_err());
    }

    #[tokio::test]
    async fn missing_model_tolerated_when_not_required() {
        let dir = tempfile::tempdir().expect("tmp");
        let mut config = ServiceConfig::default();
        config.model.source = dir.path().join("absent.zip").display().to_string();
        config.model.cache_dir = dir.path().to_path_buf();
        config.model.require_loaded = false;
        let pool = load_pool(&config).await.expect("starts unavailable");
        assert!(!pool.is_ready());
    }
}
