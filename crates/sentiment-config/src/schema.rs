//! Configuration schema types.

use std::path::PathBuf;
use std::time::Duration;

use serde::{Deserialize, Serialize};
use sentiment_runtime::{ModelPoolConfig, PoolConfig};

use crate::loader::ConfigError;

/// Top-level service configuration.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct ServiceConfig {
    /// HTTP listener settings.
    #[serde(default)]
    pub server: ServerConfig,
    /// Model artifact settings.
    #[serde(default)]
    pub model: ModelConfig,
    /// Scoring handle pool settings.
    #[serde(default)]
    pub pool: PoolSettings,
    /// Logging settings.
    #[serde(default)]
    pub logging: LoggingConfig,
}

impl ServiceConfig {
    /// Rejects values that parse but cannot work.
    ///
    /// # Errors
    ///
    /// Returns `ConfigError::Invalid` naming the offending key.
    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.pool.size == 0 {
            return Err(ConfigError::Invalid("pool.size must be at least 1".into()));
        }
        if self.model.source.trim().is_empty() {
            return Err(ConfigError::Invalid("model.source must not be empty".into()));
        }
        if self.server.host.trim().is_empty() {
            return Err(ConfigError::Invalid("server.host must not be empty".into()));
        }
        Ok(())
    }

    /// Converts the model and pool sections into runtime settings.
    pub fn model_pool(&self) -> ModelPoolConfig {
        ModelPoolConfig {
            source: self.model.source.clone(),
            cache_dir: self.model.cache_dir.clone(),
            pool: self.pool.to_pool_config(),
        }
    }
}

/// HTTP listener configuration.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ServerConfig {
    /// Interface to bind.
    #[serde(default = "default_host")]
    pub host: String,
    /// TCP port.
    #[serde(default = "default_port")]
    pub port: u16,
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            host: default_host(),
            port: default_port(),
        }
    }
}

fn default_host() -> String {
    "127.0.0.1".to_string()
}
fn default_port() -> u16 {
    8080
}

/// Model artifact configuration.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ModelConfig {
    /// Local path or `http(s)://` URL of the packaged model.
    #[serde(default = "default_source")]
    pub source: String,
    /// Where downloaded artifacts are cached.
    #[serde(default = "default_cache_dir")]
    pub cache_dir: PathBuf,
    /// Refuse to start if the model fails to load. When `false` the
    /// server starts anyway and answers predictions with 503.
    #[serde(default = "default_require_loaded")]
    pub require_loaded: bool,
}

impl Default for ModelConfig {
    fn default() -> Self {
        Self {
            source: default_source(),
            cache_dir: default_cache_dir(),
            require_loaded: default_require_loaded(),
        }
    }
}

fn default_source() -> String {
    "models/sentiment_model.json".to_string()
}
fn default_cache_dir() -> PathBuf {
    PathBuf::from(".sentiment/cache")
}
fn default_require_loaded() -> bool {
    true
}

/// Scoring handle pool configuration.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PoolSettings {
    /// Number of scoring handles.
    #[serde(default = "default_pool_size")]
    pub size: usize,
    /// Longest wait for a free handle in milliseconds (0 = no limit).
    #[serde(default = "default_acquire_timeout_ms")]
    pub acquire_timeout_ms: u64,
}

impl PoolSettings {
    /// Returns the acquire timeout, `None` meaning wait indefinitely.
    pub fn acquire_timeout(&self) -> Option<Duration> {
        (self.acquire_timeout_ms > 0).then(|| Duration::from_millis(self.acquire_timeout_ms))
    }

    /// Runtime pool settings.
    pub fn to_pool_config(&self) -> PoolConfig {
        PoolConfig {
            size: self.size,
            acquire_timeout: self.acquire_timeout(),
        }
    }
}

impl Default for PoolSettings {
    fn default() -> Self {
        Self {
            size: default_pool_size(),
            acquire_timeout_ms: default_acquire_timeout_ms(),
        }
    }
}

fn default_pool_size() -> usize {
    4
}
fn default_acquire_timeout_ms() -> u64 {
    5_000
}

/// Logging configuration.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct LoggingConfig {
    /// Log level filter (e.g. "info", "debug", "sentiment_runtime=trace").
    #[serde(default = "default_log_level")]
    pub level: String,
}

impl Default for LoggingConfig {
    fn default() -> Self {
        Self {
            level: default_log_level(),
        }
    }
}

fn default_log_level() -> String {
    "info".to_string()
}
