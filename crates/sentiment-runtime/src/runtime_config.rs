//! Configuration for loading a model pool.

use std::path::PathBuf;

use crate::pool::PoolConfig;

/// Everything `ModelPool::load` needs.
#[derive(Debug, Clone)]
pub struct ModelPoolConfig {
    /// Local path or `http(s)://` URL of the model artifact.
    pub source: String,
    /// Directory for downloaded artifacts.
    pub cache_dir: PathBuf,
    /// Handle pool settings.
    pub pool: PoolConfig,
}

impl ModelPoolConfig {
    /// Config for `source` with default cache directory and pool settings.
    pub fn new(source: impl Into<String>) -> Self {
        Self {
            source: source.into(),
            cache_dir: PathBuf::from(".sentiment/cache"),
            pool: PoolConfig::default(),
        }
    }
}
