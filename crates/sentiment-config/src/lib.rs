//! # sentiment-config
//!
//! Configuration management for the prediction service.
//! Supports layered config: defaults -> file -> env vars.

pub mod loader;
pub mod schema;

pub use loader::{load_config, ConfigError, ENV_PREFIX};
pub use schema::{LoggingConfig, ModelConfig, PoolSettings, ServerConfig, ServiceConfig};
