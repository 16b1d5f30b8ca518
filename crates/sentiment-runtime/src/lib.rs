//! # sentiment-runtime
//!
//! Runtime side of the prediction service.
//! Owns the loaded model behind a bounded pool of scoring handles and
//! exposes a single acquire-and-score operation through [`Predictor`].
//!
//! Use `ModelPool::load` at startup, then share it behind an `Arc`.

pub mod error;
pub mod metrics;
pub mod model_pool;
pub mod pool;
pub mod predictor;
pub mod runtime_config;

pub use error::RuntimeError;
pub use metrics::{MetricsSnapshot, PredictionMetrics};
pub use model_pool::ModelPool;
pub use pool::{HandlePool, PoolConfig, PooledHandle};
pub use predictor::Predictor;
pub use runtime_config::ModelPoolConfig;
