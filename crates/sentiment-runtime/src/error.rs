//! Runtime-specific error types.

use sentiment_model::{ModelError, MODEL_NOT_LOADED};
use sentiment_types::{DiagnosticError, ErrorKind, PredictError};
use thiserror::Error;

/// Errors from the model pool.
#[derive(Debug, Error)]
pub enum RuntimeError {
    /// The pool was never initialized with a model.
    #[error("model unavailable: {reason}")]
    ModelUnavailable { reason: String },
    /// Loading or scoring failed inside the model.
    #[error(transparent)]
    Model(#[from] ModelError),
    /// No scoring handle became free within the bounded wait.
    #[error("scoring pool exhausted after waiting {waited_ms}ms")]
    PoolExhausted { waited_ms: u64 },
    /// The pool has been shut down.
    #[error("scoring pool is closed")]
    PoolClosed,
    /// Pool settings are unusable.
    #[error("invalid pool configuration: {0}")]
    InvalidConfig(String),
    /// The blocking scoring task panicked or was cancelled.
    #[error("scoring task failed: {0}")]
    TaskFailed(String),
}

impl RuntimeError {
    /// The domain error kind this error is reported as.
    pub fn kind(&self) -> ErrorKind {
        match self {
            Self::Model(e) if e.is_scoring() => ErrorKind::ScoringError,
            Self::TaskFailed(_) => ErrorKind::ScoringError,
            Self::PoolExhausted { .. } => ErrorKind::ResourceExhausted,
            Self::ModelUnavailable { .. }
            | Self::Model(_)
            | Self::PoolClosed
            | Self::InvalidConfig(_) => ErrorKind::ModelUnavailable,
        }
    }
}

/// Converts into a client-facing error.
///
/// Load failures are reported without their detail, which can name
/// host paths or URLs; the detail is logged where the failure happens.
impl From<RuntimeError> for PredictError {
    fn from(e: RuntimeError) -> Self {
        match e {
            RuntimeError::Model(model) => model.into(),
            RuntimeError::TaskFailed(_) => {
                PredictError::new(ErrorKind::ScoringError, "scoring task failed")
            }
            exhausted @ RuntimeError::PoolExhausted { .. } => {
                PredictError::new(ErrorKind::ResourceExhausted, exhausted.to_string())
            }
            RuntimeError::ModelUnavailable { .. }
            | RuntimeError::PoolClosed
            | RuntimeError::InvalidConfig(_) => {
                PredictError::new(ErrorKind::ModelUnavailable, MODEL_NOT_LOADED)
            }
        }
    }
}

impl DiagnosticError for RuntimeError {
    fn hint(&self) -> Option<String> {
        match self {
            Self::ModelUnavailable { reason } => Some(format!("Model failed to load: {reason}")),
            Self::Model(e) => e.hint(),
            Self::PoolExhausted { .. } => {
                Some("All scoring handles are busy. The service is under heavy load.".into())
            }
            Self::PoolClosed => Some("The service is shutting down.".into()),
            Self::InvalidConfig(_) | Self::TaskFailed(_) => None,
        }
    }

    fn fix(&self) -> Option<String> {
        match self {
            Self::Model(e) => e.fix(),
            Self::PoolExhausted { .. } => Some(
                "Increase the pool size or the wait:\n  [pool]\n  size = 8\n  acquire_timeout_ms = 10000"
                    .into(),
            ),
            Self::InvalidConfig(_) => Some("Set pool.size to at least 1.".into()),
            _ => None,
        }
    }
}
