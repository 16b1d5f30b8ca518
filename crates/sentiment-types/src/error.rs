//! Unified error types for the prediction domain.

use serde::{Deserialize, Serialize};
use std::fmt;

/// Classification of prediction failures.
///
/// Each kind maps to exactly one HTTP status so clients can tell the
/// four failure modes apart without seeing internal details.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ErrorKind {
    /// Request body could not be parsed into a `SentimentInput`.
    MalformedRequest,
    /// The model pool was never initialized.
    ModelUnavailable,
    /// The model failed to score a structurally valid input.
    ScoringError,
    /// No scoring handle became free within the bounded wait.
    ResourceExhausted,
}

impl ErrorKind {
    /// HTTP status code surfaced to clients for this kind.
    pub fn http_status(self) -> u16 {
        match self {
            Self::MalformedRequest => 400,
            Self::ScoringError => 500,
            Self::ModelUnavailable | Self::ResourceExhausted => 503,
        }
    }

    /// Stable snake_case identifier, identical to the serialized form.
    pub fn as_str(self) -> &'static str {
        match self {
            Self::MalformedRequest => "malformed_request",
            Self::ModelUnavailable => "model_unavailable",
            Self::ScoringError => "scoring_error",
            Self::ResourceExhausted => "resource_exhausted",
        }
    }
}

impl fmt::Display for ErrorKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Domain-level error reported to clients.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PredictError {
    /// The kind of error.
    pub kind: ErrorKind,
    /// Human-readable error message.
    pub message: String,
}

impl PredictError {
    /// Creates a new `PredictError`.
    pub fn new(kind: ErrorKind, message: impl Into<String>) -> Self {
        Self {
            kind,
            message: message.into(),
        }
    }

    /// Creates a malformed-request error.
    pub fn malformed(message: impl Into<String>) -> Self {
        Self::new(ErrorKind::MalformedRequest, message)
    }
}

impl fmt::Display for PredictError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "[{}] {}", self.kind, self.message)
    }
}

impl std::error::Error for PredictError {}

/// Transforms technical errors into user-actionable diagnostics.
///
/// Implementors provide optional `hint` (cause explanation) and `fix`
/// (concrete remediation step) for each error variant.
pub trait DiagnosticError {
    /// A human-readable explanation of the likely cause.
    fn hint(&self) -> Option<String> {
        None
    }
    /// A concrete fix the user can apply (e.g. a config change).
    fn fix(&self) -> Option<String> {
        None
    }
}
