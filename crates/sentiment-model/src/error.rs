//! Error types for model loading and scoring.

use sentiment_types::{DiagnosticError, ErrorKind, PredictError};
use thiserror::Error;

/// Errors that can occur while loading or running a model.
#[derive(Debug, Error)]
pub enum ModelError {
    /// The artifact file could not be read or written.
    #[error("cannot access model artifact at '{path}': {source}")]
    Io {
        /// The path involved.
        path: String,
        /// The underlying I/O error.
        #[source]
        source: std::io::Error,
    },
    /// Downloading a remote artifact failed.
    #[error("failed to fetch model from {uri}: {reason}")]
    Fetch { uri: String, reason: String },
    /// The packaged archive is not a readable ZIP or lacks `model.json`.
    #[error("invalid model archive: {0}")]
    Archive(String),
    /// `model.json` is not valid JSON for the artifact format.
    #[error("invalid model document: {0}")]
    Parse(String),
    /// The artifact parsed but its contents are inconsistent.
    #[error("invalid model: {0}")]
    Invalid(String),
    /// The artifact schema does not match the record bindings.
    #[error("schema mismatch on column '{column}': {reason}")]
    Schema { column: String, reason: String },
    /// Scoring failed for a structurally valid input.
    #[error("scoring failed: {0}")]
    Scoring(String),
}

impl ModelError {
    /// Whether this error came from scoring rather than loading.
    pub fn is_scoring(&self) -> bool {
        matches!(self, Self::Scoring(_))
    }
}

/// Converts into a client-facing error.
///
/// Load failures carry host paths and URLs, so clients only learn that
/// the model is not loaded.
impl From<ModelError> for PredictError {
    fn from(e: ModelError) -> Self {
        if e.is_scoring() {
            PredictError::new(ErrorKind::ScoringError, e.to_string())
        } else {
            PredictError::new(ErrorKind::ModelUnavailable, MODEL_NOT_LOADED)
        }
    }
}

/// Message reported to clients for any load failure.
pub const MODEL_NOT_LOADED: &str = "the sentiment model is not loaded";

impl DiagnosticError for ModelError {
    fn hint(&self) -> Option<String> {
        match self {
            Self::Io { path, .. } => Some(format!("The model file '{path}' is missing or unreadable.")),
            Self::Fetch { .. } => Some("The remote model could not be downloaded.".into()),
            Self::Archive(_) => Some("The ZIP package must contain a model.json entry.".into()),
            Self::Parse(_) | Self::Invalid(_) => {
                Some("The model document is corrupt or from an unsupported format version.".into())
            }
            Self::Schema { .. } => Some(
                "The model was packaged for a different input/output shape than this service expects."
                    .into(),
            ),
            Self::Scoring(_) => None,
        }
    }

    fn fix(&self) -> Option<String> {
        match self {
            Self::Io { .. } => Some("Point model.source at an existing file or URL.".into()),
            Self::Fetch { .. } => Some(
                "Check network access, or download the file and set model.source to its local path."
                    .into(),
            ),
            Self::Schema { .. } => Some(
                "Repackage the model with columns SentimentText, Label, PredictedLabel, Probability, Score."
                    .into(),
            ),
            _ => None,
        }
    }
}
