//! The immutable, shareable loaded model.

use std::collections::HashMap;
use std::path::Path;
use std::sync::Arc;

use sentiment_types::{ColumnMapping, ColumnType};
use tracing::info;

use crate::artifact::{parse_artifact, Calibrator, ModelArtifact};
use crate::error::ModelError;
use crate::featurizer::TextFeaturizer;
use crate::scorer::ModelScorer;
use crate::source::{sha256_hex, ModelSource};

/// A validated linear sentiment model.
///
/// Never mutated after construction; scoring handles hold it in an `Arc`
/// and keep their per-call state to themselves.
#[derive(Debug)]
pub struct SentimentModel {
    pub(crate) featurizer: TextFeaturizer,
    pub(crate) index: HashMap<String, usize>,
    pub(crate) weights: Vec<f32>,
    pub(crate) bias: f32,
    pub(crate) calibrator: Calibrator,
    pub(crate) threshold: f32,
    info: ModelInfo,
}

/// Descriptive metadata about a loaded model.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ModelInfo {
    pub name: String,
    pub description: Option<String>,
    pub format_version: u32,
    /// SHA-256 of the artifact bytes the model was loaded from.
    pub sha256: String,
    pub vocabulary_size: usize,
    pub ngram_length: usize,
    /// `(column, type)` pairs, inputs first.
    pub input_columns: Vec<(String, ColumnType)>,
    pub output_columns: Vec<(String, ColumnType)>,
}

impl SentimentModel {
    /// Builds a model from a parsed artifact.
    ///
    /// # Errors
    ///
    /// Returns `ModelError::Invalid` or `ModelError::Schema` if the
    /// artifact is inconsistent or does not match `mapping`.
    pub fn from_artifact(
        artifact: ModelArtifact,
        mapping: &ColumnMapping,
        sha256: String,
    ) -> Result<Self, ModelError> {
        artifact.validate()?;
        artifact.validate_schema(mapping)?;
        let featurizer = TextFeaturizer::new(artifact.featurizer.clone())?;

        let info = ModelInfo {
            name: artifact.name,
            description: artifact.description,
            format_version: artifact.format_version,
            sha256,
            vocabulary_size: artifact.vocabulary.len(),
            ngram_length: featurizer.config().ngram_length,
            input_columns: columns(&artifact.schema.inputs),
            output_columns: columns(&artifact.schema.outputs),
        };
        let index = artifact
            .vocabulary
            .into_iter()
            .enumerate()
            .map(|(i, term)| (term, i))
            .collect();

        Ok(Self {
            featurizer,
            index,
            weights: artifact.weights,
            bias: artifact.bias,
            calibrator: artifact.calibrator,
            threshold: artifact.threshold,
            info,
        })
    }

    /// Parses and validates raw artifact bytes (ZIP package or JSON).
    ///
    /// # Errors
    ///
    /// Any parse, validation, or schema error.
    pub fn from_bytes(bytes: &[u8], mapping: &ColumnMapping) -> Result<Self, ModelError> {
        let artifact = parse_artifact(bytes)?;
        Self::from_artifact(artifact, mapping, sha256_hex(bytes))
    }

    /// Metadata about this model.
    pub fn info(&self) -> &ModelInfo {
        &self.info
    }

    /// Number of features (vocabulary terms).
    pub fn feature_count(&self) -> usize {
        self.weights.len()
    }

    /// Creates a fresh scoring handle sharing this model.
    pub fn create_handle(self: &Arc<Self>) -> ModelScorer {
        ModelScorer::new(Arc::clone(self))
    }
}

fn columns(specs: &[crate::artifact::ColumnSpec]) -> Vec<(String, ColumnType)> {
    specs
        .iter()
        .map(|c| (c.name.clone(), c.column_type))
        .collect()
}

/// Fetches, parses, and validates a model from `source`.
///
/// Remote sources are cached under `cache_dir`.
///
/// # Errors
///
/// Returns the first fetch, parse, validation, or schema error.
pub async fn load_model(
    source: &ModelSource,
    cache_dir: &Path,
    mapping: &ColumnMapping,
) -> Result<Arc<SentimentModel>, ModelError> {
    let fetched = source.fetch(cache_dir).await?;
    let artifact = parse_artifact(&fetched.bytes)?;
    let model = SentimentModel::from_artifact(artifact, mapping, fetched.sha256)?;
    let info = model.info();
    info!(
        %source,
        name = %info.name,
        sha256 = %info.sha256,
        vocabulary = info.vocabulary_size,
        from_cache = fetched.from_cache,
        "model loaded"
    );
    Ok(Arc::new(model))
}
