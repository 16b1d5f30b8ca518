//! Packaged model artifact format.
//!
//! An artifact is either a ZIP package holding a `model.json` entry or a
//! bare `model.json` document. Parsing is a pure bytes-to-struct
//! transformation; fetching bytes lives in [`crate::source`].

use std::collections::HashSet;
use std::io::{Cursor, Read, Write};

use serde::{Deserialize, Serialize};
use sentiment_types::{ColumnMapping, ColumnType};

use crate::error::ModelError;
use crate::featurizer::FeaturizerConfig;

/// Artifact format version understood by this crate.
pub const FORMAT_VERSION: u32 = 1;

/// Name of the document entry inside a ZIP package.
pub const MODEL_ENTRY: &str = "model.json";

/// Upper bound on the uncompressed size of `model.json`.
pub const MAX_DOCUMENT_BYTES: u64 = 64 * 1024 * 1024;

const ZIP_MAGIC: &[u8] = b"PK\x03\x04";

/// One declared model column.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ColumnSpec {
    pub name: String,
    #[serde(rename = "type")]
    pub column_type: ColumnType,
}

/// Input and output columns declared by the artifact.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ModelSchema {
    pub inputs: Vec<ColumnSpec>,
    pub outputs: Vec<ColumnSpec>,
}

/// Platt scaling parameters turning a raw score into a probability.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Calibrator {
    pub slope: f32,
    pub offset: f32,
}

impl Calibrator {
    /// `1 / (1 + exp(-(slope * score + offset)))`
    pub fn probability(&self, score: f32) -> f32 {
        let z = self.slope * score + self.offset;
        1.0 / (1.0 + (-z).exp())
    }
}

impl Default for Calibrator {
    fn default() -> Self {
        Self {
            slope: 1.0,
            offset: 0.0,
        }
    }
}

/// The contents of `model.json`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ModelArtifact {
    pub format_version: u32,
    pub name: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
    pub schema: ModelSchema,
    #[serde(default)]
    pub featurizer: FeaturizerConfig,
    /// Term at index `i` owns feature `i` and weight `i`.
    pub vocabulary: Vec<String>,
    pub weights: Vec<f32>,
    pub bias: f32,
    #[serde(default)]
    pub calibrator: Calibrator,
    #[serde(default)]
    pub threshold: f32,
}

impl ModelArtifact {
    /// Checks internal consistency: version, vector lengths, finiteness.
    ///
    /// # Errors
    ///
    /// Returns `ModelError::Invalid` describing the first problem found.
    pub fn validate(&self) -> Result<(), ModelError> {
        if self.format_version != FORMAT_VERSION {
            return Err(ModelError::Invalid(format!(
                "unsupported format_version {} (expected {FORMAT_VERSION})",
                self.format_version
            )));
        }
        if self.vocabulary.len() != self.weights.len() {
            return Err(ModelError::Invalid(format!(
                "vocabulary has {} terms but weights has {} values",
                self.vocabulary.len(),
                self.weights.len()
            )));
        }
        let mut seen = HashSet::with_capacity(self.vocabulary.len());
        for term in &self.vocabulary {
            if term.trim().is_empty() {
                return Err(ModelError::Invalid("vocabulary contains an empty term".into()));
            }
            if !seen.insert(term.as_str()) {
                return Err(ModelError::Invalid(format!("duplicate vocabulary term '{term}'")));
            }
        }
        if let Some(idx) = self.weights.iter().position(|w| !w.is_finite()) {
            return Err(ModelError::Invalid(format!(
                "weight for '{}' is not finite",
                self.vocabulary[idx]
            )));
        }
        let scalars = [
            ("bias", self.bias),
            ("calibrator.slope", self.calibrator.slope),
            ("calibrator.offset", self.calibrator.offset),
            ("threshold", self.threshold),
        ];
        for (name, value) in scalars {
            if !value.is_finite() {
                return Err(ModelError::Invalid(format!("{name} is not finite")));
            }
        }
        Ok(())
    }

    /// Checks that every bound column is declared with the expected type.
    ///
    /// # Errors
    ///
    /// Returns `ModelError::Schema` for the first missing or mistyped column.
    pub fn validate_schema(&self, mapping: &ColumnMapping) -> Result<(), ModelError> {
        let pairs = mapping
            .inputs()
            .map(|b| (b, &self.schema.inputs))
            .chain(mapping.outputs().map(|b| (b, &self.schema.outputs)));
        for (binding, declared) in pairs {
            let Some(spec) = declared.iter().find(|c| c.name == binding.column) else {
                return Err(ModelError::Schema {
                    column: binding.column.to_string(),
                    reason: format!("not declared (bound to field '{}')", binding.field),
                });
            };
            if spec.column_type != binding.column_type {
                return Err(ModelError::Schema {
                    column: binding.column.to_string(),
                    reason: format!(
                        "declared as {:?}, expected {:?}",
                        spec.column_type, binding.column_type
                    ),
                });
            }
        }
        Ok(())
    }

    /// Serializes the artifact as a `model.json` document.
    ///
    /// # Errors
    ///
    /// Returns `ModelError::Parse` if serialization fails.
    pub fn to_json(&self) -> Result<String, ModelError> {
        serde_json::to_string_pretty(self).map_err(|e| ModelError::Parse(e.to_string()))
    }

    /// Packages the artifact as a ZIP archive with a single `model.json`.
    ///
    /// # Errors
    ///
    /// Returns `ModelError::Archive` if the archive cannot be written.
    pub fn to_zip_bytes(&self) -> Result<Vec<u8>, ModelError> {
        let json = self.to_json()?;
        let mut writer = zip::ZipWriter::new(Cursor::new(Vec::new()));
        writer
            .start_file(MODEL_ENTRY, zip::write::SimpleFileOptions::default())
            .map_err(|e| ModelError::Archive(e.to_string()))?;
        writer
            .write_all(json.as_bytes())
            .map_err(|e| ModelError::Archive(e.to_string()))?;
        let cursor = writer
            .finish()
            .map_err(|e| ModelError::Archive(e.to_string()))?;
        Ok(cursor.into_inner())
    }
}

/// Parses artifact bytes, accepting either a ZIP package or bare JSON.
///
/// Only the document structure is checked here; call
/// [`ModelArtifact::validate`] and [`ModelArtifact::validate_schema`]
/// before using the result.
///
/// # Errors
///
/// Returns `ModelError::Archive` for unreadable packages and
/// `ModelError::Parse` for malformed documents.
pub fn parse_artifact(bytes: &[u8]) -> Result<ModelArtifact, ModelError> {
    let document = if bytes.starts_with(ZIP_MAGIC) {
        read_zip_document(bytes)?
    } else {
        String::from_utf8(bytes.to_vec())
            .map_err(|_| ModelError::Parse("model document is not UTF-8".into()))?
    };
    serde_json::from_str(&document).map_err(|e| ModelError::Parse(e.to_string()))
}

/// Extracts `model.json` from a ZIP package, at the root or one level deep.
fn read_zip_document(bytes: &[u8]) -> Result<String, ModelError> {
    let mut archive =
        zip::ZipArchive::new(Cursor::new(bytes)).map_err(|e| ModelError::Archive(e.to_string()))?;

    let entry_name = archive
        .file_names()
        .filter(|name| is_document_entry(name))
        .min_by_key(|name| name.len())
        .map(str::to_string)
        .ok_or_else(|| ModelError::Archive(format!("no {MODEL_ENTRY} entry in package")))?;

    let file = archive
        .by_name(&entry_name)
        .map_err(|e| ModelError::Archive(e.to_string()))?;
    read_limited(file, MAX_DOCUMENT_BYTES, &entry_name)
}

/// `model.json` or `<dir>/model.json`.
fn is_document_entry(name: &str) -> bool {
    match name.strip_suffix(MODEL_ENTRY) {
        Some("") => true,
        Some(dir) => dir
            .strip_suffix('/')
            .is_some_and(|parent| !parent.is_empty() && !parent.contains('/')),
        None => false,
    }
}

/// Reads at most `limit` bytes of UTF-8; the declared entry size is not
/// trusted.
fn read_limited(reader: impl Read, limit: u64, name: &str) -> Result<String, ModelError> {
    let mut document = String::new();
    reader
        .take(limit + 1)
        .read_to_string(&mut document)
        .map_err(|e| ModelError::Archive(format!("cannot read {name}: {e}")))?;
    if document.len() as u64 > limit {
        return Err(ModelError::Archive(format!(
            "{name} exceeds the {limit} byte limit"
        )));
    }
    Ok(document)
}
