//! # sentiment-model
//!
//! Loads packaged sentiment models and scores text with them.
//!
//! A [`SentimentModel`] is immutable once loaded and is shared through
//! `Arc` by any number of [`ModelScorer`] handles. Each handle owns its
//! scratch buffers and is therefore `Send` but used by one caller at a
//! time (`&mut self`).

pub mod artifact;
pub mod error;
pub mod featurizer;
pub mod model;
pub mod scorer;
pub mod source;

pub use artifact::{parse_artifact, Calibrator, ColumnSpec, ModelArtifact, ModelSchema};
pub use error::{ModelError, MODEL_NOT_LOADED};
pub use featurizer::{FeaturizerConfig, Normalization, TextFeaturizer};
pub use model::{load_model, ModelInfo, SentimentModel};
pub use scorer::{ModelScorer, ScoringHandle};
pub use source::{sha256_hex, FetchedArtifact, ModelSource};
