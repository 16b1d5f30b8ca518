//! Scoring handles: per-caller mutable state over a shared model.

use std::sync::Arc;

use sentiment_types::{SentimentInput, SentimentOutput};

use crate::error::ModelError;
use crate::featurizer::Normalization;
use crate::model::SentimentModel;

/// Transforms one input into one output.
///
/// Handles carry mutable scratch state and take `&mut self`, so a handle
/// can only serve one caller at a time. Pools hand them out exclusively.
pub trait ScoringHandle: Send + 'static {
    /// Scores a single input.
    ///
    /// # Errors
    ///
    /// Returns `ModelError::Scoring` if the model cannot produce a finite
    /// result for a structurally valid input.
    fn score(&mut self, input: &SentimentInput) -> Result<SentimentOutput, ModelError>;
}

/// Scoring handle over a [`SentimentModel`].
#[derive(Debug)]
pub struct ModelScorer {
    model: Arc<SentimentModel>,
    tokens: Vec<String>,
    ngram: String,
    /// Dense feature vector, all zeros between calls.
    features: Vec<f32>,
    /// Indices of non-zero entries in `features`.
    active: Vec<usize>,
}

impl ModelScorer {
    /// Creates a handle with buffers sized for `model`.
    pub fn new(model: Arc<SentimentModel>) -> Self {
        let features = vec![0.0; model.feature_count()];
        Self {
            model,
            tokens: Vec::new(),
            ngram: String::new(),
            features,
            active: Vec::new(),
        }
    }

    fn extract_features(&mut self, text: &str) {
        let model = &self.model;
        let features = &mut self.features;
        let active = &mut self.active;

        model.featurizer.tokenize_into(text, &mut self.tokens);
        model
            .featurizer
            .for_each_ngram(&self.tokens, &mut self.ngram, |gram| {
                if let Some(&idx) = model.index.get(gram) {
                    if features[idx] == 0.0 {
                        active.push(idx);
                    }
                    features[idx] += 1.0;
                }
            });

        if model.featurizer.config().normalize == Normalization::L2 {
            let norm = active
                .iter()
                .map(|&i| features[i] * features[i])
                .sum::<f32>()
                .sqrt();
            if norm > 0.0 {
                for &i in active.iter() {
                    features[i] /= norm;
                }
            }
        }
    }

    fn reset(&mut self) {
        for &i in &self.active {
            self.features[i] = 0.0;
        }
        self.active.clear();
        self.tokens.clear();
    }
}

impl ScoringHandle for ModelScorer {
    fn score(&mut self, input: &SentimentInput) -> Result<SentimentOutput, ModelError> {
        self.extract_features(&input.sentiment_text);

        let score = self.active.iter().fold(self.model.bias, |acc, &i| {
            acc + self.model.weights[i] * self.features[i]
        });
        self.reset();

        let model = &self.model;
        if !score.is_finite() {
            return Err(ModelError::Scoring(format!("raw score is not finite ({score})")));
        }
        let probability = model.calibrator.probability(score);
        if !probability.is_finite() {
            return Err(ModelError::Scoring("calibrated probability is not finite".into()));
        }

        Ok(SentimentOutput {
            prediction: score > model.threshold,
            probability: probability.clamp(0.0, 1.0),
            score,
        })
    }
}
