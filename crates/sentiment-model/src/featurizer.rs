//! Text featurization: normalization, tokenization, and n-gram expansion.
//!
//! The featurizer is configured by the artifact and never changes after
//! load. It writes into caller-owned buffers so scoring handles can reuse
//! their allocations between calls.

use serde::{Deserialize, Serialize};

use crate::error::ModelError;

/// Longest n-gram a model may declare.
pub const MAX_NGRAM_LENGTH: usize = 3;

/// Vector normalization applied to the n-gram counts.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Normalization {
    /// Raw counts.
    None,
    /// Scale the count vector to unit Euclidean length.
    #[default]
    L2,
}

/// Featurizer settings stored in the model artifact.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct FeaturizerConfig {
    /// Lowercase text before tokenizing.
    #[serde(default = "default_true")]
    pub lowercase: bool,
    /// Treat every non-alphanumeric character (except `'`) as a separator.
    #[serde(default = "default_true")]
    pub strip_punctuation: bool,
    /// Longest word n-gram to extract.
    #[serde(default = "default_ngram_length")]
    pub ngram_length: usize,
    /// Count vector normalization.
    #[serde(default)]
    pub normalize: Normalization,
}

impl Default for FeaturizerConfig {
    fn default() -> Self {
        Self {
            lowercase: true,
            strip_punctuation: true,
            ngram_length: default_ngram_length(),
            normalize: Normalization::default(),
        }
    }
}

fn default_true() -> bool {
    true
}
fn default_ngram_length() -> usize {
    2
}

/// Stateless text featurizer.
#[derive(Debug, Clone)]
pub struct TextFeaturizer {
    config: FeaturizerConfig,
}

impl TextFeaturizer {
    /// Creates a featurizer after validating its settings.
    ///
    /// # Errors
    ///
    /// Returns `ModelError::Invalid` if `ngram_length` is outside `1..=3`.
    pub fn new(config: FeaturizerConfig) -> Result<Self, ModelError> {
        if config.ngram_length == 0 || config.ngram_length > MAX_NGRAM_LENGTH {
            return Err(ModelError::Invalid(format!(
                "ngram_length must be between 1 and {MAX_NGRAM_LENGTH}, got {}",
                config.ngram_length
            )));
        }
        Ok(Self { config })
    }

    /// The settings this featurizer was built with.
    pub fn config(&self) -> &FeaturizerConfig {
        &self.config
    }

    /// Splits `text` into tokens, replacing the contents of `tokens`.
    pub fn tokenize_into(&self, text: &str, tokens: &mut Vec<String>) {
        tokens.clear();
        let mut current = String::new();
        for ch in text.chars() {
            if self.is_separator(ch) {
                push_token(tokens, &mut current);
            } else if self.config.lowercase {
                current.extend(ch.to_lowercase());
            } else {
                current.push(ch);
            }
        }
        push_token(tokens, &mut current);
    }

    /// Calls `visit` with every n-gram of `tokens`, shortest first.
    ///
    /// Multi-word n-grams are joined with a single space, matching the
    /// vocabulary term format. `buf` is scratch space owned by the caller.
    pub fn for_each_ngram(&self, tokens: &[String], buf: &mut String, mut visit: impl FnMut(&str)) {
        for n in 1..=self.config.ngram_length {
            for window in tokens.windows(n) {
                buf.clear();
                for (i, token) in window.iter().enumerate() {
                    if i > 0 {
                        buf.push(' ');
                    }
                    buf.push_str(token);
                }
                visit(buf);
            }
        }
    }

    fn is_separator(&self, ch: char) -> bool {
        if self.config.strip_punctuation {
            !(ch.is_alphanumeric() || ch == '\'')
        } else {
            ch.is_whitespace()
        }
    }
}

/// Moves `current` into `tokens` unless it is empty after trimming quotes.
fn push_token(tokens: &mut Vec<String>, current: &mut String) {
    let token = std::mem::take(current);
    let trimmed = token.trim_matches('\'');
    if trimmed.is_empty() {
        return;
    }
    if trimmed.len() == token.len() {
        tokens.push(token);
    } else {
        tokens.push(trimmed.to_string());
    }
}
