//! Shared helpers for runtime integration tests.

#![allow(dead_code)]

use std::path::PathBuf;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::Arc;
use std::time::Duration;

use sentiment_model::{ModelError, ScoringHandle};
use sentiment_types::{SentimentInput, SentimentOutput};

/// Path of the bundled demo model.
pub fn bundled_model() -> String {
    PathBuf::from(env!("CARGO_MANIFEST_DIR"))
        .join("../../models/sentiment_model.json")
        .display()
        .to_string()
}

/// Handle that sleeps while scoring and tracks peak concurrent use.
pub struct SlowHandle {
    pub delay: Duration,
    pub active: Arc<AtomicUsize>,
    pub peak: Arc<AtomicUsize>,
}

impl SlowHandle {
    pub fn fleet(n: usize, delay: Duration) -> (Vec<Self>, Arc<AtomicUsize>) {
        let active = Arc::new(AtomicUsize::new(0));
        let peak = Arc::new(AtomicUsize::new(0));
        let handles = (0..n)
            .map(|_| SlowHandle {
                delay,
                active: active.clone(),
                peak: peak.clone(),
            })
            .collect();
        (handles, peak)
    }
}

impl ScoringHandle for SlowHandle {
    fn score(&mut self, input: &SentimentInput) -> Result<SentimentOutput, ModelError> {
        let now = self.active.fetch_add(1, Ordering::SeqCst) + 1;
        self.peak.fetch_max(now, Ordering::SeqCst);
        std::thread::sleep(self.delay);
        self.active.fetch_sub(1, Ordering::SeqCst);
        Ok(SentimentOutput {
            prediction: !input.sentiment_text.is_empty(),
            probability: 0.5,
            score: input.sentiment_text.len() as f32,
        })
    }
}

/// Handle whose transform always fails.
pub struct FailingHandle;

impl ScoringHandle for FailingHandle {
    fn score(&mut self, _input: &SentimentInput) -> Result<SentimentOutput, ModelError> {
        Err(ModelError::Scoring("feature overflow".into()))
    }
}
