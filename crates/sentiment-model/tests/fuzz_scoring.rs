//! Property-based tests for featurization and scoring.
//!
//! Arbitrary text must never panic and must always produce a complete,
//! bounded output.

use std::sync::Arc;

use proptest::prelude::*;
use sentiment_model::{ScoringHandle, SentimentModel};
use sentiment_types::{ColumnMapping, SentimentInput};

fn bundled() -> Arc<SentimentModel> {
    let path = concat!(env!("CARGO_MANIFEST_DIR"), "/../../models/sentiment_model.json");
    let bytes = std::fs::read(path).expect("bundled model present");
    Arc::new(SentimentModel::from_bytes(&bytes, &ColumnMapping::sentiment()).expect("load"))
}

proptest! {
    /// Probability stays in [0, 1] and the label agrees with the score.
    #[test]
    fn probability_is_bounded(text in "\\PC{0,256}") {
        let model = bundled();
        let mut handle = model.create_handle();
        let out = handle.score(&SentimentInput::new(text)).expect("score");
        prop_assert!((0.0..=1.0).contains(&out.probability));
        prop_assert!(out.score.is_finite());
        prop_assert_eq!(out.prediction, out.score > 0.0);
    }

    /// Reusing a handle gives the same answer as a fresh handle.
    #[test]
    fn reused_handle_matches_fresh(a in "[a-z ]{0,64}", b in "[a-z ]{0,64}") {
        let model = bundled();
        let mut reused = model.create_handle();
        let _ = reused.score(&SentimentInput::new(a)).expect("score");
        let from_reused = reused.score(&SentimentInput::new(b.clone())).expect("score");
        let from_fresh = model.create_handle().score(&SentimentInput::new(b)).expect("score");
        prop_assert_eq!(from_reused, from_fresh);
    }
}
