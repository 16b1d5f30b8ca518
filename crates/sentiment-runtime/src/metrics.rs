//! Prediction counters.
//!
//! Lock-free atomics recorded from concurrent request tasks. Use
//! [`MetricsSnapshot`] for a copyable view.

use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::Arc;

/// Shared, thread-safe counters collected by [`super::ModelPool`].
#[derive(Debug, Default)]
pub struct PredictionMetrics {
    /// Predictions attempted.
    pub total_predictions: AtomicU64,
    /// Predictions that produced an output.
    pub successful_predictions: AtomicU64,
    /// Predictions where the model failed to score.
    pub scoring_failures: AtomicU64,
    /// Predictions rejected because no handle freed up in time.
    pub exhausted: AtomicU64,
    /// Predictions rejected because no model is loaded.
    pub unavailable: AtomicU64,
}

/// A point-in-time snapshot of [`PredictionMetrics`].
///
/// Use [`PredictionMetrics::snapshot`] to obtain one.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct MetricsSnapshot {
    /// Predictions attempted.
    pub total_predictions: u64,
    /// Predictions answered with an output.
    pub successful_predictions: u64,
    /// Scoring failures (including panicked scoring tasks).
    pub scoring_failures: u64,
    /// Rejections after the bounded wait elapsed.
    pub exhausted: u64,
    /// Rejections because no model was loaded or the pool was closed.
    pub unavailable: u64,
}

impl PredictionMetrics {
    /// Creates a new zeroed metrics instance wrapped in an [`Arc`].
    pub fn new_shared() -> Arc<Self> {
        Arc::new(Self::default())
    }

    /// Records one prediction attempt, whatever its outcome.
    pub fn record_attempt(&self) {
        self.total_predictions.fetch_add(1, Ordering::Relaxed);
    }

    /// Records a prediction that produced an output.
    pub fn record_success(&self) {
        self.successful_predictions.fetch_add(1, Ordering::Relaxed);
    }

    /// Records a failed transform on a checked-out handle.
    pub fn record_scoring_failure(&self) {
        self.scoring_failures.fetch_add(1, Ordering::Relaxed);
    }

    /// Records a caller that gave up waiting for a handle.
    pub fn record_exhausted(&self) {
        self.exhausted.fetch_add(1, Ordering::Relaxed);
    }

    /// Records a prediction refused because the pool cannot score.
    pub fn record_unavailable(&self) {
        self.unavailable.fetch_add(1, Ordering::Relaxed);
    }

    /// Returns a point-in-time snapshot of all counters.
    pub fn snapshot(&self) -> MetricsSnapshot {
        MetricsSnapshot {
            total_predictions: self.total_predictions.load(Ordering::Relaxed),
            successful_predictions: self.successful_predictions.load(Ordering::Relaxed),
            scoring_failures: self.scoring_failures.load(Ordering::Relaxed),
            exhausted: self.exhausted.load(Ordering::Relaxed),
            unavailable: self.unavailable.load(Ordering::Relaxed),
        }
    }
}
