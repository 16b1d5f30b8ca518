//! The seam between transports and the model pool.

use async_trait::async_trait;
use sentiment_types::{SentimentInput, SentimentOutput};

use crate::error::RuntimeError;
use crate::metrics::MetricsSnapshot;

/// Anything that can turn one input into one prediction.
///
/// Transports hold an `Arc<dyn Predictor>` so they can be exercised
/// without a loaded model.
#[async_trait]
pub trait Predictor: Send + Sync {
    /// Scores one input.
    async fn predict(&self, input: SentimentInput) -> Result<SentimentOutput, RuntimeError>;

    /// Whether a model is loaded and predictions can succeed.
    fn is_ready(&self) -> bool;

    /// Current prediction counters.
    fn metrics(&self) -> MetricsSnapshot;
}
