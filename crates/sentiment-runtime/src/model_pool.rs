//! Process-wide model pool: load once, score many.

use std::sync::Arc;

use async_trait::async_trait;
use sentiment_model::{load_model, ModelInfo, ModelScorer, ModelSource, ScoringHandle, SentimentModel};
use sentiment_types::{ColumnMapping, SentimentInput, SentimentOutput};
use tracing::{debug, info, warn};

use crate::error::RuntimeError;
use crate::metrics::{MetricsSnapshot, PredictionMetrics};
use crate::pool::{HandlePool, PoolConfig};
use crate::predictor::Predictor;
use crate::runtime_config::ModelPoolConfig;

enum PoolState<H> {
    Ready {
        handles: HandlePool<H>,
        info: Option<ModelInfo>,
    },
    Unavailable {
        reason: String,
    },
}

/// Shared pool of scoring handles over one loaded model.
///
/// The model weights are immutable and shared by every handle; each
/// handle's scratch state is only ever touched by the caller that has it
/// checked out.
pub struct ModelPool<H: ScoringHandle = ModelScorer> {
    state: PoolState<H>,
    metrics: Arc<PredictionMetrics>,
}

impl ModelPool<ModelScorer> {
    /// Fetches, validates, and loads the configured model, then builds
    /// `config.pool.size` handles over it.
    ///
    /// # Errors
    ///
    /// Returns `RuntimeError::Model` if the artifact is missing, corrupt,
    /// or does not match the record schema, and
    /// `RuntimeError::InvalidConfig` for a zero-sized pool.
    pub async fn load(config: &ModelPoolConfig) -> Result<Self, RuntimeError> {
        if config.pool.size == 0 {
            return Err(RuntimeError::InvalidConfig("pool size must be at least 1".into()));
        }
        let source = ModelSource::parse(&config.source);
        let model = load_model(&source, &config.cache_dir, &ColumnMapping::sentiment()).await?;
        Self::from_model(model, &config.pool)
    }

    /// Builds a pool over an already loaded model.
    ///
    /// # Errors
    ///
    /// Returns `RuntimeError::InvalidConfig` for a zero-sized pool.
    pub fn from_model(model: Arc<SentimentModel>, pool: &PoolConfig) -> Result<Self, RuntimeError> {
        let handles = (0..pool.size).map(|_| model.create_handle()).collect();
        let mut this = Self::from_handles(handles, pool)?;
        if let PoolState::Ready { info, .. } = &mut this.state {
            *info = Some(model.info().clone());
        }
        info!(
            model = %model.info().name,
            size = pool.size,
            timeout_ms = pool.acquire_timeout.map(|d| d.as_millis() as u64),
            "model pool ready"
        );
        Ok(this)
    }
}

impl<H: ScoringHandle> ModelPool<H> {
    /// Builds a pool over caller-provided handles.
    ///
    /// # Errors
    ///
    /// Returns `RuntimeError::InvalidConfig` if `handles` is empty.
    pub fn from_handles(handles: Vec<H>, pool: &PoolConfig) -> Result<Self, RuntimeError> {
        Ok(Self {
            state: PoolState::Ready {
                handles: HandlePool::new(handles, pool.acquire_timeout)?,
                info: None,
            },
            metrics: PredictionMetrics::new_shared(),
        })
    }

    /// A pool whose model failed to load; every prediction fails with
    /// `ModelUnavailable`.
    pub fn unavailable(reason: impl Into<String>) -> Self {
        Self {
            state: PoolState::Unavailable {
                reason: reason.into(),
            },
            metrics: PredictionMetrics::new_shared(),
        }
    }

    /// Checks out a handle, scores `input` on the blocking pool, and
    /// returns the handle.
    ///
    /// If the calling future is dropped mid-score, the blocking task still
    /// finishes and the handle goes back to the pool.
    ///
    /// # Errors
    ///
    /// `ModelUnavailable`, `PoolExhausted`, or a scoring failure. Nothing
    /// is retried.
    #[tracing::instrument(skip_all, fields(text_len = input.sentiment_text.len()))]
    pub async fn acquire_and_score(
        &self,
        input: SentimentInput,
    ) -> Result<SentimentOutput, RuntimeError> {
        self.metrics.record_attempt();

        let handles = match &self.state {
            PoolState::Ready { handles, .. } => handles,
            PoolState::Unavailable { reason } => {
                self.metrics.record_unavailable();
                return Err(RuntimeError::ModelUnavailable {
                    reason: reason.clone(),
                });
            }
        };

        let mut handle = handles.acquire().await.inspect_err(|e| match e {
            RuntimeError::PoolExhausted { waited_ms } => {
                self.metrics.record_exhausted();
                warn!(waited_ms, "no scoring handle available");
            }
            _ => self.metrics.record_unavailable(),
        })?;
        debug!(in_use = handles.in_use(), "scoring handle checked out");

        let scored = tokio::task::spawn_blocking(move || handle.score(&input)).await;

        match scored {
            Ok(Ok(output)) => {
                self.metrics.record_success();
                Ok(output)
            }
            Ok(Err(e)) => {
                self.metrics.record_scoring_failure();
                warn!(error = %e, "scoring failed");
                Err(e.into())
            }
            Err(join) => {
                self.metrics.record_scoring_failure();
                warn!(error = %join, "scoring task failed");
                Err(RuntimeError::TaskFailed(join.to_string()))
            }
        }
    }

    /// Metadata of the loaded model, if it was loaded from an artifact.
    pub fn model_info(&self) -> Option<&ModelInfo> {
        match &self.state {
            PoolState::Ready { info, .. } => info.as_ref(),
            PoolState::Unavailable { .. } => None,
        }
    }

    /// Why the model is unavailable, if it is.
    pub fn unavailable_reason(&self) -> Option<&str> {
        match &self.state {
            PoolState::Ready { .. } => None,
            PoolState::Unavailable { reason } => Some(reason),
        }
    }

    /// Free handles right now (0 when unavailable).
    pub fn available_handles(&self) -> usize {
        match &self.state {
            PoolState::Ready { handles, .. } => handles.available(),
            PoolState::Unavailable { .. } => 0,
        }
    }

    /// Stops handing out handles. Waiting and later callers fail with
    /// `PoolClosed`; scoring already running is unaffected.
    pub fn close(&self) {
        if let PoolState::Ready { handles, .. } = &self.state {
            handles.close();
            info!("model pool closed");
        }
    }

    /// Waits for in-flight scoring to finish.
    pub async fn drain(&self) {
        if let PoolState::Ready { handles, .. } = &self.state {
            handles.drain().await;
            info!("model pool drained");
        }
    }
}

#[async_trait]
impl<H: ScoringHandle> Predictor for ModelPool<H> {
    async fn predict(&self, input: SentimentInput) -> Result<SentimentOutput, RuntimeError> {
        self.acquire_and_score(input).await
    }

    fn is_ready(&self) -> bool {
        matches!(self.state, PoolState::Ready { .. })
    }

    fn metrics(&self) -> MetricsSnapshot {
        self.metrics.snapshot()
    }
}
