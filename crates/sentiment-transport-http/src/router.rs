//! Axum router for the prediction service.
//! Routes: `POST /predict`, `GET /health` (liveness), `GET /health/ready`
//! (readiness), `GET /metrics` and `GET /openapi.json`.

use std::sync::Arc;

use axum::{
    body::Bytes,
    extract::State,
    http::StatusCode,
    response::{IntoResponse, Response},
    routing::{get, post},
    Json, Router,
};
use serde_json::json;
use tower_http::trace::TraceLayer;

use sentiment_runtime::Predictor;
use sentiment_types::{PredictError, SentimentInput};

use crate::openapi;

/// Shared state threaded through all axum handlers.
#[derive(Clone)]
pub struct AppState {
    /// Scores parsed inputs.
    pub predictor: Arc<dyn Predictor>,
}

impl AppState {
    /// Wraps a predictor for use as router state.
    pub fn new(predictor: Arc<dyn Predictor>) -> Self {
        Self { predictor }
    }
}

/// Builds the axum `Router` with all service routes.
pub fn build_router(state: AppState) -> Router {
    Router::new()
        .route("/predict", post(handle_predict))
        .route("/health", get(handle_health))
        .route("/health/ready", get(handle_ready))
        .route("/metrics", get(handle_metrics))
        .route("/openapi.json", get(handle_openapi))
        .layer(TraceLayer::new_for_http())
        .with_state(state)
}

async fn handle_health() -> impl IntoResponse {
    Json(json!({"status": "ok", "service": "sentiment"}))
}

/// Readiness probe: `200 OK` only once a model is loaded.
async fn handle_ready(State(state): State<AppState>) -> Response {
    if state.predictor.is_ready() {
        Json(json!({"status": "ready", "service": "sentiment"})).into_response()
    } else {
        (
            StatusCode::SERVICE_UNAVAILABLE,
            Json(json!({"status": "unavailable", "service": "sentiment"})),
        )
            .into_response()
    }
}

async fn handle_metrics(State(state): State<AppState>) -> impl IntoResponse {
    let m = state.predictor.metrics();
    Json(json!({
        "predictions": {
            "total": m.total_predictions,
            "successful": m.successful_predictions,
            "scoring_failures": m.scoring_failures,
            "exhausted": m.exhausted,
            "unavailable": m.unavailable,
        }
    }))
}

async fn handle_openapi() -> impl IntoResponse {
    Json(openapi::document())
}

/// Parses the body, scores it and serializes the prediction.
///
/// The body is read as raw bytes so that any JSON payload is accepted
/// regardless of the declared content type.
async fn handle_predict(State(state): State<AppState>, body: Bytes) -> Response {
    tracing::debug!(bytes = body.len(), "predict request received");

    let input: SentimentInput = match serde_json::from_slice(&body) {
        Ok(input) => input,
        Err(e) => {
            tracing::info!(outcome = "parse_failed", error = %e, "predict request rejected");
            return error_response(PredictError::malformed(format!(
                "request body is not a valid SentimentInput: {e}"
            )));
        }
    };

    let text_len = input.sentiment_text.len();
    match state.predictor.predict(input).await {
        Ok(output) => {
            tracing::info!(
                outcome = "scored",
                text_len,
                prediction = output.prediction,
                probability = output.probability,
                "predict request completed"
            );
            (StatusCode::OK, Json(output)).into_response()
        }
        Err(e) => {
            tracing::warn!(outcome = "score_failed", text_len, error = %e, "predict request failed");
            error_response(PredictError::from(e))
        }
    }
}

/// Renders a domain error as `{"error": {"kind", "message"}}` with the
/// status its kind maps to.
fn error_response(err: PredictError) -> Response {
    let status =
        StatusCode::from_u16(err.kind.http_status()).unwrap_or(StatusCode::INTERNAL_SERVER_ERROR);
    let body = json!({
        "error": { "kind": err.kind.as_str(), "message": err.message }
    });
    (status, Json(body)).into_response()
}
