//! Integration tests for the HTTP router (predict, health, metrics).

use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::Arc;

use async_trait::async_trait;
use axum::body::Body;
use http::Request;
use serde_json::Value;
use tower::ServiceExt;

use sentiment_runtime::{MetricsSnapshot, ModelPool, ModelPoolConfig, Predictor, RuntimeError};
use sentiment_transport_http::{build_router, AppState};
use sentiment_types::{SentimentInput, SentimentOutput};

/// What the mock predictor answers with.
#[derive(Clone, Copy)]
enum Behaviour {
    Succeed,
    Unavailable,
    ScoringFails,
    Exhausted,
}

/// Predictor that counts calls and answers with a fixed behaviour.
struct CountingPredictor {
    calls: AtomicUsize,
    behaviour: Behaviour,
}

impl CountingPredictor {
    fn new(behaviour: Behaviour) -> Arc<Self> {
        Arc::new(Self {
            calls: AtomicUsize::new(0),
            behaviour,
        })
    }

    fn calls(&self) -> usize {
        self.calls.load(Ordering::SeqCst)
    }
}

#[async_trait]
impl Predictor for CountingPredictor {
    async fn predict(&self, input: SentimentInput) -> Result<SentimentOutput, RuntimeError> {
        self.calls.fetch_add(1, Ordering::SeqCst);
        match self.behaviour {
            Behaviour::Succeed => Ok(SentimentOutput {
                prediction: !input.sentiment_text.is_empty(),
                probability: 0.75,
                score: 1.25,
            }),
            Behaviour::Unavailable => Err(RuntimeError::ModelUnavailable {
                reason: "artifact at /opt/models/x.zip is corrupt".into(),
            }),
            Behaviour::ScoringFails => Err(RuntimeError::TaskFailed("worker panicked".into())),
            Behaviour::Exhausted => Err(RuntimeError::PoolExhausted { waited_ms: 25 }),
        }
    }

    fn is_ready(&self) -> bool {
        !matches!(self.behaviour, Behaviour::Unavailable)
    }

    fn metrics(&self) -> MetricsSnapshot {
        MetricsSnapshot {
            total_predictions: self.calls() as u64,
            ..MetricsSnapshot::default()
        }
    }
}

fn post_predict(body: &str) -> Request<Body> {
    Request::builder()
        .method("POST")
        .uri("/predict")
        .header("content-type", "application/json")
        .body(Body::from(body.to_string()))
        .expect("req")
}

fn get(uri: &str) -> Request<Body> {
    Request::builder().uri(uri).body(Body::empty()).expect("req")
}

async fn json_body(resp: axum::response::Response) -> Value {
    let bytes = axum::body::to_bytes(resp.into_body(), 64 * 1024)
        .await
        .expect("body");
    serde_json::from_slice(&bytes).expect("json")
}

#[tokio::test]
async fn health_returns_ok() {
    let app = build_router(AppState::new(CountingPredictor::new(Behaviour::Succeed)));
    let resp = app.oneshot(get("/health")).await.expect("resp");
    assert_eq!(resp.status(), 200);
}

#[tokio::test]
async fn ready_reflects_predictor() {
    let app = build_router(AppState::new(CountingPredictor::new(Behaviour::Succeed)));
    let resp = app.oneshot(get("/health/ready")).await.expect("resp");
    assert_eq!(resp.status(), 200);
    assert_eq!(json_body(resp).await["status"], "ready");

    let app = build_router(AppState::new(CountingPredictor::new(Behaviour::Unavailable)));
    let resp = app.oneshot(get("/health/ready")).await.expect("resp");
    assert_eq!(resp.status(), 503);
}

#[tokio::test]
async fn predict_returns_output_fields() {
    let mock = CountingPredictor::new(Behaviour::Succeed);
    let app = build_router(AppState::new(mock.clone()));
    let resp = app
        .oneshot(post_predict(
            r#"{"SentimentText":"This was a great experience","Sentiment":false}"#,
        ))
        .await
        .expect("resp");
    assert_eq!(resp.status(), 200);
    let body = json_body(resp).await;
    assert_eq!(body["Prediction"], true);
    assert_eq!(body["Probability"], 0.75);
    assert_eq!(body["Score"], 1.25);
    assert_eq!(mock.calls(), 1);
}

#[tokio::test]
async fn malformed_bodies_are_rejected_without_scoring() {
    let mock = CountingPredictor::new(Behaviour::Succeed);
    let app = build_router(AppState::new(mock.clone()));

    for body in [
        "not json",
        "",
        r#"{"foo":1}"#,
        r#"{"SentimentText":42}"#,
        r#"{"SentimentText":"ok","Sentiment":"yes"}"#,
        r#"{"SentimentText":null}"#,
        r#""just a string""#,
    ] {
        let resp = app.clone().oneshot(post_predict(body)).await.expect("resp");
        assert_eq!(resp.status(), 400, "body {body:?}");
        let json = json_body(resp).await;
        assert_eq!(json["error"]["kind"], "malformed_request");
        assert!(json["error"]["message"].is_string());
    }
    assert_eq!(mock.calls(), 0);
}

#[tokio::test]
async fn label_field_is_optional() {
    let mock = CountingPredictor::new(Behaviour::Succeed);
    let app = build_router(AppState::new(mock.clone()));
    let resp = app
        .oneshot(post_predict(r#"{"SentimentText":""}"#))
        .await
        .expect("resp");
    assert_eq!(resp.status(), 200);
    assert_eq!(json_body(resp).await["Prediction"], false);
}

#[tokio::test]
async fn missing_content_type_still_parses() {
    let app = build_router(AppState::new(CountingPredictor::new(Behaviour::Succeed)));
    let req = Request::builder()
        .method("POST")
        .uri("/predict")
        .body(Body::from(r#"{"SentimentText":"fine"}"#))
        .expect("req");
    let resp = app.oneshot(req).await.expect("resp");
    assert_eq!(resp.status(), 200);
}

#[tokio::test]
async fn unavailable_model_is_503_without_detail() {
    let app = build_router(AppState::new(CountingPredictor::new(Behaviour::Unavailable)));
    let resp = app
        .oneshot(post_predict(r#"{"SentimentText":"hi"}"#))
        .await
        .expect("resp");
    assert_eq!(resp.status(), 503);
    let json = json_body(resp).await;
    assert_eq!(json["error"]["kind"], "model_unavailable");
    assert!(!json.to_string().contains("/opt/models"));
}

#[tokio::test]
async fn scoring_failure_is_500() {
    let mock = CountingPredictor::new(Behaviour::ScoringFails);
    let app = build_router(AppState::new(mock.clone()));
    let resp = app
        .oneshot(post_predict(r#"{"SentimentText":"hi"}"#))
        .await
        .expect("resp");
    assert_eq!(resp.status(), 500);
    assert_eq!(json_body(resp).await["error"]["kind"], "scoring_error");
    assert_eq!(mock.calls(), 1);
}

#[tokio::test]
async fn exhausted_pool_is_503() {
    let app = build_router(AppState::new(CountingPredictor::new(Behaviour::Exhausted)));
    let resp = app
        .oneshot(post_predict(r#"{"SentimentText":"hi"}"#))
        .await
        .expect("resp");
    assert_eq!(resp.status(), 503);
    assert_eq!(json_body(resp).await["error"]["kind"], "resource_exhausted");
}

#[tokio::test]
async fn get_on_predict_is_not_allowed() {
    let app = build_router(AppState::new(CountingPredictor::new(Behaviour::Succeed)));
    let resp = app.oneshot(get("/predict")).await.expect("resp");
    assert_eq!(resp.status(), 405);
}

#[tokio::test]
async fn openapi_document_is_served() {
    let app = build_router(AppState::new(CountingPredictor::new(Behaviour::Succeed)));
    let resp = app.oneshot(get("/openapi.json")).await.expect("resp");
    assert_eq!(resp.status(), 200);
    let doc = json_body(resp).await;
    assert!(doc["paths"]["/predict"]["post"].is_object());
}

#[tokio::test]
async fn bundled_model_end_to_end() {
    let dir = tempfile::tempdir().expect("tempdir");
    let model = concat!(env!("CARGO_MANIFEST_DIR"), "/../../models/sentiment_model.json");
    let mut config = ModelPoolConfig::new(model);
    config.cache_dir = dir.path().to_path_buf();
    config.pool.size = 2;
    let pool = Arc::new(ModelPool::load(&config).await.expect("pool"));
    let app = build_router(AppState::new(pool.clone()));

    let resp = app
        .clone()
        .oneshot(post_predict(
            r#"{"SentimentText":"This was a great experience","Sentiment":false}"#,
        ))
        .await
        .expect("resp");
    assert_eq!(resp.status(), 200);
    let body = json_body(resp).await;
    assert_eq!(body["Prediction"], true);
    let p = body["Probability"].as_f64().expect("probability");
    assert!((0.0..=1.0).contains(&p));
    assert!(body["Score"].as_f64().expect("score").is_finite());

    let resp = app.oneshot(get("/metrics")).await.expect("resp");
    let metrics = json_body(resp).await;
    assert_eq!(metrics["predictions"]["successful"], 1);
    assert_eq!(pool.metrics().total_predictions, 1);
}

#[tokio::test]
async fn unloaded_pool_answers_503() {
    let pool: Arc<ModelPool> = Arc::new(ModelPool::unavailable("no artifact"));
    let app = build_router(AppState::new(pool));
    let resp = app
        .clone()
        .oneshot(post_predict(r#"{"SentimentText":"hi"}"#))
        .await
        .expect("resp");
    assert_eq!(resp.status(), 503);
    let resp = app.oneshot(get("/health/ready")).await.expect("resp");
    assert_eq!(resp.status(), 503);
}
