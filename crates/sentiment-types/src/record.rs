//! Request and response records exchanged with the prediction endpoint.

use serde::{Deserialize, Serialize};

/// One inference request.
///
/// `sentiment` is the training label carried by the wire shape; it is
/// accepted but never consulted when scoring.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct SentimentInput {
    /// Free text to classify. May be empty.
    #[serde(rename = "SentimentText")]
    pub sentiment_text: String,
    /// Training label, ignored at inference time.
    #[serde(rename = "Sentiment", default)]
    pub sentiment: bool,
}

impl SentimentInput {
    /// Creates an input for `text` with the label left at `false`.
    pub fn new(text: impl Into<String>) -> Self {
        Self {
            sentiment_text: text.into(),
            sentiment: false,
        }
    }
}

/// One scored prediction.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct SentimentOutput {
    /// Predicted label (`true` = positive).
    #[serde(rename = "Prediction")]
    pub prediction: bool,
    /// Calibrated probability of the positive label, in `[0, 1]`.
    #[serde(rename = "Probability")]
    pub probability: f32,
    /// Raw uncalibrated score.
    #[serde(rename = "Score")]
    pub score: f32,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn input_uses_wire_field_names() {
        let input: SentimentInput =
            serde_json::from_str(r#"{"SentimentText":"nice","Sentiment":true}"#).expect("parse");
        assert_eq!(input.sentiment_text, "nice");
        assert!(input.sentiment);
    }

    #[test]
    fn input_label_is_optional() {
        let input: SentimentInput =
            serde_json::from_str(r#"{"SentimentText":""}"#).expect("parse");
        assert_eq!(input, SentimentInput::new(""));
    }

    #[test]
    fn input_requires_text() {
        let res = serde_json::from_str::<SentimentInput>(r#"{"foo":1}"#);
        assert!(res.is_err());
    }

    #[test]
    fn input_rejects_wrong_types() {
        assert!(serde_json::from_str::<SentimentInput>(r#"{"SentimentText":42}"#).is_err());
        assert!(serde_json::from_str::<SentimentInput>(
            r#"{"SentimentText":"ok","Sentiment":"yes"}"#
        )
        .is_err());
    }

    #[test]
    fn output_roundtrip() {
        let out = SentimentOutput {
            prediction: true,
            probability: 0.8731,
            score: 1.93,
        };
        let json = serde_json::to_string(&out).expect("serialize");
        assert!(json.contains("\"Prediction\":true"));
        let back: SentimentOutput = serde_json::from_str(&json).expect("deserialize");
        assert_eq!(back.prediction, out.prediction);
        assert!((back.probability - out.probability).abs() < 1e-6);
        assert!((back.score - out.score).abs() < 1e-6);
    }
}
