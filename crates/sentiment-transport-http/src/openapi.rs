//! Static OpenAPI 3 description served at `GET /openapi.json`.

use serde_json::{json, Value};

/// Returns the OpenAPI document for the service.
pub fn document() -> Value {
    json!({
        "openapi": "3.0.3",
        "info": {
            "title": "Sentiment prediction service",
            "version": env!("CARGO_PKG_VERSION"),
            "description": "Scores short texts with a pre-trained binary sentiment model."
        },
        "paths": {
            "/predict": {
                "post": {
                    "summary": "Predict the sentiment of one text",
                    "operationId": "predict",
                    "requestBody": {
                        "required": true,
                        "content": {
                            "application/json": {
                                "schema": { "$ref": "#/components/schemas/SentimentInput" }
                            }
                        }
                    },
                    "responses": {
                        "200": json_response("Prediction", "SentimentOutput"),
                        "400": json_response("Body is not a valid SentimentInput", "Error"),
                        "500": json_response("Model failed to score the input", "Error"),
                        "503": json_response("Model not loaded or all scoring handles busy", "Error")
                    }
                }
            },
            "/health": {
                "get": {
                    "summary": "Liveness probe",
                    "responses": { "200": { "description": "Process is up" } }
                }
            },
            "/health/ready": {
                "get": {
                    "summary": "Readiness probe",
                    "responses": {
                        "200": { "description": "Model loaded" },
                        "503": { "description": "Model not loaded" }
                    }
                }
            },
            "/metrics": {
                "get": {
                    "summary": "Prediction counters",
                    "responses": { "200": { "description": "Counter snapshot" } }
                }
            }
        },
        "components": {
            "schemas": {
                "SentimentInput": {
                    "type": "object",
                    "required": ["SentimentText"],
                    "properties": {
                        "SentimentText": { "type": "string" },
                        "Sentiment": {
                            "type": "boolean",
                            "description": "Training label; accepted and ignored."
                        }
                    }
                },
                "SentimentOutput": {
                    "type": "object",
                    "required": ["Prediction", "Probability", "Score"],
                    "properties": {
                        "Prediction": { "type": "boolean" },
                        "Probability": { "type": "number", "format": "float", "minimum": 0, "maximum": 1 },
                        "Score": { "type": "number", "format": "float" }
                    }
                },
                "Error": {
                    "type": "object",
                    "required": ["error"],
                    "properties": {
                        "error": {
                            "type": "object",
                            "required": ["kind", "message"],
                            "properties": {
                                "kind": {
                                    "type": "string",
                                    "enum": [
                                        "malformed_request",
                                        "model_unavailable",
                                        "scoring_error",
                                        "resource_exhausted"
                                    ]
                                },
                                "message": { "type": "string" }
                            }
                        }
                    }
                }
            }
        }
    })
}

fn json_response(description: &str, schema: &str) -> Value {
    json!({
        "description": description,
        "content": {
            "application/json": {
                "schema": { "$ref": format!("#/components/schemas/{schema}") }
            }
        }
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn every_schema_reference_resolves() {
        let doc = document();
        let text = doc.to_string();
        for name in ["SentimentInput", "SentimentOutput", "Error"] {
            assert!(text.contains(&format!("#/components/schemas/{name}")));
            assert!(doc["components"]["schemas"][name].is_object());
        }
    }

    #[test]
    fn predict_lists_all_statuses() {
        let doc = document();
        let responses = &doc["paths"]["/predict"]["post"]["responses"];
        for code in ["200", "400", "500", "503"] {
            assert!(responses[code].is_object(), "missing {code}");
        }
    }
}
