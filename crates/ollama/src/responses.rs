//! Shaping of raw Ollama replies into tool results.
//!
//! Each function takes the decoded upstream JSON and either returns the
//! result object handed to the MCP client or an [`ErrorEnvelope`] describing
//! why the reply was unusable.

use serde::Serialize;
use serde_json::{json, Map, Value};

use crate::config::OllamaSettings;
use crate::error::{ClientError, ImageError};
use crate::image::SUPPORTED_FORMATS;

/// `{ "error", "message", "details" }` payload of every failed tool call.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ErrorEnvelope {
    pub error: String,
    pub message: String,
    pub details: Value,
}

impl ErrorEnvelope {
    pub fn new(error: impl Into<String>, message: impl Into<String>, details: Value) -> Self {
        Self {
            error: error.into(),
            message: message.into(),
            details,
        }
    }

    pub fn to_value(&self) -> Value {
        json!({
            "error": self.error,
            "message": self.message,
            "details": self.details,
        })
    }
}

/// Which model listing a reply came from; only changes the empty-list hint.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ModelListing {
    Available,
    Running,
}

const PROMPT_SUGGESTIONS: [&str; 3] = [
    "Check if input is appropriate",
    "Try simplifying the prompt",
    "Try a different model",
];

/// Envelope for any failure to get a usable HTTP reply from Ollama.
///
/// `with_suggestions` adds the remediation list used by the POST tools.
pub fn connection_failed(
    settings: &OllamaSettings,
    cause: &ClientError,
    with_suggestions: bool,
) -> ErrorEnvelope {
    let mut details = json!({
        "possible_causes": [
            "Ollama service not running",
            "Service address misconfigured",
            "Network connectivity issues",
        ],
        "configuration": {
            "check": "Please verify the following in config.json:",
            "settings": [
                format!("ollama.host - Currently set to: {}", settings.host),
                format!("ollama.timeout - Currently set to: {} seconds", settings.timeout),
            ],
        },
        "cause": cause.to_string(),
    });
    if with_suggestions {
        details["suggestions"] = json!([
            "Check if Ollama service is running",
            "Verify service address in config.json",
            "Check network connectivity",
            "Try increasing timeout in config.json if network is slow",
        ]);
    }
    ErrorEnvelope::new(
        "connection_failed",
        "Failed to connect to Ollama service",
        details,
    )
}

pub fn invalid_image(source: &str, err: &ImageError) -> ErrorEnvelope {
    ErrorEnvelope::new(
        "invalid_image",
        "Failed to process image input",
        json!({
            "source": source,
            "reason": err.to_string(),
            "supported_formats": SUPPORTED_FORMATS,
        }),
    )
}

/// Validate a `tags` or `ps` reply; the reply itself is the result.
pub fn model_list(response: Value, listing: ModelListing) -> Result<Value, ErrorEnvelope> {
    let object = as_object(&response)?;
    match object.get("models") {
        None => return Err(no_models(listing)),
        Some(Value::Array(models)) if models.is_empty() => return Err(no_models(listing)),
        Some(Value::Array(_)) => {}
        Some(other) => {
            return Err(ErrorEnvelope::new(
                "invalid_models",
                "Invalid models data format",
                json!({
                    "expected_type": "list",
                    "received_type": type_name(other),
                    "response": other.to_string(),
                }),
            ))
        }
    }
    Ok(response)
}

fn no_models(listing: ModelListing) -> ErrorEnvelope {
    let (message, suggestion) = match listing {
        ModelListing::Available => (
            "No models available",
            "Use 'ollama pull' command to download models",
        ),
        ModelListing::Running => (
            "No running models found",
            "Models may need to be loaded first",
        ),
    };
    ErrorEnvelope::new("no_models", message, json!({ "suggestion": suggestion }))
}

/// `{embeddings, metadata: {count, dimension, duration_ms?}}`
pub fn embeddings(response: Value) -> Result<Value, ErrorEnvelope> {
    let object = as_object(&response)?;
    let embeddings = match object.get("embeddings") {
        None | Some(Value::Null) => {
            return Err(ErrorEnvelope::new(
                "missing_embeddings",
                "No embeddings data found in response",
                json!({ "response": response }),
            ))
        }
        Some(Value::Array(list)) if !list.is_empty() => list,
        Some(other) => {
            let received_length = other.as_array().map(Vec::len).unwrap_or(0);
            return Err(ErrorEnvelope::new(
                "invalid_embeddings",
                "Invalid embeddings format",
                json!({
                    "expected_type": "non-empty list",
                    "received_type": type_name(other),
                    "received_length": received_length,
                }),
            ));
        }
    };

    let dimension = embeddings[0].as_array().map(Vec::len).unwrap_or(0);
    let mut metadata = Map::new();
    metadata.insert("count".into(), json!(embeddings.len()));
    metadata.insert("dimension".into(), json!(dimension));
    if let Some(ms) = duration_ms(object) {
        metadata.insert("duration_ms".into(), json!(ms));
    }
    Ok(json!({ "embeddings": embeddings, "metadata": metadata }))
}

/// `{response: {content, role}, metadata: {model, input, performance?}}`
pub fn chat(model: &str, prompt: &str, response: Value) -> Result<Value, ErrorEnvelope> {
    let object = as_object(&response)?;
    let empty = Map::new();
    let message = match object.get("message") {
        None => &empty,
        Some(Value::Object(message)) => message,
        Some(other) => {
            return Err(ErrorEnvelope::new(
                "invalid_message",
                "Invalid message format in response",
                json!({
                    "expected_type": "dict",
                    "received_type": type_name(other),
                    "response": response.to_string(),
                }),
            ))
        }
    };
    let content = match message.get("content") {
        None | Some(Value::Null) => {
            return Err(ErrorEnvelope::new(
                "missing_content",
                "No content found in response message",
                json!({
                    "suggestions": PROMPT_SUGGESTIONS,
                    "response": response.to_string(),
                }),
            ))
        }
        Some(content) => content.clone(),
    };
    let role = message
        .get("role")
        .cloned()
        .unwrap_or_else(|| json!("assistant"));

    let mut metadata = json!({
        "model": model,
        "input": { "role": "user", "content": prompt },
    });
    attach_performance(&mut metadata, object);
    Ok(json!({
        "response": { "content": content, "role": role },
        "metadata": metadata,
    }))
}

/// `{response: {text}, metadata: {model, input, performance?}}`
pub fn generate(model: &str, prompt: &str, response: Value) -> Result<Value, ErrorEnvelope> {
    let object = as_object(&response)?;
    let text = match object.get("response") {
        None | Some(Value::Null) => {
            return Err(ErrorEnvelope::new(
                "missing_response",
                "No response text found in response",
                json!({
                    "suggestions": PROMPT_SUGGESTIONS,
                    "response": response.to_string(),
                }),
            ))
        }
        Some(text) => text.clone(),
    };

    let mut metadata = json!({ "model": model, "input": prompt });
    attach_performance(&mut metadata, object);
    Ok(json!({ "response": { "text": text }, "metadata": metadata }))
}

/// Token and timing statistics present in a chat/generate reply.
pub fn performance(response: &Map<String, Value>) -> Map<String, Value> {
    let mut metrics = Map::new();
    if let Some(ms) = duration_ms(response) {
        metrics.insert("duration_ms".into(), json!(ms));
    }
    if let Some(count) = response.get("prompt_eval_count") {
        metrics.insert("input_tokens".into(), count.clone());
    }
    if let Some(count) = response.get("eval_count") {
        metrics.insert("output_tokens".into(), count.clone());
    }
    let eval_count = response.get("eval_count").and_then(Value::as_f64);
    let eval_duration = response.get("eval_duration").and_then(Value::as_f64);
    if let (Some(count), Some(duration)) = (eval_count, eval_duration) {
        if duration > 0.0 {
            let per_second = count / (duration / 1_000_000_000.0);
            metrics.insert(
                "tokens_per_second".into(),
                json!((per_second * 10.0).round() / 10.0),
            );
        }
    }
    metrics
}

fn attach_performance(metadata: &mut Value, response: &Map<String, Value>) {
    let metrics = performance(response);
    if !metrics.is_empty() {
        metadata["performance"] = Value::Object(metrics);
    }
}

fn duration_ms(response: &Map<String, Value>) -> Option<f64> {
    response
        .get("total_duration")
        .and_then(Value::as_f64)
        .map(|ns| ns / 1_000_000.0)
}

fn as_object(response: &Value) -> Result<&Map<String, Value>, ErrorEnvelope> {
    response.as_object().ok_or_else(|| {
        ErrorEnvelope::new(
            "invalid_response",
            "Invalid response format from Ollama service",
            json!({
                "expected_type": "dict",
                "received_type": type_name(response),
                "response": response.to_string(),
            }),
        )
    })
}

fn type_name(value: &Value) -> &'static str {
    match value {
        Value::Null => "null",
        Value::Bool(_) => "bool",
        Value::Number(_) => "number",
        Value::String(_) => "string",
        Value::Array(_) => "list",
        Value::Object(_) => "dict",
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    #[test]
    fn performance_metrics_from_nanoseconds() {
        let response = json!({
            "total_duration": 5_000_000_000u64,
            "prompt_eval_count": 26,
            "eval_count": 290,
            "eval_duration": 4_709_213_000u64,
        });
        let metrics = performance(response.as_object().expect("object"));
        assert_eq!(
            Value::Object(metrics),
            json!({
                "duration_ms": 5000.0,
                "input_tokens": 26,
                "output_tokens": 290,
                "tokens_per_second": 61.6,
            })
        );
    }

    #[test]
    fn zero_eval_duration_skips_rate() {
        let response = json!({ "eval_count": 3, "eval_duration": 0 });
        let metrics = performance(response.as_object().expect("object"));
        assert!(metrics.get("tokens_per_second").is_none());
        assert_eq!(metrics["output_tokens"], json!(3));
    }

    #[test]
    fn chat_result_shape() {
        let response = json!({
            "model": "llama3",
            "message": { "role": "assistant", "content": "Hello!" },
            "done": true,
            "total_duration": 2_000_000,
        });
        let result = chat("llama3", "hi", response).expect("shaped");
        assert_eq!(
            result,
            json!({
                "response": { "content": "Hello!", "role": "assistant" },
                "metadata": {
                    "model": "llama3",
                    "input": { "role": "user", "content": "hi" },
                    "performance": { "duration_ms": 2.0 },
                },
            })
        );
    }

    #[test]
    fn chat_without_metrics_has_no_performance_block() {
        let response = json!({ "message": { "content": "ok" } });
        let result = chat("m", "p", response).expect("shaped");
        assert_eq!(result["response"]["role"], json!("assistant"));
        assert!(result["metadata"].get("performance").is_none());
    }

    #[test]
    fn chat_errors() {
        let err = chat("m", "p", json!({ "message": "oops" })).expect_err("invalid");
        assert_eq!(err.error, "invalid_message");
        assert_eq!(err.details["received_type"], json!("string"));

        let err = chat("m", "p", json!({ "done": true })).expect_err("missing");
        assert_eq!(err.error, "missing_content");

        let err = chat("m", "p", json!([1, 2])).expect_err("not an object");
        assert_eq!(err.error, "invalid_response");
        assert_eq!(err.details["received_type"], json!("list"));
    }

    #[test]
    fn generate_result_and_error() {
        let result = generate("m", "why?", json!({ "response": "because", "eval_count": 1 }))
            .expect("shaped");
        assert_eq!(result["response"], json!({ "text": "because" }));
        assert_eq!(result["metadata"]["input"], json!("why?"));
        assert_eq!(result["metadata"]["performance"], json!({ "output_tokens": 1 }));

        let err = generate("m", "p", json!({ "response": null })).expect_err("missing");
        assert_eq!(err.error, "missing_response");
        assert_eq!(err.details["suggestions"], json!(PROMPT_SUGGESTIONS));
    }

    #[test]
    fn embeddings_metadata() {
        let response = json!({
            "embeddings": [[0.1, 0.2, 0.3], [0.4, 0.5, 0.6]],
            "total_duration": 14_143_917,
        });
        let result = embeddings(response).expect("shaped");
        assert_eq!(result["metadata"]["count"], json!(2));
        assert_eq!(result["metadata"]["dimension"], json!(3));
        assert_eq!(result["metadata"]["duration_ms"], json!(14.143917));
    }

    #[test]
    fn embeddings_errors() {
        let err = embeddings(json!({ "model": "x" })).expect_err("missing");
        assert_eq!(err.error, "missing_embeddings");
        assert_eq!(err.details["response"], json!({ "model": "x" }));

        let err = embeddings(json!({ "embeddings": [] })).expect_err("empty");
        assert_eq!(err.error, "invalid_embeddings");
        assert_eq!(err.details["received_length"], json!(0));

        let err = embeddings(json!({ "embeddings": "nope" })).expect_err("wrong type");
        assert_eq!(err.details["received_type"], json!("string"));
    }

    #[test]
    fn model_list_validation() {
        let ok = json!({ "models": [{ "name": "llama3:latest" }] });
        assert_eq!(model_list(ok.clone(), ModelListing::Available), Ok(ok));

        let err = model_list(json!({ "models": [] }), ModelListing::Available).expect_err("empty");
        assert_eq!(err.error, "no_models");
        assert_eq!(
            err.details["suggestion"],
            json!("Use 'ollama pull' command to download models")
        );

        let err = model_list(json!({}), ModelListing::Running).expect_err("missing");
        assert_eq!(err.message, "No running models found");

        let err = model_list(json!({ "models": {} }), ModelListing::Running).expect_err("dict");
        assert_eq!(err.error, "invalid_models");
    }

    #[test]
    fn connection_failure_envelope() {
        let settings = OllamaSettings::default();
        let cause = ClientError::UnknownEndpoint {
            method: "GET",
            name: "tags".to_string(),
        };

        let get = connection_failed(&settings, &cause, false);
        assert_eq!(get.error, "connection_failed");
        assert_eq!(
            get.details["configuration"]["settings"],
            json!([
                "ollama.host - Currently set to: http://localhost:11434",
                "ollama.timeout - Currently set to: 30 seconds",
            ])
        );
        assert!(get.details.get("suggestions").is_none());

        let post = connection_failed(&settings, &cause, true);
        assert_eq!(post.details["suggestions"].as_array().map(Vec::len), Some(4));
        assert_eq!(post.to_value()["error"], json!("connection_failed"));
    }
}
