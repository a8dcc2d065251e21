//! Ollama generate endpoint
//!
//! Base URL is the Ollama root (default `http://localhost:11434`), not a
//! `/v1` prefix.

use super::{AuthStyle, ProviderDescriptor};
use serde_json::{json, Value};

/// Ollama `/api/generate`
pub const OLLAMA: ProviderDescriptor = ProviderDescriptor {
    name: "ollama",
    endpoint: "/api/generate",
    models_endpoint: "/api/tags",
    auth: AuthStyle::Bearer,
    build_payload: build_generate_payload,
    extract_text: extract_generate_text,
    extract_models: extract_tag_models,
};

fn build_generate_payload(model: &str, prompt: &str) -> Value {
    json!({
        "model": model,
        "prompt": prompt,
        "stream": false,
    })
}

fn extract_generate_text(body: &Value) -> Option<String> {
    body.get("response")
        .and_then(Value::as_str)
        .map(str::to_string)
}

fn extract_tag_models(body: &Value) -> Vec<String> {
    body.get("models")
        .and_then(Value::as_array)
        .map(|models| {
            models
                .iter()
                .filter_map(|m| m.get("name").and_then(Value::as_str))
                .map(str::to_string)
                .collect()
        })
        .unwrap_or_default()
}
