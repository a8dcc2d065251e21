//! Google Gemini `generateContent`

use super::{AuthStyle, ProviderDescriptor};
use serde_json::{json, Value};

/// Gemini `/models/{model}:generateContent`
pub const GEMINI: ProviderDescriptor = ProviderDescriptor {
    name: "gemini",
    endpoint: "/models/{model}:generateContent",
    models_endpoint: "/models",
    auth: AuthStyle::GoogleApiKey,
    build_payload: build_content_payload,
    extract_text: extract_candidate_text,
    extract_models: extract_gemini_models,
};

fn build_content_payload(_model: &str, prompt: &str) -> Value {
    json!({
        "contents": [
            { "role": "user", "parts": [{ "text": prompt }] }
        ],
        "generationConfig": { "temperature": 0.0 },
    })
}

/// Concatenates the text parts of the first candidate
fn extract_candidate_text(body: &Value) -> Option<String> {
    let parts = body
        .pointer("/candidates/0/content/parts")
        .and_then(Value::as_array)?;

    let text: String = parts
        .iter()
        .filter_map(|p| p.get("text").and_then(Value::as_str))
        .collect();

    if text.is_empty() {
        None
    } else {
        Some(text)
    }
}

fn extract_gemini_models(body: &Value) -> Vec<String> {
    body.get("models")
        .and_then(Value::as_array)
        .map(|models| {
            models
                .iter()
                .filter_map(|m| m.get("name").and_then(Value::as_str))
                .map(|name| name.trim_start_matches("models/").to_string())
                .collect()
        })
        .unwrap_or_default()
}
