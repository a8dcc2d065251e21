//! Chat-completions shape (OpenAI and OpenAI-compatible servers)
//!
//! LlamaStack exposes the same API, so both descriptors share the payload
//! builder and response extractors.

use super::{AuthStyle, ProviderDescriptor};
use serde_json::{json, Value};

/// System message sent ahead of every prompt
pub const SYSTEM_PROMPT: &str = "You are a precise assistant. \
    When asked for JSON, reply with a single JSON object and nothing else.";

/// OpenAI chat completions
pub const OPENAI: ProviderDescriptor = ProviderDescriptor {
    name: "openai",
    endpoint: "/chat/completions",
    models_endpoint: "/models",
    auth: AuthStyle::Bearer,
    build_payload: build_chat_payload,
    extract_text: extract_chat_text,
    extract_models: extract_openai_models,
};

/// LlamaStack's OpenAI-compatible endpoint
pub const LLAMASTACK: ProviderDescriptor = ProviderDescriptor {
    name: "llamastack",
    ..OPENAI
};

fn build_chat_payload(model: &str, prompt: &str) -> Value {
    json!({
        "model": model,
        "messages": [
            { "role": "system", "content": SYSTEM_PROMPT },
            { "role": "user", "content": prompt },
        ],
        "temperature": 0.0,
    })
}

fn extract_chat_text(body: &Value) -> Option<String> {
    body.pointer("/choices/0/message/content")
        .and_then(Value::as_str)
        .map(str::to_string)
}

/// Model listing shared by every OpenAI-compatible server.
///
/// LlamaStack tags entries with `model_type` and names them `identifier`;
/// when any entry is tagged only `llm` entries are kept.
pub(crate) fn extract_openai_models(body: &Value) -> Vec<String> {
    let Some(entries) = body.get("data").and_then(Value::as_array) else {
        return Vec::new();
    };

    let typed = entries.iter().any(|m| m.get("model_type").is_some());

    entries
        .iter()
        .filter(|m| !typed || m.get("model_type").and_then(Value::as_str) == Some("llm"))
        .filter_map(|m| {
            m.get("identifier")
                .or_else(|| m.get("id"))
                .and_then(Value::as_str)
                .map(str::to_string)
        })
        .collect()
}
