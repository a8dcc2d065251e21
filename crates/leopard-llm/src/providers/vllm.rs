//! Completions shape (vLLM and other text-completion servers)

use super::openai::extract_openai_models;
use super::{AuthStyle, ProviderDescriptor};
use serde_json::{json, Value};

/// Maximum tokens requested from completion-style servers
const MAX_TOKENS: u32 = 1024;

/// vLLM `/completions`
pub const VLLM: ProviderDescriptor = ProviderDescriptor {
    name: "vllm",
    endpoint: "/completions",
    models_endpoint: "/models",
    auth: AuthStyle::Bearer,
    build_payload: build_completion_payload,
    extract_text: extract_completion_text,
    extract_models: extract_openai_models,
};

fn build_completion_payload(model: &str, prompt: &str) -> Value {
    json!({
        "model": model,
        "prompt": prompt,
        "max_tokens": MAX_TOKENS,
        "temperature": 0.0,
    })
}

fn extract_completion_text(body: &Value) -> Option<String> {
    body.pointer("/choices/0/text")
        .and_then(Value::as_str)
        .map(str::to_string)
}
