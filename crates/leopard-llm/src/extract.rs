//! JSON extraction from free-form model output
//!
//! Models wrap JSON in prose or markdown fences more often than not. The
//! extractor accepts, in order:
//! 1. the whole (trimmed) text as JSON
//! 2. the contents of the first fenced block labeled `json`
//!
//! Trying the direct parse first keeps extraction idempotent on text that is
//! already valid JSON, even when that JSON is a string containing a fence.

use regex::Regex;
use serde_json::{json, Value};
use std::sync::LazyLock;
use tracing::debug;

/// Error message returned when no JSON could be recovered
pub const INVALID_JSON_ERROR: &str = "Invalid JSON received from LLM";

static FENCED_JSON: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"(?is)```\s*json\s*\n?(.*?)```").expect("FENCED_JSON is a compile-time constant")
});

/// Recover a JSON value from model output, or `None` if there is none
#[must_use]
pub fn try_extract_json(text: &str) -> Option<Value> {
    if let Ok(value) = serde_json::from_str::<Value>(text.trim()) {
        return Some(value);
    }

    let fenced = FENCED_JSON.captures(text)?.get(1)?.as_str().trim();
    match serde_json::from_str::<Value>(fenced) {
        Ok(value) => Some(value),
        Err(e) => {
            debug!(error = %e, "Fenced JSON block did not parse");
            None
        }
    }
}

/// Recover a JSON value from model output.
///
/// Never fails: unparseable text yields `{"error": "Invalid JSON received from LLM"}`.
#[must_use]
pub fn extract_json(text: &str) -> Value {
    try_extract_json(text).unwrap_or_else(|| json!({ "error": INVALID_JSON_ERROR }))
}
