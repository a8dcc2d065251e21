//! Common utilities for the LLM client
//!
//! Key masking and error-body redaction, so provider credentials stay out of
//! logs and HTTP responses.

/// Keys this short are hidden entirely
const SHORT_KEY_LEN: usize = 8;

/// Characters kept visible at each end of a longer key
const VISIBLE_EDGE: usize = 4;

/// Words that mark an upstream error body as possibly echoing credentials
const CREDENTIAL_MARKERS: &[&str] = &[
    "api_key",
    "api-key",
    "apikey",
    "authorization",
    "bearer",
    "token",
    "secret",
    "password",
    "credential",
];

/// Replacement text for error bodies that mention credentials
const REDACTED_ERROR: &str = "An API error occurred. Please try again.";

/// Render a provider key for `Debug` output and log fields
///
/// ```
/// use leopard_llm::util::mask_api_key;
/// assert_eq!(mask_api_key("sk-1234567890abcdef"), "sk-1...cdef");
/// assert_eq!(mask_api_key("short"), "****");
/// ```
#[must_use]
pub fn mask_api_key(key: &str) -> String {
    if key.len() <= SHORT_KEY_LEN || !key.is_ascii() {
        return "****".to_string();
    }
    format!("{}...{}", &key[..VISIBLE_EDGE], &key[key.len() - VISIBLE_EDGE..])
}

/// Error body from an inference service, safe to put in `Error::Api`
///
/// Bodies mentioning a credential are replaced wholesale; the rest pass
/// through.
///
/// ```
/// use leopard_llm::util::redact_error_body;
/// assert_eq!(
///     redact_error_body("Invalid api_key provided"),
///     "An API error occurred. Please try again."
/// );
/// assert_eq!(redact_error_body("model not loaded"), "model not loaded");
/// ```
#[must_use]
pub fn redact_error_body(body: &str) -> String {
    let lower = body.to_lowercase();
    if CREDENTIAL_MARKERS.iter().any(|marker| lower.contains(marker)) {
        return REDACTED_ERROR.to_string();
    }
    body.to_string()
}

/// Truncate a string to at most `max_chars` characters on a char boundary
#[must_use]
pub fn truncate_safe(s: &str, max_chars: usize) -> &str {
    match s.char_indices().nth(max_chars) {
        Some((idx, _)) => &s[..idx],
        None => s,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_mask_api_key_long() {
        let key = "sk-1234567890abcdefghij";
        let masked = mask_api_key(key);
        assert_eq!(masked, "sk-1...ghij");
        assert!(!masked.contains("567890"));
    }

    #[test]
    fn test_mask_api_key_short() {
        assert_eq!(mask_api_key("short"), "****");
        assert_eq!(mask_api_key("12345678"), "****");
        assert_eq!(mask_api_key(""), "****");
    }

    #[test]
    fn test_redact_error_body_with_bearer() {
        assert_eq!(redact_error_body("Bearer token expired"), REDACTED_ERROR);
    }

    #[test]
    fn test_redact_error_body_passes_plain_text() {
        let body = "{\"detail\": \"model not loaded\"}";
        assert_eq!(redact_error_body(body), body);
    }

    #[test]
    fn test_truncate_safe() {
        assert_eq!(truncate_safe("hello world", 5), "hello");
        assert_eq!(truncate_safe("héllo", 2), "hé");
        assert_eq!(truncate_safe("abc", 10), "abc");
    }
}
