//! Error types for leopard-llm

use thiserror::Error;

/// LLM error type
#[derive(Debug, Error)]
pub enum Error {
    /// Provider identifier is not in the registry
    #[error("unknown provider: {0}")]
    UnknownProvider(String),

    /// Provider not configured (missing base URL, model, ...)
    #[error("provider not configured: {0}")]
    NotConfigured(String),

    /// Network error (connection refused, DNS, reset)
    #[error("network error: {0}")]
    Network(String),

    /// Timeout
    #[error("timeout after {0}ms")]
    Timeout(u64),

    /// Non-2xx HTTP status
    #[error("api error (status {status}): {message}")]
    Api {
        /// HTTP status code
        status: u16,
        /// Sanitized error message
        message: String,
    },

    /// Invalid response
    #[error("invalid response: {0}")]
    InvalidResponse(String),

    /// Every attempt of the retry policy failed
    #[error("request failed after {attempts} attempts: {last_error}")]
    RetriesExhausted {
        /// Number of attempts performed
        attempts: u32,
        /// Message of the final failure
        last_error: String,
    },
}

impl Error {
    /// Whether the failure happened at the transport level and may succeed on retry
    #[must_use]
    pub fn is_retryable(&self) -> bool {
        matches!(
            self,
            Error::Network(_) | Error::Timeout(_) | Error::Api { .. }
        )
    }
}

/// Result type alias
pub type Result<T> = std::result::Result<T, Error>;
