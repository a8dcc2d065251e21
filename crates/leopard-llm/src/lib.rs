//! Leopard LLM - resilient LLM client
//!
//! This crate provides the model layer of the leopard crossing pipeline:
//! - Providers: registry of request shapes (OpenAI, LlamaStack, vLLM, Ollama, Gemini)
//! - Transport: HTTP transport trait with a reqwest implementation and a scripted mock
//! - Retry: bounded fixed-delay retry policy
//! - Extract: JSON extraction from free-form model output
//! - Client: `LlmClient`, tying the above together behind the `LlmProvider` trait

#![forbid(unsafe_code)]
#![warn(missing_docs)]

pub mod client;
pub mod config;
pub mod error;
pub mod extract;
pub mod providers;
pub mod retry;
pub mod transport;
pub mod util;

pub use client::{
    InferenceResult, LlmClient, LlmProvider, RETRIES_EXHAUSTED_ERROR, UNEXPECTED_RESPONSE_ERROR,
};
pub use config::ProviderConfig;
pub use error::{Error, Result};
pub use extract::{extract_json, try_extract_json, INVALID_JSON_ERROR};
pub use providers::{build_request, AuthStyle, PreparedRequest, ProviderDescriptor, PROVIDERS};
pub use retry::RetryPolicy;
pub use transport::{HttpTransport, MockTransport, Transport};
