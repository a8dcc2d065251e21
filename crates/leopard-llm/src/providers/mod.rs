//! Provider registry
//!
//! Every supported backend is described by an immutable
//! [`ProviderDescriptor`]: the endpoint suffix, how to build the payload,
//! how to pull the generated text back out of the response, and how to
//! authenticate. The client looks descriptors up by name; adding a provider
//! means adding a descriptor to [`PROVIDERS`], nothing else.
//!
//! # Module Structure
//!
//! - `openai`: chat-completions shape (OpenAI, LlamaStack)
//! - `vllm`: completions shape with a bare prompt
//! - `ollama`: Ollama generate endpoint
//! - `gemini`: Google `generateContent`

mod gemini;
mod ollama;
mod openai;
mod vllm;


use crate::config::ProviderConfig;
use crate::error::{Error, Result};
use serde_json::Value;
use std::fmt;

pub use gemini::GEMINI;
pub use ollama::OLLAMA;
pub use openai::{LLAMASTACK, OPENAI, SYSTEM_PROMPT};
pub use vllm::VLLM;

/// All registered providers
pub static PROVIDERS: &[ProviderDescriptor] = &[OPENAI, LLAMASTACK, VLLM, OLLAMA, GEMINI];

/// How the API key is attached to a request
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum AuthStyle {
    /// `Authorization: Bearer <key>`
    Bearer,
    /// `x-goog-api-key: <key>`
    GoogleApiKey,
}

/// Immutable description of one provider's request/response shape
#[derive(Clone, Copy)]
pub struct ProviderDescriptor {
    /// Provider identifier used in configuration
    pub name: &'static str,
    /// Endpoint suffix appended to the base URL; `{model}` is substituted
    pub endpoint: &'static str,
    /// Suffix of the model listing endpoint
    pub models_endpoint: &'static str,
    /// How the API key is sent
    pub auth: AuthStyle,
    /// Builds the JSON payload from `(model, prompt)`
    pub build_payload: fn(&str, &str) -> Value,
    /// Pulls the generated text out of a response body
    pub extract_text: fn(&Value) -> Option<String>,
    /// Pulls model identifiers out of a model listing body
    pub extract_models: fn(&Value) -> Vec<String>,
}

impl fmt::Debug for ProviderDescriptor {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ProviderDescriptor")
            .field("name", &self.name)
            .field("endpoint", &self.endpoint)
            .field("models_endpoint", &self.models_endpoint)
            .field("auth", &self.auth)
            .finish()
    }
}

impl ProviderDescriptor {
    /// Full inference URL for a base URL and model
    #[must_use]
    pub fn endpoint_url(&self, base_url: &str, model: &str) -> String {
        format!(
            "{}{}",
            base_url.trim().trim_end_matches('/'),
            self.endpoint.replace("{model}", model)
        )
    }

    /// Full model listing URL for a base URL
    #[must_use]
    pub fn models_url(&self, base_url: &str) -> String {
        format!(
            "{}{}",
            base_url.trim().trim_end_matches('/'),
            self.models_endpoint
        )
    }

    /// Authentication headers; empty when no key is configured
    #[must_use]
    pub fn auth_headers(&self, api_key: Option<&str>) -> Vec<(String, String)> {
        let Some(key) = api_key.filter(|k| !k.trim().is_empty()) else {
            return Vec::new();
        };
        match self.auth {
            AuthStyle::Bearer => vec![("Authorization".to_string(), format!("Bearer {}", key))],
            AuthStyle::GoogleApiKey => vec![("x-goog-api-key".to_string(), key.to_string())],
        }
    }

    /// Build the request for one prompt
    #[must_use]
    pub fn prepare(&self, config: &ProviderConfig, prompt: &str) -> PreparedRequest {
        PreparedRequest {
            url: self.endpoint_url(&config.base_url, &config.model),
            headers: self.auth_headers(config.api_key.as_deref()),
            payload: (self.build_payload)(&config.model, prompt),
        }
    }
}

/// A fully shaped request, ready for a [`crate::Transport`]
#[derive(Clone, PartialEq)]
pub struct PreparedRequest {
    /// Target URL
    pub url: String,
    /// Extra headers (authentication)
    pub headers: Vec<(String, String)>,
    /// JSON body
    pub payload: Value,
}

impl fmt::Debug for PreparedRequest {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let header_names: Vec<&str> = self.headers.iter().map(|(k, _)| k.as_str()).collect();
        f.debug_struct("PreparedRequest")
            .field("url", &self.url)
            .field("headers", &header_names)
            .field("payload", &self.payload)
            .finish()
    }
}

impl PreparedRequest {
    /// Value of a header (case-insensitive name)
    #[must_use]
    pub fn header(&self, name: &str) -> Option<&str> {
        self.headers
            .iter()
            .find(|(k, _)| k.eq_ignore_ascii_case(name))
            .map(|(_, v)| v.as_str())
    }

    /// Bearer token, if the request carries one
    #[must_use]
    pub fn bearer_token(&self) -> Option<&str> {
        self.header("authorization")
            .and_then(|v| v.strip_prefix("Bearer "))
    }
}

/// Look up a provider by identifier (case-insensitive)
#[must_use]
pub fn lookup(name: &str) -> Option<&'static ProviderDescriptor> {
    let name = name.trim();
    PROVIDERS.iter().find(|p| p.name.eq_ignore_ascii_case(name))
}

/// Identifiers of all registered providers
#[must_use]
pub fn names() -> Vec<&'static str> {
    PROVIDERS.iter().map(|p| p.name).collect()
}

/// Build the request `config` would send for `prompt`
///
/// # Errors
/// Returns [`Error::UnknownProvider`] if `config.provider` is not registered
pub fn build_request(config: &ProviderConfig, prompt: &str) -> Result<PreparedRequest> {
    let descriptor =
        lookup(&config.provider).ok_or_else(|| Error::UnknownProvider(config.provider.clone()))?;
    Ok(descriptor.prepare(config, prompt))
}
