//! LLM client
//!
//! [`LlmClient`] resolves its provider descriptor once at construction and
//! then runs every prompt through the same path:
//! prepare request → retry policy → transport → text extraction → JSON
//! extraction.

use crate::config::ProviderConfig;
use crate::error::{Error, Result};
use crate::extract::{try_extract_json, INVALID_JSON_ERROR};
use crate::providers::{self, PreparedRequest, ProviderDescriptor};
use crate::retry::RetryPolicy;
use crate::transport::{HttpTransport, Transport};
use crate::util::truncate_safe;
use serde_json::{json, Value};
use std::sync::Arc;
use tracing::{debug, error, info, instrument, warn};

/// Error reported once the retry policy gave up
pub const RETRIES_EXHAUSTED_ERROR: &str = "LLM API request failed after retries";

/// Error reported when the response does not have the provider's shape
pub const UNEXPECTED_RESPONSE_ERROR: &str = "Unexpected response format from LLM";

/// Outcome of [`LlmProvider::infer`]: a parsed JSON value or an error
/// descriptor, never anything in between
#[derive(Debug, Clone, PartialEq)]
pub enum InferenceResult {
    /// Parsed model output
    Json(Value),
    /// Why no JSON could be produced
    Error(String),
}

impl InferenceResult {
    /// Whether this is an error descriptor
    #[must_use]
    pub fn is_error(&self) -> bool {
        matches!(self, Self::Error(_))
    }

    /// The parsed value, if any
    #[must_use]
    pub fn as_json(&self) -> Option<&Value> {
        match self {
            Self::Json(value) => Some(value),
            Self::Error(_) => None,
        }
    }

    /// JSON form: the value itself, or `{"error": message}`
    #[must_use]
    pub fn into_value(self) -> Value {
        match self {
            Self::Json(value) => value,
            Self::Error(message) => json!({ "error": message }),
        }
    }
}

impl From<InferenceResult> for Value {
    fn from(result: InferenceResult) -> Self {
        result.into_value()
    }
}

/// Trait for language model backends used by the pipeline
#[async_trait::async_trait]
pub trait LlmProvider: Send + Sync {
    /// Provider identifier
    fn name(&self) -> &str;

    /// Model name
    fn model(&self) -> &str;

    /// Base URL of the inference service
    fn base_url(&self) -> &str;

    /// Raw model text for a prompt
    async fn complete(&self, prompt: &str) -> Result<String>;

    /// Model output parsed as JSON. Never fails; errors become
    /// [`InferenceResult::Error`].
    async fn infer(&self, prompt: &str) -> InferenceResult;

    /// Models offered by the inference service; empty on failure
    async fn list_models(&self) -> Vec<String>;
}

/// Resilient client for one configured provider
pub struct LlmClient {
    config: ProviderConfig,
    descriptor: &'static ProviderDescriptor,
    transport: Arc<dyn Transport>,
    retry: RetryPolicy,
}

impl std::fmt::Debug for LlmClient {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("LlmClient")
            .field("config", &self.config)
            .field("descriptor", &self.descriptor)
            .field("retry", &self.retry)
            .finish()
    }
}

impl LlmClient {
    /// Create a client over HTTP
    ///
    /// # Errors
    /// Returns error if the provider is unknown, the base URL is missing, or
    /// the HTTP client cannot be built
    pub fn new(config: ProviderConfig) -> Result<Self> {
        let transport = HttpTransport::new(config.timeout)?;
        Self::with_transport(config, Arc::new(transport))
    }

    /// Create a client over an arbitrary transport
    ///
    /// # Errors
    /// Returns error if the provider is unknown or the base URL is missing
    pub fn with_transport(config: ProviderConfig, transport: Arc<dyn Transport>) -> Result<Self> {
        let Some(descriptor) = providers::lookup(&config.provider) else {
            error!(
                provider = %config.provider,
                known = ?providers::names(),
                "Unknown LLM provider"
            );
            return Err(Error::UnknownProvider(config.provider));
        };

        if config.base_url.trim().is_empty() {
            error!(provider = descriptor.name, "LLM base URL is not configured");
            return Err(Error::NotConfigured(format!(
                "base URL for provider '{}' is missing",
                descriptor.name
            )));
        }

        if config.model.trim().is_empty() {
            error!(provider = descriptor.name, "LLM model is not configured");
            return Err(Error::NotConfigured(format!(
                "model for provider '{}' is missing",
                descriptor.name
            )));
        }

        let retry = RetryPolicy::new(config.max_retries, config.retry_delay);

        info!(
            provider = descriptor.name,
            base_url = %config.base_url,
            model = %config.model,
            max_attempts = retry.max_attempts(),
            "LLM client configured"
        );

        Ok(Self {
            config,
            descriptor,
            transport,
            retry,
        })
    }

    /// The client's configuration
    #[must_use]
    pub fn config(&self) -> &ProviderConfig {
        &self.config
    }

    /// The resolved provider descriptor
    #[must_use]
    pub fn descriptor(&self) -> &'static ProviderDescriptor {
        self.descriptor
    }

    /// The request that would be sent for `prompt`
    #[must_use]
    pub fn prepare(&self, prompt: &str) -> PreparedRequest {
        self.descriptor.prepare(&self.config, prompt)
    }

    async fn send(&self, request: &PreparedRequest) -> Result<Value> {
        self.retry
            .run(|attempt| {
                debug!(attempt, url = %request.url, "Calling LLM");
                self.transport.post_json(request)
            })
            .await
    }
}

#[async_trait::async_trait]
impl LlmProvider for LlmClient {
    fn name(&self) -> &str {
        self.descriptor.name
    }

    fn model(&self) -> &str {
        &self.config.model
    }

    fn base_url(&self) -> &str {
        &self.config.base_url
    }

    #[instrument(skip(self, prompt), fields(prompt_len = prompt.len()))]
    async fn complete(&self, prompt: &str) -> Result<String> {
        let request = self.prepare(prompt);
        let body = self.send(&request).await?;

        (self.descriptor.extract_text)(&body).ok_or_else(|| {
            Error::InvalidResponse(format!(
                "no generated text in response: {}",
                truncate_safe(&body.to_string(), 200)
            ))
        })
    }

    async fn infer(&self, prompt: &str) -> InferenceResult {
        match self.complete(prompt).await {
            Ok(text) => match try_extract_json(&text) {
                Some(value) => InferenceResult::Json(value),
                None => {
                    warn!(
                        output = %truncate_safe(&text, 200),
                        "Model output is not JSON"
                    );
                    InferenceResult::Error(INVALID_JSON_ERROR.to_string())
                }
            },
            Err(Error::RetriesExhausted { attempts, last_error }) => {
                error!(attempts, error = %last_error, "LLM request failed after retries");
                InferenceResult::Error(RETRIES_EXHAUSTED_ERROR.to_string())
            }
            Err(Error::InvalidResponse(detail)) => {
                error!(error = %detail, "Unexpected LLM response");
                InferenceResult::Error(UNEXPECTED_RESPONSE_ERROR.to_string())
            }
            Err(e) => {
                error!(error = %e, "LLM request failed");
                InferenceResult::Error(format!("LLM API request failed: {}", e))
            }
        }
    }

    async fn list_models(&self) -> Vec<String> {
        let url = self.descriptor.models_url(&self.config.base_url);
        let headers = self.descriptor.auth_headers(self.config.api_key.as_deref());

        match self.transport.get_json(&url, &headers).await {
            Ok(body) => (self.descriptor.extract_models)(&body),
            Err(e) => {
                error!(url = %url, error = %e, "Failed to fetch models");
                Vec::new()
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::transport::MockTransport;
    use std::time::Duration;

    fn vllm_config() -> ProviderConfig {
        ProviderConfig::new("vllm", "http://test", "test-model")
    }

    fn client(config: ProviderConfig, transport: Arc<MockTransport>) -> LlmClient {
        LlmClient::with_transport(config, transport).unwrap()
    }

    #[tokio::test]
    async fn test_vllm_end_to_end() {
        let body = json!({"choices": [{"text": "{\"speed_kmh\":58,\"speed_ms\":16.11,\"length_meters\":155,\"time_seconds\":9.62}"}]});
        let transport = Arc::new(MockTransport::always(body));
        let client = client(vllm_config(), transport.clone());

        let result = client.infer("how fast?").await;

        assert_eq!(
            result,
            InferenceResult::Json(json!({
                "speed_kmh": 58,
                "speed_ms": 16.11,
                "length_meters": 155,
                "time_seconds": 9.62
            }))
        );
        let requests = transport.requests();
        assert_eq!(requests.len(), 1);
        assert_eq!(requests[0].url, "http://test/completions");
        assert_eq!(requests[0].payload["prompt"], "how fast?");
    }

    #[tokio::test(start_paused = true)]
    async fn test_http_500_exhausts_retries() {
        let transport = Arc::new(MockTransport::always_status(500));
        let client = client(vllm_config(), transport.clone());
        let start = tokio::time::Instant::now();

        let result = client.infer("hi").await;

        assert_eq!(transport.call_count(), 3);
        assert_eq!(
            result.into_value(),
            json!({"error": "LLM API request failed after retries"})
        );
        assert!(start.elapsed() >= Duration::from_secs(10));
    }

    #[tokio::test(start_paused = true)]
    async fn test_configured_retry_count() {
        let transport = Arc::new(MockTransport::always_status(503));
        let config = vllm_config()
            .with_max_retries(5)
            .with_retry_delay(Duration::from_millis(10));
        let client = client(config, transport.clone());

        assert!(client.infer("hi").await.is_error());
        assert_eq!(transport.call_count(), 5);
    }

    #[tokio::test(start_paused = true)]
    async fn test_recovers_after_transient_failure() {
        let transport = Arc::new(
            MockTransport::new()
                .then_status(502)
                .then_ok(json!({"choices": [{"text": "{\"ok\": true}"}]})),
        );
        let client = client(vllm_config(), transport.clone());

        assert_eq!(client.infer("hi").await, InferenceResult::Json(json!({"ok": true})));
        assert_eq!(transport.call_count(), 2);
    }

    #[tokio::test]
    async fn test_non_json_output_is_error_payload() {
        let transport = Arc::new(MockTransport::always(
            json!({"choices": [{"text": "The leopard is fast."}]}),
        ));
        let client = client(vllm_config(), transport.clone());

        let result = client.infer("hi").await;

        assert_eq!(result, InferenceResult::Error(INVALID_JSON_ERROR.to_string()));
        // non-JSON output is not retried
        assert_eq!(transport.call_count(), 1);
    }

    #[tokio::test]
    async fn test_wrong_response_shape() {
        let transport = Arc::new(MockTransport::always(json!({"unexpected": true})));
        let client = client(vllm_config(), transport.clone());

        let result = client.infer("hi").await;

        assert_eq!(
            result.into_value(),
            json!({"error": UNEXPECTED_RESPONSE_ERROR})
        );
        assert_eq!(transport.call_count(), 1);
    }

    #[test]
    fn test_fenced_chat_output() {
        let transport = Arc::new(
            MockTransport::new().then_chat("Sure!\n```json\n{\"time_seconds\": 9.62}\n```"),
        );
        let config = ProviderConfig::new("openai", "http://test/v1", "gpt-4o-mini");
        let client = client(config, transport);

        let result = tokio_test::block_on(client.infer("hi"));

        assert_eq!(result, InferenceResult::Json(json!({"time_seconds": 9.62})));
    }

    #[tokio::test]
    async fn test_complete_returns_raw_text() {
        let transport = Arc::new(MockTransport::new().then_chat("Leopards reach 58 km/h."));
        let config = ProviderConfig::new("llamastack", "http://test/v1", "llama");
        let client = client(config, transport);

        assert_eq!(client.complete("hi").await.unwrap(), "Leopards reach 58 km/h.");
    }

    #[tokio::test]
    async fn test_api_key_sent_as_bearer() {
        let transport = Arc::new(MockTransport::new().then_chat("{}"));
        let config = ProviderConfig::new("openai", "http://test/v1", "gpt")
            .with_api_key("sk-test-1234567890");
        let client = client(config, transport.clone());

        client.infer("hi").await;

        assert_eq!(
            transport.requests()[0].bearer_token(),
            Some("sk-test-1234567890")
        );
    }

    #[test]
    fn test_missing_base_url_rejected() {
        let config = ProviderConfig::new("vllm", "  ", "model");
        let err = LlmClient::with_transport(config, Arc::new(MockTransport::new())).unwrap_err();
        assert!(matches!(err, Error::NotConfigured(_)));
    }

    #[test]
    fn test_unknown_provider_rejected() {
        let config = ProviderConfig::new("acme", "http://test", "model");
        let err = LlmClient::with_transport(config, Arc::new(MockTransport::new())).unwrap_err();
        assert!(matches!(err, Error::UnknownProvider(_)));
    }

    #[tokio::test]
    async fn test_list_models() {
        let transport = Arc::new(MockTransport::new().then_ok(json!({"data": [
            {"identifier": "remote-llm/llama-4-scout", "model_type": "llm"},
            {"identifier": "embedder", "model_type": "embedding"}
        ]})));
        let config = ProviderConfig::new("llamastack", "http://test/v1", "llama");
        let client = client(config, transport.clone());

        assert_eq!(client.list_models().await, vec!["remote-llm/llama-4-scout"]);
        assert_eq!(transport.get_urls(), vec!["http://test/v1/models"]);
    }

    #[tokio::test]
    async fn test_list_models_failure_is_empty() {
        let transport = Arc::new(MockTransport::always_status(404));
        let config = ProviderConfig::new("ollama", "http://localhost:11434", "llama3.2");
        let client = client(config, transport);

        assert!(client.list_models().await.is_empty());
    }

    #[test]
    fn test_inference_result_into_value() {
        assert_eq!(
            InferenceResult::Error("boom".into()).into_value(),
            json!({"error": "boom"})
        );
        let value: Value = InferenceResult::Json(json!({"a": 1})).into();
        assert_eq!(value, json!({"a": 1}));
    }
}
