//! Server configuration types

use leopard_core::SearchConfig;
use leopard_llm::util::mask_api_key;
use leopard_llm::ProviderConfig;
use serde::{Deserialize, Serialize};
use std::collections::HashMap;
use std::path::PathBuf;
use std::time::Duration;

/// Application configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AppConfig {
    pub server: ServerConfig,
    pub llm: LlmConfig,
    #[serde(default)]
    pub search: SearchConfig,
    /// Directory holding `config.yaml`, `agents.yaml` and `tasks.yaml`
    #[serde(default = "default_config_dir")]
    pub config_dir: String,
}

fn default_config_dir() -> String {
    "configs".to_string()
}

impl AppConfig {
    /// Directory holding the persona and task overrides
    #[must_use]
    pub fn config_dir(&self) -> PathBuf {
        PathBuf::from(&self.config_dir)
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ServerConfig {
    pub host: String,
    pub port: u16,
}

/// LLM selection and per-provider endpoints
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct LlmConfig {
    /// Active provider (`openai`, `llamastack`, `vllm`, `ollama`, `gemini`)
    pub provider: String,
    /// Total attempts per request
    #[serde(default = "default_max_retries")]
    pub max_retries: u32,
    #[serde(default = "default_retry_delay_secs")]
    pub retry_delay_secs: u64,
    #[serde(default = "default_timeout_secs")]
    pub timeout_secs: u64,
    #[serde(default)]
    pub providers: HashMap<String, ProviderEntry>,
}

fn default_max_retries() -> u32 {
    leopard_llm::config::DEFAULT_MAX_RETRIES
}

fn default_retry_delay_secs() -> u64 {
    leopard_llm::config::DEFAULT_RETRY_DELAY.as_secs()
}

fn default_timeout_secs() -> u64 {
    leopard_llm::config::DEFAULT_TIMEOUT.as_secs()
}

impl LlmConfig {
    /// Normalized name of the active provider
    #[must_use]
    pub fn provider_name(&self) -> String {
        self.provider.trim().to_lowercase()
    }

    /// Client settings for the active provider
    ///
    /// A provider without an entry yields empty URL and model, which the
    /// client rejects at construction.
    #[must_use]
    pub fn provider_config(&self) -> ProviderConfig {
        let name = self.provider_name();
        let entry = self.providers.get(&name).cloned().unwrap_or_default();

        let mut config = ProviderConfig::new(name, entry.base_url, entry.model)
            .with_max_retries(self.max_retries)
            .with_retry_delay(Duration::from_secs(self.retry_delay_secs))
            .with_timeout(Duration::from_secs(self.timeout_secs));
        if let Some(key) = entry.api_key {
            config = config.with_api_key(key);
        }
        config
    }
}

/// Endpoint of one provider
#[derive(Clone, Default, Serialize, Deserialize)]
pub struct ProviderEntry {
    #[serde(default)]
    pub base_url: String,
    #[serde(default)]
    pub model: String,
    #[serde(default)]
    pub api_key: Option<String>,
}

impl std::fmt::Debug for ProviderEntry {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ProviderEntry")
            .field("base_url", &self.base_url)
            .field("model", &self.model)
            .field("api_key", &self.api_key.as_deref().map(mask_api_key))
            .finish()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn llm_config(provider: &str) -> LlmConfig {
        let mut providers = HashMap::new();
        providers.insert(
            "vllm".to_string(),
            ProviderEntry {
                base_url: "http://test".to_string(),
                model: "test-model".to_string(),
                api_key: Some("sk-secret-key-123456".to_string()),
            },
        );
        LlmConfig {
            provider: provider.to_string(),
            max_retries: 4,
            retry_delay_secs: 1,
            timeout_secs: 30,
            providers,
        }
    }

    #[test]
    fn test_provider_config() {
        let config = llm_config(" VLLM ").provider_config();
        assert_eq!(config.provider, "vllm");
        assert_eq!(config.base_url, "http://test");
        assert_eq!(config.model, "test-model");
        assert_eq!(config.max_retries, 4);
        assert_eq!(config.retry_delay, Duration::from_secs(1));
        assert_eq!(config.timeout, Duration::from_secs(30));
        assert_eq!(config.api_key.as_deref(), Some("sk-secret-key-123456"));
    }

    #[test]
    fn test_provider_without_entry_is_empty() {
        let config = llm_config("ollama").provider_config();
        assert_eq!(config.provider, "ollama");
        assert!(config.base_url.is_empty());
    }

    #[test]
    fn test_entry_debug_masks_key() {
        let entry = &llm_config("vllm").providers["vllm"];
        let debug = format!("{:?}", entry);
        assert!(!debug.contains("sk-secret-key-123456"));
        assert!(debug.contains("http://test"));
    }
}
