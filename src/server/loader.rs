//! Configuration loading
//!
//! Handles loading configuration from embedded defaults, files, and environment.

use super::config::AppConfig;
use anyhow::{Context, Result};
use config::{Config, Environment, File, FileFormat};
use tracing::warn;

/// Embedded default configuration (compiled into binary)
pub const DEFAULT_CONFIG: &str = include_str!("../../config/default.toml");

/// Variable naming the directory with `config.yaml`, `agents.yaml`, `tasks.yaml`
const CONFIG_DIR_VAR: &str = "CONFIG_DIR";

/// Load configuration from files and environment
pub fn load_config() -> Result<AppConfig> {
    load_config_with(|key| std::env::var(key).ok())
}

/// Load configuration, reading plain variables through `env`
pub fn load_config_with<F>(env: F) -> Result<AppConfig>
where
    F: Fn(&str) -> Option<String>,
{
    let config_dir = env(CONFIG_DIR_VAR).unwrap_or_else(|| "configs".to_string());

    let config = Config::builder()
        // 1. Embedded defaults (always available)
        .add_source(File::from_str(DEFAULT_CONFIG, FileFormat::Toml))
        // 2. Deployment file (optional)
        .add_source(
            File::new(&format!("{}/config.yaml", config_dir), FileFormat::Yaml).required(false),
        )
        // 3. Prefixed environment variables: LEOPARD_SERVER__PORT=9000
        .add_source(
            Environment::with_prefix("LEOPARD")
                .prefix_separator("_")
                .separator("__")
                .try_parsing(true),
        )
        .build()
        .context("Failed to build configuration")?;

    let mut app: AppConfig = config
        .try_deserialize()
        .context("Failed to deserialize configuration")?;

    app.config_dir = config_dir;
    apply_env_overrides(&mut app, env);
    Ok(app)
}

/// Apply the well-known plain variables (highest priority)
///
/// `LLM_PROVIDER`, `<PROVIDER>_BASE_URL`, `<PROVIDER>_MODEL`,
/// `<PROVIDER>_API_KEY` and `LLM_MAX_RETRIES`. `LOG_LEVEL` is read by the
/// logging setup before configuration loads.
pub fn apply_env_overrides<F>(config: &mut AppConfig, env: F)
where
    F: Fn(&str) -> Option<String>,
{
    if let Some(provider) = non_empty(env("LLM_PROVIDER")) {
        config.llm.provider = provider;
    }

    for name in leopard_llm::providers::names() {
        let prefix = name.to_uppercase();
        let base_url = non_empty(env(&format!("{}_BASE_URL", prefix)));
        let model = non_empty(env(&format!("{}_MODEL", prefix)));
        let api_key = non_empty(env(&format!("{}_API_KEY", prefix)));

        if base_url.is_none() && model.is_none() && api_key.is_none() {
            continue;
        }

        let entry = config.llm.providers.entry(name.to_string()).or_default();
        if let Some(base_url) = base_url {
            entry.base_url = base_url;
        }
        if let Some(model) = model {
            entry.model = model;
        }
        if api_key.is_some() {
            entry.api_key = api_key;
        }
    }

    if let Some(raw) = non_empty(env("LLM_MAX_RETRIES")) {
        match raw.parse::<u32>() {
            Ok(n) => config.llm.max_retries = n,
            Err(_) => warn!(value = %raw, "Ignoring invalid LLM_MAX_RETRIES"),
        }
    }
}

fn non_empty(value: Option<String>) -> Option<String> {
    value
        .map(|v| v.trim().to_string())
        .filter(|v| !v.is_empty())
}
