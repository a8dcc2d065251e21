//! Shared application state
//!
//! Built once at startup and shared read-only by every request. An LLM that
//! cannot be configured does not stop the process; it is kept as
//! [`LlmHandle::Unavailable`] and reported as an `{"error": ...}` payload.

use super::config::AppConfig;
use anyhow::{Context, Result};
use leopard_core::{
    load_overrides, result_payload, CrossingPipeline, PipelineOverrides, Tool, WebSearchTool,
};
use leopard_llm::{LlmClient, LlmProvider, ProviderConfig};
use serde_json::{json, Value};
use std::sync::Arc;
use tracing::{error, info};

/// The configured model, or why there is none
#[derive(Clone)]
pub enum LlmHandle {
    Ready(Arc<dyn LlmProvider>),
    Unavailable(String),
}

/// State shared by the HTTP handlers and the CLI runner
pub struct AppState {
    pub provider: ProviderConfig,
    pub llm: LlmHandle,
    search: Arc<dyn Tool>,
    overrides: PipelineOverrides,
}

impl AppState {
    /// Build the LLM client, search tool and overrides from configuration
    pub fn build(config: AppConfig) -> Result<Self> {
        let provider = config.llm.provider_config();
        let llm = match LlmClient::new(provider.clone()) {
            Ok(client) => LlmHandle::Ready(Arc::new(client)),
            Err(e) => {
                error!(error = %e, "LLM is not available; crossing endpoints will report errors");
                LlmHandle::Unavailable(e.to_string())
            }
        };

        let search: Arc<dyn Tool> = Arc::new(
            WebSearchTool::new(config.search.clone()).context("Failed to create search tool")?,
        );
        let overrides =
            load_overrides(&config.config_dir()).context("Failed to load agent/task overrides")?;

        Ok(Self {
            provider,
            llm,
            search,
            overrides,
        })
    }

    /// Assemble state from already built parts
    #[cfg(test)]
    pub fn with_parts(
        config: AppConfig,
        llm: LlmHandle,
        search: Arc<dyn Tool>,
        overrides: PipelineOverrides,
    ) -> Self {
        Self {
            provider: config.llm.provider_config(),
            llm,
            search,
            overrides,
        }
    }

    /// Models offered by the configured inference service
    pub async fn list_models(&self) -> Vec<String> {
        match &self.llm {
            LlmHandle::Ready(llm) => llm.list_models().await,
            LlmHandle::Unavailable(_) => Vec::new(),
        }
    }

    /// Run the pipeline and shape its result
    ///
    /// An unavailable LLM yields `{"error": ...}`. Pipeline failures are
    /// returned as errors for the front end to report.
    pub async fn run_crossing(&self) -> leopard_core::Result<Value> {
        let llm = match &self.llm {
            LlmHandle::Ready(llm) => Arc::clone(llm),
            LlmHandle::Unavailable(reason) => return Ok(json!({ "error": reason })),
        };

        info!(provider = llm.name(), model = llm.model(), "Starting leopard crossing run");
        let pipeline = CrossingPipeline::new(llm, Arc::clone(&self.search), self.overrides.clone());
        let output = pipeline.run().await?;
        Ok(result_payload(&output))
    }
}
