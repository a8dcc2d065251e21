//! Web API module for Leopard Crossing
//!
//! Provides REST API endpoints for:
//! - Service info and health
//! - Model listing
//! - The leopard crossing calculation

pub mod crossing;
pub mod health;
pub mod models;

use crate::server::AppState;
use axum::{Extension, Router};
use std::sync::Arc;

pub use crossing::crossing_routes;
pub use health::health_routes;
pub use models::models_routes;

/// Create the API router with all endpoints
pub fn router(state: Arc<AppState>) -> Router {
    Router::new()
        .merge(health_routes())
        .merge(models_routes())
        .merge(crossing_routes())
        .layer(Extension(state))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::server::config::{AppConfig, LlmConfig, ProviderEntry, ServerConfig};
    use crate::server::state::LlmHandle;
    use axum::body::{to_bytes, Body};
    use axum::http::{Request, StatusCode};
    use leopard_core::{PipelineOverrides, Tool, ToolDefinition, ToolResult};
    use leopard_llm::{LlmClient, MockTransport};
    use serde_json::{json, Value};
    use std::collections::HashMap;
    use tower::ServiceExt;

    struct NoSearch {
        definition: ToolDefinition,
    }

    #[async_trait::async_trait]
    impl Tool for NoSearch {
        fn definition(&self) -> &ToolDefinition {
            &self.definition
        }

        async fn execute(&self, _input: Value) -> leopard_core::Result<ToolResult> {
            Ok(ToolResult::success(json!({"results": []}), 0))
        }
    }

    fn app_config(base_url: &str) -> AppConfig {
        let mut providers = HashMap::new();
        providers.insert(
            "openai".to_string(),
            ProviderEntry {
                base_url: base_url.to_string(),
                model: "gpt-test".to_string(),
                api_key: None,
            },
        );
        AppConfig {
            server: ServerConfig {
                host: "127.0.0.1".to_string(),
                port: 0,
            },
            llm: LlmConfig {
                provider: "openai".to_string(),
                max_retries: 2,
                retry_delay_secs: 0,
                timeout_secs: 5,
                providers,
            },
            search: Default::default(),
            config_dir: "configs".to_string(),
        }
    }

    fn app_with(transport: Arc<MockTransport>) -> Router {
        let config = app_config("http://test/v1");
        let client = LlmClient::with_transport(config.llm.provider_config(), transport).unwrap();
        let state = AppState::with_parts(
            config,
            LlmHandle::Ready(Arc::new(client)),
            Arc::new(NoSearch {
                definition: ToolDefinition::new("web_search", "Search"),
            }),
            PipelineOverrides::default(),
        );
        router(Arc::new(state))
    }

    async fn get(app: Router, uri: &str) -> (StatusCode, Value) {
        let response = app
            .oneshot(Request::builder().uri(uri).body(Body::empty()).unwrap())
            .await
            .unwrap();
        let status = response.status();
        let body = to_bytes(response.into_body(), usize::MAX).await.unwrap();
        (status, serde_json::from_slice(&body).unwrap())
    }

    fn crossing_transport() -> Arc<MockTransport> {
        Arc::new(
            MockTransport::new()
                .then_chat("Leopard: 58 km/h. Pont des Arts: 155 m.")
                .then_chat(
                    "```json\n{\"speed_kmh\": 58, \"speed_ms\": 16.11, \"length_meters\": 155, \
                     \"time_seconds\": 9.62, \"calculation\": \"155 / 16.11\", \
                     \"explanation\": \"About 9.62 seconds.\"}\n```",
                ),
        )
    }

    #[tokio::test]
    async fn test_root_and_health() {
        let app = app_with(Arc::new(MockTransport::new()));

        let (status, info) = get(app.clone(), "/").await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(info["message"], "Leopard Pont des Arts API is running!");

        let (status, health) = get(app, "/health").await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(
            health,
            json!({
                "status": "ok",
                "llm_provider": "openai",
                "llm_url": "http://test/v1",
                "llm_model": "gpt-test"
            })
        );
    }

    #[tokio::test]
    async fn test_models() {
        let transport = Arc::new(
            MockTransport::new().then_ok(json!({"data": [{"id": "gpt-test"}, {"id": "gpt-other"}]})),
        );
        let (status, body) = get(app_with(transport), "/models").await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(body, json!({"models": ["gpt-test", "gpt-other"]}));
    }

    #[tokio::test]
    async fn test_leopard_crossing() {
        let (status, body) = get(app_with(crossing_transport()), "/leopard-crossing").await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(body["time_seconds"], 9.62);
        assert_eq!(body["speed_kmh"], 58);
    }

    #[tokio::test]
    async fn test_leopard_crossing_simple() {
        let (status, body) = get(app_with(crossing_transport()), "/leopard-crossing/simple").await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(
            body,
            json!({"time_seconds": 9.62, "explanation": "About 9.62 seconds."})
        );
    }

    #[tokio::test]
    async fn test_failed_research_is_500() {
        let (status, body) = get(
            app_with(Arc::new(MockTransport::always_status(503))),
            "/leopard-crossing",
        )
        .await;
        assert_eq!(status, StatusCode::INTERNAL_SERVER_ERROR);
        assert!(body["detail"]
            .as_str()
            .unwrap()
            .starts_with("Failed to execute crew: "));
    }

    #[tokio::test]
    async fn test_unavailable_llm_reports_error() {
        let state = AppState::with_parts(
            app_config(""),
            LlmHandle::Unavailable("LLM not configured: base URL for provider 'openai' is missing".to_string()),
            Arc::new(NoSearch {
                definition: ToolDefinition::new("web_search", "Search"),
            }),
            PipelineOverrides::default(),
        );
        let app = router(Arc::new(state));

        let (status, body) = get(app.clone(), "/leopard-crossing/simple").await;
        assert_eq!(status, StatusCode::OK);
        assert!(body["error"].as_str().unwrap().contains("base URL"));

        let (_, models) = get(app, "/models").await;
        assert_eq!(models, json!({"models": []}));
    }
}
