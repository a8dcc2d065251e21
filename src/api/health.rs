//! Service info and health endpoints
//!
//! - `/`: service name, version and endpoint map
//! - `/health`: status plus the configured LLM provider, URL and model

use crate::server::AppState;
use axum::extract::Extension;
use axum::response::Json;
use axum::routing::get;
use axum::Router;
use serde::Serialize;
use std::collections::BTreeMap;
use std::sync::Arc;

/// Root endpoint response
#[derive(Debug, Serialize)]
pub struct ServiceInfo {
    pub message: &'static str,
    pub version: &'static str,
    pub endpoints: BTreeMap<&'static str, &'static str>,
}

/// Health response
#[derive(Debug, Serialize)]
pub struct HealthResponse {
    pub status: &'static str,
    pub llm_provider: String,
    pub llm_url: String,
    pub llm_model: String,
}

async fn service_info() -> Json<ServiceInfo> {
    let endpoints = BTreeMap::from([
        ("/health", "Health check"),
        ("/models", "List models offered by the inference service"),
        ("/leopard-crossing", "Calculate leopard crossing time"),
        (
            "/leopard-crossing/simple",
            "Crossing time and explanation only",
        ),
    ]);

    Json(ServiceInfo {
        message: "Leopard Pont des Arts API is running!",
        version: env!("CARGO_PKG_VERSION"),
        endpoints,
    })
}

async fn health_check(Extension(state): Extension<Arc<AppState>>) -> Json<HealthResponse> {
    Json(HealthResponse {
        status: "ok",
        llm_provider: state.provider.provider.clone(),
        llm_url: state.provider.base_url.clone(),
        llm_model: state.provider.model.clone(),
    })
}

/// Create health routes
pub fn health_routes() -> Router {
    Router::new()
        .route("/", get(service_info))
        .route("/health", get(health_check))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_health_response_serialization() {
        let resp = HealthResponse {
            status: "ok",
            llm_provider: "vllm".to_string(),
            llm_url: "http://test".to_string(),
            llm_model: "test-model".to_string(),
        };
        let json = serde_json::to_value(&resp).unwrap();
        assert_eq!(json["status"], "ok");
        assert_eq!(json["llm_provider"], "vllm");
        assert_eq!(json["llm_url"], "http://test");
        assert_eq!(json["llm_model"], "test-model");
    }

    #[tokio::test]
    async fn test_service_info_lists_endpoints() {
        let Json(info) = service_info().await;
        assert_eq!(info.version, env!("CARGO_PKG_VERSION"));
        assert!(info.endpoints.contains_key("/leopard-crossing"));
        assert!(info.endpoints.contains_key("/models"));
    }
}
