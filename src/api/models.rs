//! Model listing endpoint

use crate::server::AppState;
use axum::extract::Extension;
use axum::response::Json;
use axum::routing::get;
use axum::Router;
use serde::Serialize;
use std::sync::Arc;

/// Available models response
#[derive(Debug, Serialize)]
pub struct ModelsResponse {
    pub models: Vec<String>,
}

/// Models offered by the backing inference service; empty when unreachable
async fn list_models(Extension(state): Extension<Arc<AppState>>) -> Json<ModelsResponse> {
    Json(ModelsResponse {
        models: state.list_models().await,
    })
}

/// Create model routes
pub fn models_routes() -> Router {
    Router::new().route("/models", get(list_models))
}
