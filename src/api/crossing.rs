//! Leopard crossing endpoints
//!
//! Both endpoints run the full pipeline. Pipeline failures answer
//! `500 {"detail": "Failed to execute crew: ..."}`.

use crate::server::AppState;
use axum::extract::Extension;
use axum::http::StatusCode;
use axum::response::{IntoResponse, Json, Response};
use axum::routing::get;
use axum::Router;
use leopard_core::simple_payload;
use serde::Serialize;
use serde_json::Value;
use std::sync::Arc;
use tracing::{error, info};

/// Error body for failed runs
#[derive(Debug, Serialize)]
pub struct ErrorDetail {
    pub detail: String,
}

/// Pipeline failure mapped to a 500 response
pub struct CrewFailure(leopard_core::Error);

impl IntoResponse for CrewFailure {
    fn into_response(self) -> Response {
        error!(error = %self.0, "Crew execution failed");
        (
            StatusCode::INTERNAL_SERVER_ERROR,
            Json(ErrorDetail {
                detail: format!("Failed to execute crew: {}", self.0),
            }),
        )
            .into_response()
    }
}

async fn leopard_crossing(
    Extension(state): Extension<Arc<AppState>>,
) -> Result<Json<Value>, CrewFailure> {
    let result = state.run_crossing().await.map_err(CrewFailure)?;
    info!("Crew execution completed");
    Ok(Json(result))
}

async fn leopard_crossing_simple(
    Extension(state): Extension<Arc<AppState>>,
) -> Result<Json<Value>, CrewFailure> {
    let result = state.run_crossing().await.map_err(CrewFailure)?;
    Ok(Json(simple_payload(&result)))
}

/// Create crossing routes
pub fn crossing_routes() -> Router {
    Router::new()
        .route("/leopard-crossing", get(leopard_crossing))
        .route("/leopard-crossing/simple", get(leopard_crossing_simple))
}
