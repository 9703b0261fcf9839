//! Health check handler

use axum::{Json, extract::State};
use serde::Serialize;

use shared::util::now_millis;

use crate::core::ServerState;
use crate::utils::AppResult;

#[derive(Debug, Serialize)]
pub struct HealthStatus {
    pub status: &'static str,
    pub environment: String,
    pub timestamp: i64,
}

/// GET /api/health - liveness probe
pub async fn health(State(state): State<ServerState>) -> AppResult<Json<HealthStatus>> {
    Ok(Json(HealthStatus {
        status: "ok",
        environment: state.config.environment.clone(),
        timestamp: now_millis(),
    }))
}
