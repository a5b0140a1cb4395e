use axum::{extract::State, http::StatusCode, response::IntoResponse, Json};
use serde_json::json;
use std::sync::Arc;

use crate::infrastructure::db::{check_connection, DbPool};

/// What readiness depends on
pub struct HealthState {
    /// `None` when history goes to the log only
    pub pool: Option<Arc<DbPool>>,
    pub tts_configured: bool,
}

pub async fn health() -> impl IntoResponse {
    (StatusCode::OK, "OK")
}

pub async fn health_ready(State(state): State<Arc<HealthState>>) -> impl IntoResponse {
    let tts = if state.tts_configured {
        "configured"
    } else {
        "missing_credentials"
    };

    let history = match &state.pool {
        Some(pool) => match check_connection(pool).await {
            Ok(_) => "connected",
            Err(e) => {
                tracing::warn!(error = %e, "History database unreachable");
                "disconnected"
            }
        },
        None => "log",
    };

    let (status_code, status) = if history == "disconnected" {
        (StatusCode::SERVICE_UNAVAILABLE, "not_ready")
    } else {
        (StatusCode::OK, "ready")
    };

    (
        status_code,
        Json(json!({
            "status": status,
            "tts": tts,
            "history": history
        })),
    )
}
