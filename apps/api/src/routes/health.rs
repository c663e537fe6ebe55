use axum::{extract::State, Json};
use serde_json::{json, Value};

use crate::state::AppState;

/// GET /health
/// Liveness plus which optional integrations are wired up.
pub async fn health_handler(State(state): State<AppState>) -> Json<Value> {
    Json(json!({
        "status": "ok",
        "version": env!("CARGO_PKG_VERSION"),
        "service": "vitae-api",
        "database": state.config.database_url.is_some(),
        "objectStorage": state.config.s3.is_some(),
        "coverLetters": state.llm.is_some(),
        "openSessions": state.sessions.len().await,
    }))
}
