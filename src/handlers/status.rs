// src/handlers/status.rs
use axum::{extract::Extension, response::Json, routing::get, Router};
use serde_json::{json, Value};
use std::sync::Arc;

use crate::AppState;

pub fn status_routes() -> Router {
    Router::new().route("/api/status", get(api_status))
}

// API Status endpoint
async fn api_status(Extension(state): Extension<Arc<AppState>>) -> Json<Value> {
    let generation_status = if state.generator.is_configured() {
        "configured"
    } else {
        "not_configured"
    };

    Json(json!({
        "status": "operational",
        "version": env!("CARGO_PKG_VERSION"),
        "services": {
            "generation": {
                "status": generation_status,
                "backend": state.generator.describe(),
            },
            "transcripts": {
                "fetch_attempts": state.transcripts.plan().attempts().len(),
            },
        },
        "active_sessions": state.sessions.len().await,
        "endpoints": {
            "coding_mentor": "/mentor",
            "lecture_summaries": "/lectures",
            "session_history": "/api/session/history",
            "status": "/api/status"
        }
    }))
}
