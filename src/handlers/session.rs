// src/handlers/session.rs
//! Session lifecycle endpoints

use axum::{
    extract::Extension,
    http::{header::SET_COOKIE, HeaderMap, HeaderValue},
    response::{IntoResponse, Json, Redirect, Response},
    routing::{get, post},
    Router,
};
use serde_json::{json, Value};
use std::sync::Arc;

use crate::error::AppError;
use crate::session::{session_id_from_headers, SESSION_COOKIE};
use crate::AppState;

pub fn session_routes() -> Router {
    Router::new()
        .route("/session/end", post(end_session))
        .route("/api/session/history", get(session_history))
}

/// POST /session/end - destroy the caller's session and expire its cookie
async fn end_session(Extension(state): Extension<Arc<AppState>>, headers: HeaderMap) -> Response {
    if let Some(id) = session_id_from_headers(&headers) {
        state.sessions.end(id).await;
    }

    let mut response = Redirect::to("/").into_response();
    let expired = format!("{}=; Path=/; HttpOnly; SameSite=Lax; Max-Age=0", SESSION_COOKIE);
    if let Ok(value) = HeaderValue::from_str(&expired) {
        response.headers_mut().insert(SET_COOKIE, value);
    }
    response
}

/// GET /api/session/history - both histories of the caller's session, most recent first
async fn session_history(
    Extension(state): Extension<Arc<AppState>>,
    headers: HeaderMap,
) -> Result<Json<Value>, AppError> {
    let id = session_id_from_headers(&headers).ok_or(AppError::SessionExpired)?;

    let body = state
        .sessions
        .with_session(id, |s| {
            let mentor: Vec<_> = s.mentor.list_most_recent_first().collect();
            let lectures: Vec<_> = s.lectures.list_most_recent_first().collect();
            json!({
                "success": true,
                "session_id": s.id,
                "created_at": s.created_at,
                "mentor": mentor,
                "lectures": lectures,
            })
        })
        .await
        .ok_or(AppError::SessionExpired)?;

    Ok(Json(body))
}
