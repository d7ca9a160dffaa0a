// src/handlers/mod.rs
pub mod lectures;
pub mod mentor;
pub mod session;
pub mod status;
pub mod ui;

use axum::{
    http::{header::SET_COOKIE, HeaderMap, HeaderValue},
    response::{Html, IntoResponse, Response},
};
use serde::de::{value::StrDeserializer, value::Error as ValueError, DeserializeOwned, IntoDeserializer};
use serde::{Deserialize, Deserializer};

use crate::session::{session_id_from_headers, SessionHandle};
use crate::AppState;

/// A rendered page; issues the session cookie when the session was just created
pub struct Page {
    pub session: SessionHandle,
    pub html: String,
}

impl IntoResponse for Page {
    fn into_response(self) -> Response {
        let mut response = Html(self.html).into_response();
        if self.session.created {
            match HeaderValue::from_str(&self.session.set_cookie_value()) {
                Ok(value) => {
                    response.headers_mut().insert(SET_COOKIE, value);
                }
                Err(e) => tracing::error!("Failed to build session cookie: {}", e),
            }
        }
        response
    }
}

/// Look up the caller's session from its cookie, starting a fresh one when needed
pub async fn open_session(state: &AppState, headers: &HeaderMap) -> SessionHandle {
    state.sessions.open(session_id_from_headers(headers)).await
}

/// Form field that falls back to its default when the submitted value does not parse
pub fn lenient<'de, D, T>(deserializer: D) -> Result<T, D::Error>
where
    D: Deserializer<'de>,
    T: DeserializeOwned + Default,
{
    let raw = String::deserialize(deserializer)?;
    let field: StrDeserializer<'_, ValueError> = raw.trim().into_deserializer();
    let parsed = T::deserialize(field);
    Ok(parsed.unwrap_or_else(|e| {
        tracing::debug!("Ignoring unparseable form value '{}': {}", raw, e);
        T::default()
    }))
}
