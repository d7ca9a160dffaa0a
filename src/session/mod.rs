// src/session/mod.rs
//! Per-browser session contexts holding each page's interaction history.
//! Sessions live in memory only: created on first visit, cleared on demand,
//! destroyed on explicit end or after sitting idle.

use axum::http::{header::COOKIE, HeaderMap};
use chrono::{DateTime, Utc};
use std::collections::HashMap;
use std::time::Duration;
use tokio::sync::RwLock;
use uuid::Uuid;

pub mod history;

pub use history::History;

use crate::models::{CodeAnalysis, LectureSummary};

pub type SessionId = Uuid;

pub const SESSION_COOKIE: &str = "study_hub_session";

#[derive(Debug)]
pub struct Session {
    pub id: SessionId,
    pub created_at: DateTime<Utc>,
    pub last_seen: DateTime<Utc>,
    pub mentor: History<CodeAnalysis>,
    pub lectures: History<LectureSummary>,
}

impl Session {
    fn new() -> Self {
        let now = Utc::now();
        Self {
            id: Uuid::new_v4(),
            created_at: now,
            last_seen: now,
            mentor: History::new(),
            lectures: History::new(),
        }
    }
}

/// Handle returned when a request opens its session
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct SessionHandle {
    pub id: SessionId,
    /// True when the session did not exist yet and the cookie must be (re)issued
    pub created: bool,
}

impl SessionHandle {
    pub fn set_cookie_value(&self) -> String {
        format!("{}={}; Path=/; HttpOnly; SameSite=Lax", SESSION_COOKIE, self.id)
    }
}

pub struct SessionStore {
    sessions: RwLock<HashMap<SessionId, Session>>,
}

impl SessionStore {
    pub fn new() -> Self {
        Self {
            sessions: RwLock::new(HashMap::new()),
        }
    }

    /// Touch the requested session, or start a new one if it is unknown or absent
    pub async fn open(&self, requested: Option<SessionId>) -> SessionHandle {
        let mut sessions = self.sessions.write().await;

        if let Some(id) = requested {
            if let Some(session) = sessions.get_mut(&id) {
                session.last_seen = Utc::now();
                return SessionHandle { id, created: false };
            }
        }

        let session = Session::new();
        let id = session.id;
        sessions.insert(id, session);
        tracing::info!("🆕 Started session {}", id);
        SessionHandle { id, created: true }
    }

    /// Run `f` against the session; `None` if it no longer exists
    pub async fn with_session<R>(&self, id: SessionId, f: impl FnOnce(&mut Session) -> R) -> Option<R> {
        let mut sessions = self.sessions.write().await;
        sessions.get_mut(&id).map(f)
    }

    /// Destroy a session and everything it holds
    pub async fn end(&self, id: SessionId) -> bool {
        let removed = self.sessions.write().await.remove(&id).is_some();
        if removed {
            tracing::info!("👋 Ended session {}", id);
        }
        removed
    }

    /// Destroy sessions idle for longer than `max_idle`; returns how many were removed
    pub async fn purge_idle(&self, max_idle: Duration) -> usize {
        let now = Utc::now();
        let mut sessions = self.sessions.write().await;
        let before = sessions.len();

        sessions.retain(|_, session| {
            (now - session.last_seen)
                .to_std()
                .map(|idle| idle <= max_idle)
                .unwrap_or(true)
        });

        let removed = before - sessions.len();
        if removed > 0 {
            tracing::debug!("🗑️ Expired {} idle sessions", removed);
        }
        removed
    }

    pub async fn len(&self) -> usize {
        self.sessions.read().await.len()
    }
}

impl Default for SessionStore {
    fn default() -> Self {
        Self::new()
    }
}

/// Read the session id from the `Cookie` header, ignoring malformed values
pub fn session_id_from_headers(headers: &HeaderMap) -> Option<SessionId> {
    headers
        .get_all(COOKIE)
        .iter()
        .filter_map(|value| value.to_str().ok())
        .flat_map(|value| value.split(';'))
        .filter_map(|pair| pair.trim().split_once('='))
        .find(|(name, _)| *name == SESSION_COOKIE)
        .and_then(|(_, value)| Uuid::parse_str(value.trim()).ok())
}
