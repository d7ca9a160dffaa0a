// lib.rs - Study Hub: AI Coding Mentor and Lecture Summaries
pub mod config;
pub mod error;
pub mod generation;
pub mod handlers;
pub mod middleware;
pub mod models;
pub mod prompts;
pub mod session;
pub mod transcript;

#[cfg(test)]
pub(crate) mod test_support;

use axum::{Extension, Router};
use std::sync::Arc;
use tower_http::{catch_panic::CatchPanicLayer, cors::CorsLayer};

use generation::TextGenerator;
use session::SessionStore;
use transcript::TranscriptResolver;

// AppState holds the generation gateway, the transcript resolver and every live session
pub struct AppState {
    pub generator: Arc<dyn TextGenerator>,
    pub transcripts: TranscriptResolver,
    pub sessions: SessionStore,
}

impl AppState {
    pub fn new(generator: Arc<dyn TextGenerator>, transcripts: TranscriptResolver) -> Self {
        Self {
            generator,
            transcripts,
            sessions: SessionStore::new(),
        }
    }
}

/// Build the application with all routes and shared state
pub fn build_router(state: Arc<AppState>) -> Router {
    Router::new()
        .merge(handlers::ui::ui_routes())
        .merge(handlers::mentor::mentor_routes())
        .merge(handlers::lectures::lecture_routes())
        .merge(handlers::session::session_routes())
        .merge(handlers::status::status_routes())
        .layer(axum::middleware::from_fn(middleware::logging::request_logging_middleware))
        .layer(CatchPanicLayer::new())
        .layer(CorsLayer::permissive())
        .layer(Extension(state))
}
