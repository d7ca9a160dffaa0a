// src/handlers/mentor.rs
//! AI Coding Mentor page: analyze code, format code, clear the analysis history.

use axum::{
    extract::{Extension, Form, Query},
    http::HeaderMap,
    routing::{get, post},
    Router,
};
use serde::Deserialize;
use std::sync::Arc;

use super::ui::{escape_html, options, render_page, Notice, PageLayout};
use super::{open_session, Page};
use crate::error::AppError;
use crate::generation::GenerationRequest;
use crate::models::{CodeAnalysis, CodingTask, ProgrammingLanguage};
use crate::prompts;
use crate::session::SessionId;
use crate::AppState;

#[derive(Debug, Clone, Default, Deserialize)]
pub struct MentorForm {
    #[serde(default)]
    pub code: String,
    #[serde(default, deserialize_with = "super::lenient")]
    pub task: CodingTask,
    #[serde(default, deserialize_with = "super::lenient")]
    pub language: ProgrammingLanguage,
}

pub fn mentor_routes() -> Router {
    Router::new()
        .route("/mentor", get(mentor_page))
        .route("/mentor/analyze", post(analyze_handler))
        .route("/mentor/format", post(format_handler))
        .route("/mentor/clear", post(clear_handler))
}

async fn mentor_page(
    Extension(state): Extension<Arc<AppState>>,
    headers: HeaderMap,
    Query(form): Query<MentorForm>,
) -> Page {
    let session = open_session(&state, &headers).await;
    Page {
        session,
        html: render(&state, session.id, &form, &[]).await,
    }
}

async fn analyze_handler(
    Extension(state): Extension<Arc<AppState>>,
    headers: HeaderMap,
    Form(form): Form<MentorForm>,
) -> Page {
    let session = open_session(&state, &headers).await;
    let notice = analyze_code(&state, session.id, &form).await;
    Page {
        session,
        html: render(&state, session.id, &form, &[notice]).await,
    }
}

async fn format_handler(
    Extension(state): Extension<Arc<AppState>>,
    headers: HeaderMap,
    Form(mut form): Form<MentorForm>,
) -> Page {
    let session = open_session(&state, &headers).await;
    let (notice, formatted) = format_code(&state, &form).await;
    if let Some(code) = formatted {
        form.code = code;
    }
    Page {
        session,
        html: render(&state, session.id, &form, &[notice]).await,
    }
}

async fn clear_handler(
    Extension(state): Extension<Arc<AppState>>,
    headers: HeaderMap,
    Form(form): Form<MentorForm>,
) -> Page {
    let session = open_session(&state, &headers).await;
    let notice = clear_history(&state, session.id).await;
    Page {
        session,
        html: render(&state, session.id, &form, &[notice]).await,
    }
}

/// Send the code for analysis and record the result in the session history
pub async fn analyze_code(state: &AppState, session: SessionId, form: &MentorForm) -> Notice {
    if form.code.trim().is_empty() {
        return Notice::info("Enter your code or a description first.");
    }

    match record_analysis(state, session, form).await {
        Ok(()) => Notice::success("Analysis complete!"),
        Err(AppError::Generation(e)) => Notice::error(format!("Analysis failed: {}", e)),
        Err(e) => Notice::error(format!("Analysis error: {}", e)),
    }
}

async fn record_analysis(state: &AppState, session: SessionId, form: &MentorForm) -> Result<(), AppError> {
    let request = GenerationRequest::new(form.code.as_str())
        .with_system_prompt(prompts::mentor_system_prompt(form.language, form.task));

    let analysis = state.generator.generate(&request).await?;
    tracing::info!(
        "💻 {} analysis for {} code complete ({} chars)",
        form.task.label(),
        form.language.label(),
        analysis.len()
    );

    let entry = CodeAnalysis::new(form.code.as_str(), form.language, form.task, analysis);
    state
        .sessions
        .with_session(session, |s| s.mentor.append(entry))
        .await
        .ok_or(AppError::SessionExpired)
}

/// Ask for a formatting-only rewrite. Returns the formatted code on success; history is untouched.
pub async fn format_code(state: &AppState, form: &MentorForm) -> (Notice, Option<String>) {
    if form.code.trim().is_empty() {
        return (Notice::info("Enter some code to format first."), None);
    }

    let request = GenerationRequest::new(prompts::format_prompt(form.language, &form.code));
    match state.generator.generate(&request).await {
        Ok(formatted) => (Notice::success("Code formatted!"), Some(formatted)),
        Err(e) => {
            tracing::warn!("Formatting failed: {}", e);
            (Notice::error(format!("Formatting failed: {}", e)), None)
        }
    }
}

pub async fn clear_history(state: &AppState, session: SessionId) -> Notice {
    match state.sessions.with_session(session, |s| s.mentor.clear()).await {
        Some(()) => Notice::success("History cleared!"),
        None => Notice::error(AppError::SessionExpired.to_string()),
    }
}

async fn render(state: &AppState, session: SessionId, form: &MentorForm, notices: &[Notice]) -> String {
    let history = state
        .sessions
        .with_session(session, |s| s.mentor.list_most_recent_first().cloned().collect::<Vec<_>>())
        .await
        .unwrap_or_default();
    render_mentor_page(form, notices, &history)
}

pub fn render_mentor_page(form: &MentorForm, notices: &[Notice], history: &[CodeAnalysis]) -> String {
    let sidebar = format!(
        r#"<h2 class="sub-title">Coding Assistant</h2>
        <label for="task">What do you need help with?</label>
        <select id="task" name="task" form="mentor-form">{tasks}</select>
        <label for="language">Programming Language</label>
        <select id="language" name="language" form="mentor-form">{languages}</select>"#,
        tasks = options(CodingTask::ALL.iter().map(|t| (t.slug(), t.label())), form.task.slug()),
        languages = options(
            ProgrammingLanguage::ALL.iter().map(|l| (l.slug(), l.label())),
            form.language.slug()
        ),
    );

    let mut body = format!(
        r#"<div class="card">
                <h3>{heading}</h3>
                <p class="info-text">Selected language: {language}</p>
            </div>
            <form id="mentor-form" method="post" action="/mentor/analyze">
                <label for="code">Enter your code or description:</label>
                <textarea id="code" name="code">{code}</textarea>
                <div class="buttons">
                    <button class="btn btn-secondary" type="submit" formaction="/mentor/clear">🧹 Clear History</button>
                    <button class="btn btn-secondary" type="submit" formaction="/mentor/format">🎨 Format Code</button>
                    <button class="btn" type="submit">🚀 Analyze Code</button>
                </div>
            </form>"#,
        heading = escape_html(form.task.heading()),
        language = escape_html(form.language.label()),
        code = escape_html(&form.code),
    );

    if !history.is_empty() {
        body.push_str(r#"<h2 class="sub-title">Analysis History</h2>"#);
        for entry in history {
            body.push_str(&format!(
                r#"<div class="card">
                <p><strong>Task:</strong> {task} ({language})</p>
                <p><strong>Code:</strong></p>
                <div class="code-block"><code>{code}</code></div>
                <div class="response-area"><p><strong>Analysis:</strong></p>{analysis}</div>
            </div>"#,
                task = escape_html(entry.task.label()),
                language = escape_html(entry.language.label()),
                code = escape_html(&entry.code),
                analysis = escape_html(&entry.analysis),
            ));
        }
    }

    body.push_str(&format!(
        r#"<details class="card">
                <summary>📚 Coding Resources &amp; Tips</summary>
                <h4>{language} Resources</h4>
                <ul><li>Official Documentation</li><li>Popular Libraries &amp; Frameworks</li><li>Style Guides</li><li>Common Design Patterns</li></ul>
                <h4>Best Practices</h4>
                <ul><li>Write clean, readable code</li><li>Add proper documentation</li><li>Follow naming conventions</li><li>Handle errors appropriately</li><li>Write unit tests</li></ul>
                <h4>Debugging Tips</h4>
                <ul><li>Use proper debugging tools</li><li>Add logging statements</li><li>Check common error patterns</li><li>Test edge cases</li><li>Review stack traces carefully</li></ul>
            </details>"#,
        language = escape_html(form.language.label()),
    ));

    render_page(PageLayout {
        title: "AI Coding Mentor",
        heading: "AI Coding Mentor 💻",
        sidebar,
        body,
        notices,
        footer: "<p>Code quality matters. Let's make it better together!</p><p class=\"info-text\">Happy coding! 🚀</p>",
    })
}
