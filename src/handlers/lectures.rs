// src/handlers/lectures.rs
//! Lecture Summaries page: fetch a YouTube transcript, summarize it, keep the summaries per session.

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
use crate::models::{LectureSummary, SummaryLength, SummaryStyle};
use crate::prompts;
use crate::session::SessionId;
use crate::transcript::ResolveError;
use crate::AppState;

pub const MISSING_URL_MESSAGE: &str = "Please provide a valid YouTube URL with available transcript.";
pub const NOT_FOUND_MESSAGE: &str =
    "Could not retrieve transcript. Please ensure the video has subtitles enabled.";

#[derive(Debug, Clone, Default, Deserialize)]
pub struct LectureForm {
    #[serde(default)]
    pub url: String,
    #[serde(default, deserialize_with = "super::lenient")]
    pub style: SummaryStyle,
    #[serde(default, deserialize_with = "super::lenient")]
    pub length: SummaryLength,
}

pub fn lecture_routes() -> Router {
    Router::new()
        .route("/lectures", get(lectures_page))
        .route("/lectures/summarize", post(summarize_handler))
        .route("/lectures/clear", post(clear_handler))
}

async fn lectures_page(
    Extension(state): Extension<Arc<AppState>>,
    headers: HeaderMap,
    Query(form): Query<LectureForm>,
) -> Page {
    let session = open_session(&state, &headers).await;
    Page {
        session,
        html: render(&state, session.id, &form, &[]).await,
    }
}

async fn summarize_handler(
    Extension(state): Extension<Arc<AppState>>,
    headers: HeaderMap,
    Form(form): Form<LectureForm>,
) -> Page {
    let session = open_session(&state, &headers).await;
    let notices = summarize_lecture(&state, session.id, &form).await;
    Page {
        session,
        html: render(&state, session.id, &form, &notices).await,
    }
}

async fn clear_handler(
    Extension(state): Extension<Arc<AppState>>,
    headers: HeaderMap,
    Form(form): Form<LectureForm>,
) -> Page {
    let session = open_session(&state, &headers).await;
    let notice = clear_history(&state, session.id).await;
    Page {
        session,
        html: render(&state, session.id, &form, &[notice]).await,
    }
}

/// Resolve the transcript, summarize it and record the summary.
/// Returns the notices to show, in the order the steps happened.
pub async fn summarize_lecture(state: &AppState, session: SessionId, form: &LectureForm) -> Vec<Notice> {
    let mut notices = Vec::new();
    if let Err(e) = run_summary(state, session, form, &mut notices).await {
        notices.push(Notice::error(summary_error_message(&e)));
    }
    notices
}

async fn run_summary(
    state: &AppState,
    session: SessionId,
    form: &LectureForm,
    notices: &mut Vec<Notice>,
) -> Result<(), AppError> {
    let url = form.url.trim();
    if url.is_empty() {
        return Err(AppError::Input(MISSING_URL_MESSAGE.to_string()));
    }

    let transcript = state.transcripts.resolve(url).await?;
    notices.push(Notice::success("Transcript fetched successfully!"));

    let request = GenerationRequest::new(transcript.text())
        .with_system_prompt(prompts::summary_system_prompt(form.style, form.length));
    let summary = state.generator.generate(&request).await?;
    tracing::info!(
        "📹 {} summary for video {} generated ({} transcript segments)",
        form.style.label(),
        transcript.video_id,
        transcript.segments.len()
    );

    let entry = LectureSummary::new(url, summary, form.style, form.length);
    state
        .sessions
        .with_session(session, |s| s.lectures.append(entry))
        .await
        .ok_or(AppError::SessionExpired)?;

    notices.push(Notice::success("Summary generated successfully!"));
    Ok(())
}

fn summary_error_message(error: &AppError) -> String {
    match error {
        AppError::Resolve(ResolveError::InvalidUrl) => "Invalid YouTube URL format".to_string(),
        AppError::Resolve(ResolveError::NotFound { .. }) => NOT_FOUND_MESSAGE.to_string(),
        AppError::Generation(e) => format!("Summarization failed: {}", e),
        other => other.to_string(),
    }
}

pub async fn clear_history(state: &AppState, session: SessionId) -> Notice {
    match state.sessions.with_session(session, |s| s.lectures.clear()).await {
        Some(()) => Notice::success("History cleared!"),
        None => Notice::error(AppError::SessionExpired.to_string()),
    }
}

async fn render(state: &AppState, session: SessionId, form: &LectureForm, notices: &[Notice]) -> String {
    let history = state
        .sessions
        .with_session(session, |s| s.lectures.list_most_recent_first().cloned().collect::<Vec<_>>())
        .await
        .unwrap_or_default();
    render_lectures_page(form, notices, &history)
}

/// `history` must already be most recent first
pub fn render_lectures_page(form: &LectureForm, notices: &[Notice], history: &[LectureSummary]) -> String {
    let sidebar = format!(
        r#"<h2 class="sub-title">Summary Options</h2>
        <label for="style">Summary Type</label>
        <select id="style" name="style" form="lecture-form">{styles}</select>
        <label for="length">Summary Length (% of original): <span id="length-value">{length}</span>%</label>
        <input id="length" name="length" form="lecture-form" type="range" min="{min}" max="{max}" step="{step}" value="{length}"
            oninput="document.getElementById('length-value').textContent = this.value">"#,
        styles = options(SummaryStyle::ALL.iter().map(|s| (s.slug(), s.label())), form.style.slug()),
        length = form.length.percent(),
        min = SummaryLength::MIN,
        max = SummaryLength::MAX,
        step = SummaryLength::STEP,
    );

    let mut body = format!(
        r#"<div class="card">
                <h3>Summarize Video Lectures</h3>
                <p class="info-text">Transform lengthy video lectures into concise, structured summaries.</p>
            </div>
            <form id="lecture-form" method="post" action="/lectures/summarize">
                <label for="url">📺 YouTube Video URL</label>
                <input id="url" name="url" type="text" placeholder="Paste the video URL here..." value="{url}">
                <div class="buttons">
                    <button class="btn btn-secondary" type="submit" formaction="/lectures/clear">🧹 Clear History</button>
                    <button class="btn" type="submit">📝 Generate Summary</button>
                </div>
            </form>"#,
        url = escape_html(&form.url),
    );

    if !history.is_empty() {
        body.push_str(r#"<h2 class="sub-title">Generated Summaries</h2>"#);
        let total = history.len();
        for (idx, entry) in history.iter().enumerate() {
            let url = escape_html(&entry.url);
            body.push_str(&format!(
                r#"<details class="card"{open}>
                <summary>Summary {number} - {style}</summary>
                <p><strong>Video URL:</strong> <a href="{url}" target="_blank" rel="noopener">{url}</a></p>
                <div class="response-area"><p><strong>Summary ({length}% length):</strong></p>{summary}</div>
            </details>"#,
                open = if idx == 0 { " open" } else { "" },
                number = total - idx,
                style = escape_html(entry.style.label()),
                url = url,
                length = entry.length.percent(),
                summary = escape_html(&entry.summary),
            ));
        }
    }

    let style_tips: String = SummaryStyle::ALL
        .iter()
        .map(|s| format!("<li><em>{}</em>: {}</li>", s.label(), s.hint()))
        .collect();
    body.push_str(&format!(
        r#"<details class="card">
                <summary>📚 Tips for Better Summaries</summary>
                <ol>
                    <li><strong>Choose Clear Videos</strong>: Select videos with good audio quality for better transcription</li>
                    <li><strong>Select Appropriate Summary Type</strong>:<ul>{style_tips}</ul></li>
                    <li><strong>Adjust Length</strong>: Use the slider to find the optimal summary length</li>
                    <li><strong>Check Transcript</strong>: Ensure the video has available subtitles/transcript</li>
                </ol>
            </details>"#,
        style_tips = style_tips,
    ));

    render_page(PageLayout {
        title: "Lecture Summaries",
        heading: "Lecture Summaries 📹",
        sidebar,
        body,
        notices,
        footer: "<p>Transform your learning experience with AI-powered lecture summaries!</p><p class=\"info-text\">Happy learning! 📚</p>",
    })
}
