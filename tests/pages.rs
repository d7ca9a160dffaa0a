// End-to-end checks of the page routes against a live router on a random local port

use async_trait::async_trait;
use axum::{
    extract::Query,
    response::{Html, Json},
    routing::get,
    Router,
};
use serde_json::{json, Value};
use std::collections::HashMap;
use std::net::SocketAddr;
use std::sync::{Arc, Mutex};
use std::time::Duration;

use study_hub::generation::{GenerationError, GenerationRequest, TextGenerator};
use study_hub::transcript::{
    FetchAttempt, FetchError, FetchPlan, TranscriptResolver, TranscriptSegment, TranscriptSource,
    YoutubeTranscriptSource,
};
use study_hub::{build_router, AppState};

struct EchoGenerator {
    requests: Mutex<Vec<GenerationRequest>>,
}

impl EchoGenerator {
    fn new() -> Arc<Self> {
        Arc::new(Self {
            requests: Mutex::new(Vec::new()),
        })
    }
}

#[async_trait]
impl TextGenerator for EchoGenerator {
    async fn generate(&self, request: &GenerationRequest) -> Result<String, GenerationError> {
        self.requests.lock().unwrap().push(request.clone());
        Ok(format!("generated for {} chars", request.content.len()))
    }

    fn describe(&self) -> String {
        "echo".to_string()
    }
}

struct Unavailable;

#[async_trait]
impl TranscriptSource for Unavailable {
    async fn fetch(
        &self,
        _video_id: &str,
        _attempt: &FetchAttempt,
    ) -> Result<Vec<TranscriptSegment>, FetchError> {
        Err(FetchError::NoCaptions)
    }
}

async fn spawn(router: Router) -> SocketAddr {
    let listener = tokio::net::TcpListener::bind("127.0.0.1:0").await.unwrap();
    let addr = listener.local_addr().unwrap();
    tokio::spawn(async move {
        axum::serve(listener, router).await.unwrap();
    });
    addr
}

async fn spawn_app(
    generator: Arc<dyn TextGenerator>,
    source: Arc<dyn TranscriptSource>,
    plan: FetchPlan,
) -> SocketAddr {
    let state = Arc::new(AppState::new(generator, TranscriptResolver::new(source, plan)));
    spawn(build_router(state)).await
}

fn client() -> reqwest::Client {
    reqwest::Client::builder()
        .redirect(reqwest::redirect::Policy::none())
        .build()
        .unwrap()
}

/// `name=value` part of the session Set-Cookie header
fn session_cookie(response: &reqwest::Response) -> Option<String> {
    response
        .headers()
        .get(reqwest::header::SET_COOKIE)
        .and_then(|v| v.to_str().ok())
        .and_then(|v| v.split(';').next())
        .map(|v| v.to_string())
}

async fn new_session(client: &reqwest::Client, addr: SocketAddr) -> String {
    let response = client.get(format!("http://{}/mentor", addr)).send().await.unwrap();
    assert!(response.status().is_success());
    session_cookie(&response).expect("first visit issues a session cookie")
}

async fn history(client: &reqwest::Client, addr: SocketAddr, cookie: &str) -> reqwest::Response {
    client
        .get(format!("http://{}/api/session/history", addr))
        .header(reqwest::header::COOKIE, cookie)
        .send()
        .await
        .unwrap()
}

#[tokio::test]
async fn test_first_visit_issues_cookie_once() {
    let addr = spawn_app(EchoGenerator::new(), Arc::new(Unavailable), FetchPlan::new(&[], &[])).await;
    let client = client();

    let cookie = new_session(&client, addr).await;
    assert!(cookie.starts_with("study_hub_session="));

    let again = client
        .get(format!("http://{}/lectures", addr))
        .header(reqwest::header::COOKIE, &cookie)
        .send()
        .await
        .unwrap();
    assert!(again.status().is_success());
    assert!(session_cookie(&again).is_none());
}

#[tokio::test]
async fn test_analysis_lands_in_session_history() {
    let generator = EchoGenerator::new();
    let addr = spawn_app(generator.clone(), Arc::new(Unavailable), FetchPlan::new(&[], &[])).await;
    let client = client();
    let cookie = new_session(&client, addr).await;

    let page = client
        .post(format!("http://{}/mentor/analyze", addr))
        .header(reqwest::header::COOKIE, &cookie)
        .form(&[("code", "print('hi')"), ("task", "debug_help"), ("language", "python")])
        .send()
        .await
        .unwrap()
        .text()
        .await
        .unwrap();
    assert!(page.contains("Analysis complete!"));

    let body: Value = history(&client, addr, &cookie).await.json().await.unwrap();
    let mentor = body["mentor"].as_array().unwrap();
    assert_eq!(mentor.len(), 1);
    assert_eq!(mentor[0]["code"], "print('hi')");
    assert_eq!(mentor[0]["task"], "debug_help");
    assert_eq!(body["lectures"].as_array().unwrap().len(), 0);

    let requests = generator.requests.lock().unwrap();
    assert_eq!(requests.len(), 1);
    assert!(requests[0].system_prompt.is_some());
}

#[tokio::test]
async fn test_sessions_are_isolated() {
    let addr = spawn_app(EchoGenerator::new(), Arc::new(Unavailable), FetchPlan::new(&[], &[])).await;
    let client = client();
    let alice = new_session(&client, addr).await;
    let bob = new_session(&client, addr).await;
    assert_ne!(alice, bob);

    client
        .post(format!("http://{}/mentor/analyze", addr))
        .header(reqwest::header::COOKIE, &alice)
        .form(&[("code", "SELECT 1"), ("language", "sql")])
        .send()
        .await
        .unwrap();

    let alice_history: Value = history(&client, addr, &alice).await.json().await.unwrap();
    let bob_history: Value = history(&client, addr, &bob).await.json().await.unwrap();
    assert_eq!(alice_history["mentor"].as_array().unwrap().len(), 1);
    assert_eq!(bob_history["mentor"].as_array().unwrap().len(), 0);
}

#[tokio::test]
async fn test_missing_transcript_reports_not_found() {
    let generator = EchoGenerator::new();
    let addr = spawn_app(generator.clone(), Arc::new(Unavailable), FetchPlan::new(&[], &[])).await;
    let client = client();
    let cookie = new_session(&client, addr).await;

    let page = client
        .post(format!("http://{}/lectures/summarize", addr))
        .header(reqwest::header::COOKIE, &cookie)
        .form(&[("url", "https://youtu.be/abc123"), ("style", "bullet_points"), ("length", "30")])
        .send()
        .await
        .unwrap()
        .text()
        .await
        .unwrap();

    assert!(page.contains("Could not retrieve transcript. Please ensure the video has subtitles enabled."));
    assert!(!page.contains("Transcript fetched successfully!"));
    assert!(generator.requests.lock().unwrap().is_empty());

    let body: Value = history(&client, addr, &cookie).await.json().await.unwrap();
    assert_eq!(body["lectures"].as_array().unwrap().len(), 0);
}

#[tokio::test]
async fn test_crafted_form_values_still_render_the_page() {
    let generator = EchoGenerator::new();
    let addr = spawn_app(generator.clone(), Arc::new(Unavailable), FetchPlan::new(&[], &[])).await;
    let client = client();
    let cookie = new_session(&client, addr).await;

    let response = client
        .post(format!("http://{}/mentor/analyze", addr))
        .header(reqwest::header::COOKIE, &cookie)
        .form(&[("code", "x = 1"), ("task", "nope"), ("language", "rust")])
        .send()
        .await
        .unwrap();
    assert_eq!(response.status(), reqwest::StatusCode::OK);
    assert!(response.text().await.unwrap().contains("Analysis complete!"));

    let response = client
        .post(format!("http://{}/lectures/summarize", addr))
        .header(reqwest::header::COOKIE, &cookie)
        .form(&[("url", "https://youtu.be/abc123"), ("style", "haiku"), ("length", "abc")])
        .send()
        .await
        .unwrap();
    assert_eq!(response.status(), reqwest::StatusCode::OK);
    assert!(response
        .text()
        .await
        .unwrap()
        .contains("Could not retrieve transcript."));

    let body: Value = history(&client, addr, &cookie).await.json().await.unwrap();
    assert_eq!(body["mentor"][0]["task"], "code_review");
    assert_eq!(body["mentor"][0]["language"], "python");
}

#[tokio::test]
async fn test_end_session_discards_history() {
    let addr = spawn_app(EchoGenerator::new(), Arc::new(Unavailable), FetchPlan::new(&[], &[])).await;
    let client = client();
    let cookie = new_session(&client, addr).await;

    let response = client
        .post(format!("http://{}/session/end", addr))
        .header(reqwest::header::COOKIE, &cookie)
        .send()
        .await
        .unwrap();
    assert!(response.status().is_redirection());
    assert_eq!(session_cookie(&response).as_deref(), Some("study_hub_session="));

    let ended = history(&client, addr, &cookie).await;
    assert_eq!(ended.status(), reqwest::StatusCode::NOT_FOUND);
    let body: Value = ended.json().await.unwrap();
    assert_eq!(body["success"], false);

    // The stale cookie gets a fresh session on the next page view
    let response = client
        .get(format!("http://{}/lectures", addr))
        .header(reqwest::header::COOKIE, &cookie)
        .send()
        .await
        .unwrap();
    let renewed = session_cookie(&response).expect("a new session cookie");
    assert_ne!(renewed, cookie);
}

#[tokio::test]
async fn test_status_reports_services() {
    let addr = spawn_app(EchoGenerator::new(), Arc::new(Unavailable), FetchPlan::new(&[], &[])).await;
    let client = client();
    new_session(&client, addr).await;

    let body: Value = client
        .get(format!("http://{}/api/status", addr))
        .send()
        .await
        .unwrap()
        .json()
        .await
        .unwrap();

    assert_eq!(body["status"], "operational");
    assert_eq!(body["services"]["generation"]["status"], "configured");
    assert_eq!(body["services"]["generation"]["backend"], "echo");
    assert!(body["services"]["transcripts"]["fetch_attempts"].as_u64().unwrap() >= 1);
    assert_eq!(body["active_sessions"], 1);
}

// A stand-in for youtube.com: a watch page with one caption track and its json3 body
async fn spawn_fake_youtube() -> SocketAddr {
    let listener = tokio::net::TcpListener::bind("127.0.0.1:0").await.unwrap();
    let addr = listener.local_addr().unwrap();

    let watch = move |Query(params): Query<HashMap<String, String>>| async move {
        let video_id = params.get("v").cloned().unwrap_or_default();
        let captions = json!({
            "playerCaptionsTracklistRenderer": {
                "captionTracks": [{
                    "baseUrl": format!("http://{}/api/timedtext?v={}&lang=en", addr, video_id),
                    "languageCode": "en"
                }]
            }
        });
        Html(format!(
            r#"<html><script>var ytInitialPlayerResponse = {{"playabilityStatus": {{"status": "OK"}}, "captions": {}, "videoDetails": {{"videoId": "{}"}}}};</script></html>"#,
            captions, video_id
        ))
    };
    let timedtext = || async {
        Json(json!({
            "events": [
                {"tStartMs": 0, "dDurationMs": 1500, "segs": [{"utf8": "welcome to"}, {"utf8": " the lecture"}]},
                {"tStartMs": 1500, "dDurationMs": 2000, "segs": [{"utf8": "today we cover graphs"}]}
            ]
        }))
    };

    let router = Router::new()
        .route("/watch", get(watch))
        .route("/api/timedtext", get(timedtext));
    tokio::spawn(async move {
        axum::serve(listener, router).await.unwrap();
    });
    addr
}

#[tokio::test]
async fn test_lecture_summary_from_youtube_captions() {
    let youtube = spawn_fake_youtube().await;
    let source = YoutubeTranscriptSource::new(format!("http://{}", youtube), Duration::from_secs(5));
    let generator = EchoGenerator::new();
    let addr = spawn_app(generator.clone(), Arc::new(source), FetchPlan::new(&[], &[])).await;
    let client = client();
    let cookie = new_session(&client, addr).await;

    let page = client
        .post(format!("http://{}/lectures/summarize", addr))
        .header(reqwest::header::COOKIE, &cookie)
        .form(&[
            ("url", "https://www.youtube.com/watch?v=lecture42"),
            ("style", "detailed"),
            ("length", "40"),
        ])
        .send()
        .await
        .unwrap()
        .text()
        .await
        .unwrap();

    assert!(page.contains("Transcript fetched successfully!"));
    assert!(page.contains("Summary generated successfully!"));

    {
        let requests = generator.requests.lock().unwrap();
        assert_eq!(requests.len(), 1);
        assert!(requests[0].content.contains("welcome to the lecture"));
        assert!(requests[0].content.contains("today we cover graphs"));
    }

    let body: Value = history(&client, addr, &cookie).await.json().await.unwrap();
    let lectures = body["lectures"].as_array().unwrap();
    assert_eq!(lectures.len(), 1);
    assert_eq!(lectures[0]["url"], "https://www.youtube.com/watch?v=lecture42");
    assert_eq!(lectures[0]["length"], 40);
}
