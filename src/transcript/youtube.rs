// src/transcript/youtube.rs
// Caption retrieval straight from YouTube's watch page and timedtext endpoint.
// No API key needed: the player response embedded in the watch page lists the caption tracks.

use async_trait::async_trait;
use regex::Regex;
use reqwest::header::{ACCEPT_LANGUAGE, COOKIE};
use reqwest::{Client, Url};
use serde::Deserialize;
use std::time::Duration;

use super::source::{FetchAttempt, FetchError, TranscriptSegment, TranscriptSource, CONSENT_COOKIE};

lazy_static::lazy_static! {
    static ref CAPTIONS_RE: Regex =
        Regex::new(r#"(?s)"captions":\s*(\{.*?\}),\s*"videoDetails""#).expect("valid captions regex");
    static ref PLAYABILITY_RE: Regex =
        Regex::new(r#""playabilityStatus":\s*\{"status":\s*"([A-Z_]+)""#).expect("valid playability regex");
}

const DEFAULT_LANGUAGE: &str = "en";
const AUTO_LANGUAGE: &str = "auto";

#[derive(Debug, Deserialize)]
struct CaptionsBlock {
    #[serde(rename = "playerCaptionsTracklistRenderer")]
    tracklist: Option<Tracklist>,
}

#[derive(Debug, Deserialize)]
struct Tracklist {
    #[serde(rename = "captionTracks", default)]
    caption_tracks: Vec<CaptionTrack>,
}

#[derive(Debug, Clone, Deserialize)]
struct CaptionTrack {
    #[serde(rename = "baseUrl")]
    base_url: String,
    #[serde(rename = "languageCode")]
    language_code: String,
    /// `"asr"` for auto-generated tracks
    #[serde(default)]
    kind: Option<String>,
}

impl CaptionTrack {
    fn is_generated(&self) -> bool {
        self.kind.as_deref() == Some("asr")
    }
}

#[derive(Debug, Deserialize)]
struct Json3Body {
    #[serde(default)]
    events: Vec<Json3Event>,
}

#[derive(Debug, Deserialize)]
struct Json3Event {
    #[serde(rename = "tStartMs", default)]
    start_ms: u64,
    #[serde(rename = "dDurationMs", default)]
    duration_ms: u64,
    #[serde(default)]
    segs: Vec<Json3Seg>,
}

#[derive(Debug, Deserialize)]
struct Json3Seg {
    #[serde(default)]
    utf8: String,
}

#[derive(Debug, Clone)]
pub struct YoutubeTranscriptSource {
    base_url: String,
    timeout: Duration,
}

impl YoutubeTranscriptSource {
    pub fn new(base_url: impl Into<String>, timeout: Duration) -> Self {
        Self {
            base_url: base_url.into(),
            timeout,
        }
    }

    fn client_for(&self, attempt: &FetchAttempt) -> Result<Client, FetchError> {
        let mut builder = Client::builder().timeout(self.timeout);
        builder = match &attempt.proxy {
            Some(proxy) => builder.proxy(proxy.to_reqwest()?),
            None => builder.no_proxy(),
        };
        Ok(builder.build()?)
    }

    async fn get_text(
        &self,
        client: &Client,
        url: &str,
        attempt: &FetchAttempt,
    ) -> Result<String, FetchError> {
        let mut request = client.get(url).header(ACCEPT_LANGUAGE, "en-US");
        if attempt.send_consent_cookie {
            request = request.header(COOKIE, CONSENT_COOKIE);
        }

        let response = request.send().await?;
        let status = response.status();
        if status.as_u16() == 429 {
            return Err(FetchError::Blocked("too many requests".to_string()));
        }
        if !status.is_success() {
            return Err(FetchError::Status {
                status: status.as_u16(),
                url: url.to_string(),
            });
        }

        Ok(response.text().await?)
    }
}

#[async_trait]
impl TranscriptSource for YoutubeTranscriptSource {
    async fn fetch(
        &self,
        video_id: &str,
        attempt: &FetchAttempt,
    ) -> Result<Vec<TranscriptSegment>, FetchError> {
        let client = self.client_for(attempt)?;

        let watch_url = format!("{}/watch?v={}", self.base_url, urlencoding::encode(video_id));
        let html = self.get_text(&client, &watch_url, attempt).await?;

        let tracks = parse_caption_tracks(&html)?;
        let track = select_track(&tracks, attempt.language.as_deref())?;
        tracing::debug!(
            "Selected caption track {} (generated: {}) for {}",
            track.language_code,
            track.is_generated(),
            video_id
        );

        let track_url = json3_url(&track.base_url)?;

        let body = self.get_text(&client, track_url.as_str(), attempt).await?;
        let segments = parse_json3(&body)?;
        if segments.is_empty() {
            return Err(FetchError::Empty);
        }

        Ok(segments)
    }
}

fn parse_caption_tracks(html: &str) -> Result<Vec<CaptionTrack>, FetchError> {
    if html.contains("class=\"g-recaptcha\"") {
        return Err(FetchError::Blocked("captcha challenge".to_string()));
    }

    let Some(captures) = CAPTIONS_RE.captures(html) else {
        if let Some(status) = PLAYABILITY_RE.captures(html).map(|c| c[1].to_string()) {
            if status != "OK" {
                return Err(FetchError::Unplayable(status));
            }
        }
        return Err(FetchError::NoCaptions);
    };

    let block: CaptionsBlock = serde_json::from_str(&captures[1])?;
    let tracks = block
        .tracklist
        .map(|t| t.caption_tracks)
        .unwrap_or_default();

    if tracks.is_empty() {
        return Err(FetchError::NoCaptions);
    }
    Ok(tracks)
}

/// Manually created tracks win over generated ones for the same language;
/// the `auto` hint picks the first generated track whatever its language.
fn select_track<'a>(
    tracks: &'a [CaptionTrack],
    language: Option<&str>,
) -> Result<&'a CaptionTrack, FetchError> {
    let wanted = language.unwrap_or(DEFAULT_LANGUAGE);

    let found = if wanted == AUTO_LANGUAGE {
        tracks.iter().find(|t| t.is_generated())
    } else {
        tracks
            .iter()
            .filter(|t| t.language_code == wanted)
            .min_by_key(|t| t.is_generated())
    };

    found.ok_or_else(|| FetchError::NoMatchingLanguage(wanted.to_string()))
}

/// Caption track URL asking for the json3 format. Track URLs may already carry
/// another `fmt` (usually `srv3`), which is dropped rather than duplicated.
fn json3_url(base_url: &str) -> Result<Url, FetchError> {
    let mut url = Url::parse(base_url)
        .map_err(|e| FetchError::Malformed(format!("caption track url: {}", e)))?;
    let kept: Vec<(String, String)> = url
        .query_pairs()
        .filter(|(key, _)| key != "fmt")
        .map(|(key, value)| (key.into_owned(), value.into_owned()))
        .collect();

    url.query_pairs_mut()
        .clear()
        .extend_pairs(kept)
        .append_pair("fmt", "json3");
    Ok(url)
}

fn parse_json3(body: &str) -> Result<Vec<TranscriptSegment>, FetchError> {
    let parsed: Json3Body = serde_json::from_str(body)?;

    Ok(parsed
        .events
        .into_iter()
        .filter_map(|event| {
            let text: String = event.segs.iter().map(|s| s.utf8.as_str()).collect();
            let text = text.trim();
            if text.is_empty() {
                return None;
            }
            Some(TranscriptSegment::new(
                text,
                event.start_ms as f64 / 1000.0,
                event.duration_ms as f64 / 1000.0,
            ))
        })
        .collect())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::transcript::source::{ProxyConfig, ProxyScope};
    use axum::{
        http::{header::HOST, HeaderMap, Uri},
        response::{Html, IntoResponse, Json, Response},
        Router,
    };
    use serde_json::json;
    use std::net::SocketAddr;
    use std::sync::{Arc, Mutex};

    fn track(lang: &str, kind: Option<&str>) -> CaptionTrack {
        CaptionTrack {
            base_url: format!("https://www.youtube.com/api/timedtext?v=x&lang={}", lang),
            language_code: lang.to_string(),
            kind: kind.map(str::to_string),
        }
    }

    #[test]
    fn test_parse_caption_tracks_from_player_response() {
        let html = r#"<script>var ytInitialPlayerResponse = {"playabilityStatus":{"status":"OK"},"captions":{"playerCaptionsTracklistRenderer":{"captionTracks":[{"baseUrl":"https://www.youtube.com/api/timedtext?v=abc&lang=en","name":{"runs":[{"text":"English"}]},"languageCode":"en"},{"baseUrl":"https://www.youtube.com/api/timedtext?v=abc&lang=en&kind=asr","languageCode":"en","kind":"asr"}]}},"videoDetails":{"videoId":"abc"}};</script>"#;

        let tracks = parse_caption_tracks(html).unwrap();
        assert_eq!(tracks.len(), 2);
        assert_eq!(tracks[0].base_url, "https://www.youtube.com/api/timedtext?v=abc&lang=en");
        assert!(tracks[1].is_generated());
    }

    #[test]
    fn test_missing_captions_and_unplayable_videos() {
        let no_captions = r#"{"playabilityStatus":{"status":"OK"},"videoDetails":{}}"#;
        assert!(matches!(parse_caption_tracks(no_captions), Err(FetchError::NoCaptions)));

        let private = r#"{"playabilityStatus":{"status":"LOGIN_REQUIRED"},"videoDetails":{}}"#;
        assert!(matches!(
            parse_caption_tracks(private),
            Err(FetchError::Unplayable(s)) if s == "LOGIN_REQUIRED"
        ));

        let captcha = r#"<div class="g-recaptcha"></div>"#;
        assert!(matches!(parse_caption_tracks(captcha), Err(FetchError::Blocked(_))));
    }

    #[test]
    fn test_select_track_prefers_manual_captions() {
        let tracks = vec![track("en", Some("asr")), track("de", None), track("en", None)];

        let chosen = select_track(&tracks, None).unwrap();
        assert_eq!(chosen.language_code, "en");
        assert!(!chosen.is_generated());

        let german = select_track(&tracks, Some("de")).unwrap();
        assert_eq!(german.language_code, "de");

        assert!(matches!(
            select_track(&tracks, Some("en-GB")),
            Err(FetchError::NoMatchingLanguage(lang)) if lang == "en-GB"
        ));
    }

    #[test]
    fn test_auto_hint_picks_generated_track() {
        let tracks = vec![track("fr", None), track("fr", Some("asr"))];
        let chosen = select_track(&tracks, Some("auto")).unwrap();
        assert!(chosen.is_generated());

        let manual_only = vec![track("fr", None)];
        assert!(select_track(&manual_only, Some("auto")).is_err());
    }

    #[test]
    fn test_parse_json3_skips_blank_events() {
        let body = r#"{"events":[
            {"tStartMs":0,"dDurationMs":1500,"segs":[{"utf8":"hello "},{"utf8":"world"}]},
            {"tStartMs":1500,"dDurationMs":10,"segs":[{"utf8":"\n"}]},
            {"tStartMs":2000}
            ,{"tStartMs":2500,"dDurationMs":1000,"segs":[{"utf8":"again"}]}
        ]}"#;

        let segments = parse_json3(body).unwrap();
        assert_eq!(
            segments,
            vec![
                TranscriptSegment::new("hello world", 0.0, 1.5),
                TranscriptSegment::new("again", 2.5, 1.0),
            ]
        );
    }

    #[test]
    fn test_json3_url_replaces_existing_format() {
        let url = json3_url("https://www.youtube.com/api/timedtext?v=abc&lang=en&fmt=srv3&name=").unwrap();

        let formats: Vec<_> = url
            .query_pairs()
            .filter(|(key, _)| key == "fmt")
            .map(|(_, value)| value.into_owned())
            .collect();
        assert_eq!(formats, vec!["json3"]);
        assert_eq!(url.query(), Some("v=abc&lang=en&name=&fmt=json3"));

        let plain = json3_url("https://www.youtube.com/api/timedtext?v=abc&lang=en").unwrap();
        assert_eq!(plain.query(), Some("v=abc&lang=en&fmt=json3"));
    }

    #[derive(Debug, Clone)]
    struct Seen {
        host: String,
        path: String,
        query: String,
        cookie: Option<String>,
    }

    /// Plays youtube.com for any host it is asked about (directly or as a forward proxy)
    /// and records every request. Caption tracks point back at the requested host and
    /// carry `fmt=srv3` the way real track URLs often do.
    async fn recording_youtube() -> (SocketAddr, Arc<Mutex<Vec<Seen>>>) {
        let seen = Arc::new(Mutex::new(Vec::new()));
        let recorder = seen.clone();

        let app = Router::new().fallback(move |uri: Uri, headers: HeaderMap| {
            let recorder = recorder.clone();
            async move {
                let host = uri
                    .authority()
                    .map(|a| a.to_string())
                    .or_else(|| {
                        headers
                            .get(HOST)
                            .and_then(|v| v.to_str().ok())
                            .map(str::to_string)
                    })
                    .unwrap_or_default();
                recorder.lock().unwrap().push(Seen {
                    host: host.clone(),
                    path: uri.path().to_string(),
                    query: uri.query().unwrap_or_default().to_string(),
                    cookie: headers
                        .get(COOKIE)
                        .and_then(|v| v.to_str().ok())
                        .map(str::to_string),
                });

                if uri.path() == "/watch" {
                    let captions = json!({
                        "playerCaptionsTracklistRenderer": {
                            "captionTracks": [{
                                "baseUrl": format!("http://{}/api/timedtext?v=vid1&lang=en&fmt=srv3", host),
                                "languageCode": "en"
                            }]
                        }
                    });
                    let page = format!(
                        r#"<script>var ytInitialPlayerResponse = {{"playabilityStatus":{{"status":"OK"}},"captions":{},"videoDetails":{{"videoId":"vid1"}}}};</script>"#,
                        captions
                    );
                    Html(page).into_response()
                } else {
                    let body: Response = Json(json!({
                        "events": [{"tStartMs": 0, "dDurationMs": 1000, "segs": [{"utf8": "hello class"}]}]
                    }))
                    .into_response();
                    body
                }
            }
        });

        let listener = tokio::net::TcpListener::bind("127.0.0.1:0").await.unwrap();
        let addr = listener.local_addr().unwrap();
        tokio::spawn(async move {
            axum::serve(listener, app).await.unwrap();
        });
        (addr, seen)
    }

    fn source(base_url: String) -> YoutubeTranscriptSource {
        YoutubeTranscriptSource::new(base_url, Duration::from_secs(5))
    }

    #[tokio::test]
    async fn test_direct_attempt_sends_consent_cookie_and_asks_for_json3() {
        let (addr, seen) = recording_youtube().await;

        let segments = source(format!("http://{}", addr))
            .fetch("vid1", &FetchAttempt::direct())
            .await
            .unwrap();
        assert_eq!(segments, vec![TranscriptSegment::new("hello class", 0.0, 1.0)]);

        let seen = seen.lock().unwrap().clone();
        assert_eq!(seen.len(), 2);
        assert_eq!(seen[0].path, "/watch");
        assert!(seen
            .iter()
            .all(|s| s.cookie.as_deref() == Some(CONSENT_COOKIE)));
        assert_eq!(seen[1].path, "/api/timedtext");
        assert_eq!(seen[1].query, "v=vid1&lang=en&fmt=json3");
    }

    #[tokio::test]
    async fn test_language_attempt_sends_no_cookie() {
        let (addr, seen) = recording_youtube().await;

        source(format!("http://{}", addr))
            .fetch("vid1", &FetchAttempt::with_language("en"))
            .await
            .unwrap();

        let seen = seen.lock().unwrap().clone();
        assert_eq!(seen.len(), 2);
        assert!(seen.iter().all(|s| s.cookie.is_none()));
    }

    #[tokio::test]
    async fn test_proxy_attempt_goes_through_proxy() {
        let (proxy_addr, seen) = recording_youtube().await;
        let attempt = FetchAttempt::via_proxy(ProxyConfig::new(
            ProxyScope::All,
            format!("http://{}", proxy_addr),
        ));

        // the target host does not resolve; only the proxy can answer
        let segments = source("http://youtube.invalid".to_string())
            .fetch("vid1", &attempt)
            .await
            .unwrap();
        assert_eq!(segments.len(), 1);

        let seen = seen.lock().unwrap().clone();
        assert_eq!(seen.len(), 2);
        assert!(seen.iter().all(|s| s.host == "youtube.invalid"));
        assert!(seen
            .iter()
            .all(|s| s.cookie.as_deref() == Some(CONSENT_COOKIE)));
    }
}
