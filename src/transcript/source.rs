// src/transcript/source.rs
//! Transcript backend seam: attempt descriptors, proxy settings and the source trait

use async_trait::async_trait;
use serde::Serialize;
use std::fmt;

/// Consent cookie sent with every proxy-phase attempt so YouTube skips its cookie wall
pub const CONSENT_COOKIE: &str = "CONSENT=YES+1";

/// Which outbound traffic a proxy applies to
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ProxyScope {
    Http,
    Https,
    All,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ProxyConfig {
    pub scope: ProxyScope,
    pub url: String,
}

impl ProxyConfig {
    pub fn new(scope: ProxyScope, url: impl Into<String>) -> Self {
        Self {
            scope,
            url: url.into(),
        }
    }

    pub fn to_reqwest(&self) -> Result<reqwest::Proxy, reqwest::Error> {
        match self.scope {
            ProxyScope::Http => reqwest::Proxy::http(&self.url),
            ProxyScope::Https => reqwest::Proxy::https(&self.url),
            ProxyScope::All => reqwest::Proxy::all(&self.url),
        }
    }
}

impl fmt::Display for ProxyConfig {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let scope = match self.scope {
            ProxyScope::Http => "http",
            ProxyScope::Https => "https",
            ProxyScope::All => "all",
        };
        write!(f, "{}={}", scope, self.url)
    }
}

/// One transcript retrieval attempt
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FetchAttempt {
    pub proxy: Option<ProxyConfig>,
    /// `None` means the backend's default preference (English)
    pub language: Option<String>,
    pub send_consent_cookie: bool,
}

impl FetchAttempt {
    pub fn direct() -> Self {
        Self {
            proxy: None,
            language: None,
            send_consent_cookie: true,
        }
    }

    pub fn via_proxy(proxy: ProxyConfig) -> Self {
        Self {
            proxy: Some(proxy),
            language: None,
            send_consent_cookie: true,
        }
    }

    pub fn with_language(language: impl Into<String>) -> Self {
        Self {
            proxy: None,
            language: Some(language.into()),
            send_consent_cookie: false,
        }
    }
}

impl fmt::Display for FetchAttempt {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match (&self.proxy, &self.language) {
            (Some(proxy), Some(lang)) => write!(f, "proxy {} lang {}", proxy, lang),
            (Some(proxy), None) => write!(f, "proxy {}", proxy),
            (None, Some(lang)) => write!(f, "direct lang {}", lang),
            (None, None) => write!(f, "direct"),
        }
    }
}

/// One timed caption unit
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct TranscriptSegment {
    pub text: String,
    pub start: f64,
    pub duration: f64,
}

impl TranscriptSegment {
    pub fn new(text: impl Into<String>, start: f64, duration: f64) -> Self {
        Self {
            text: text.into(),
            start,
            duration,
        }
    }
}

#[derive(Debug, thiserror::Error)]
pub enum FetchError {
    #[error("HTTP error: {0}")]
    Http(#[from] reqwest::Error),

    #[error("Unexpected status {status} from {url}")]
    Status { status: u16, url: String },

    #[error("Request blocked: {0}")]
    Blocked(String),

    #[error("Video is not playable: {0}")]
    Unplayable(String),

    #[error("Captions are disabled for this video")]
    NoCaptions,

    #[error("No caption track for language '{0}'")]
    NoMatchingLanguage(String),

    #[error("Malformed response: {0}")]
    Malformed(String),

    #[error("Transcript contained no segments")]
    Empty,
}

impl From<serde_json::Error> for FetchError {
    fn from(e: serde_json::Error) -> Self {
        FetchError::Malformed(e.to_string())
    }
}

/// A backend that can fetch the caption segments of a video under one attempt configuration
#[async_trait]
pub trait TranscriptSource: Send + Sync {
    async fn fetch(
        &self,
        video_id: &str,
        attempt: &FetchAttempt,
    ) -> Result<Vec<TranscriptSegment>, FetchError>;
}
