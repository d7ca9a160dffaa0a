// src/transcript/resolver.rs
//! Ordered-fallback transcript resolution.
//!
//! A [`FetchPlan`] lists every attempt up front: direct, then each proxy, then each
//! language hint. The resolver walks the plan in order and stops at the first attempt
//! that yields segments. Failure reasons are collected and logged but never shown to
//! the user; the caller only learns whether a transcript was found.

use std::sync::Arc;

use super::source::{FetchAttempt, ProxyConfig, TranscriptSegment, TranscriptSource};
use super::video_id::extract_video_id;

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FetchPlan {
    attempts: Vec<FetchAttempt>,
}

impl FetchPlan {
    /// Direct attempt first, then one per proxy, then one per language hint
    pub fn new(proxies: &[ProxyConfig], languages: &[String]) -> Self {
        let attempts = std::iter::once(FetchAttempt::direct())
            .chain(proxies.iter().cloned().map(FetchAttempt::via_proxy))
            .chain(languages.iter().map(FetchAttempt::with_language))
            .collect();
        Self { attempts }
    }

    pub fn from_attempts(attempts: Vec<FetchAttempt>) -> Self {
        Self { attempts }
    }

    pub fn attempts(&self) -> &[FetchAttempt] {
        &self.attempts
    }
}

#[derive(Debug, Clone)]
pub struct AttemptFailure {
    pub attempt: FetchAttempt,
    pub reason: String,
}

#[derive(Debug, thiserror::Error)]
pub enum ResolveError {
    #[error("Invalid YouTube URL format")]
    InvalidUrl,

    #[error("Could not retrieve transcript for video {video_id} ({} attempts failed)", .failures.len())]
    NotFound {
        video_id: String,
        failures: Vec<AttemptFailure>,
    },
}

/// A fully retrieved transcript
#[derive(Debug, Clone)]
pub struct Transcript {
    pub video_id: String,
    pub segments: Vec<TranscriptSegment>,
    /// The attempt that produced the segments
    pub attempt: FetchAttempt,
}

impl Transcript {
    /// Segment texts in source order, separated by single spaces
    pub fn text(&self) -> String {
        join_segments(&self.segments)
    }
}

pub fn join_segments(segments: &[TranscriptSegment]) -> String {
    segments
        .iter()
        .map(|s| s.text.as_str())
        .collect::<Vec<_>>()
        .join(" ")
}

#[derive(Clone)]
pub struct TranscriptResolver {
    source: Arc<dyn TranscriptSource>,
    plan: FetchPlan,
}

impl TranscriptResolver {
    pub fn new(source: Arc<dyn TranscriptSource>, plan: FetchPlan) -> Self {
        Self { source, plan }
    }

    pub fn plan(&self) -> &FetchPlan {
        &self.plan
    }

    /// Parse the URL and fetch its transcript. An unrecognized URL fails before any network call.
    pub async fn resolve(&self, url: &str) -> Result<Transcript, ResolveError> {
        let video_id = extract_video_id(url).ok_or(ResolveError::InvalidUrl)?;
        self.fetch(&video_id).await
    }

    pub async fn fetch(&self, video_id: &str) -> Result<Transcript, ResolveError> {
        let mut failures = Vec::new();

        for attempt in self.plan.attempts() {
            match self.source.fetch(video_id, attempt).await {
                Ok(segments) if !segments.is_empty() => {
                    tracing::info!(
                        "📝 Transcript for {} fetched via {} after {} failed attempts",
                        video_id,
                        attempt,
                        failures.len()
                    );
                    return Ok(Transcript {
                        video_id: video_id.to_string(),
                        segments,
                        attempt: attempt.clone(),
                    });
                }
                Ok(_) => {
                    tracing::debug!("Transcript attempt {} for {} returned no segments", attempt, video_id);
                    failures.push(AttemptFailure {
                        attempt: attempt.clone(),
                        reason: "no segments".to_string(),
                    });
                }
                Err(e) => {
                    tracing::debug!("Transcript attempt {} for {} failed: {}", attempt, video_id, e);
                    failures.push(AttemptFailure {
                        attempt: attempt.clone(),
                        reason: e.to_string(),
                    });
                }
            }
        }

        tracing::warn!(
            "No transcript found for {} after {} attempts",
            video_id,
            failures.len()
        );
        Err(ResolveError::NotFound {
            video_id: video_id.to_string(),
            failures,
        })
    }
}
