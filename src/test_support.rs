// Test doubles for the generation gateway and the transcript backend

use async_trait::async_trait;
use std::sync::{Arc, Mutex};

use crate::generation::{GenerationError, GenerationRequest, TextGenerator};
use crate::transcript::{FetchAttempt, FetchError, TranscriptSegment, TranscriptSource};

/// Replies the same way to every request and records what it was asked
#[derive(Clone)]
pub struct StubGenerator {
    reply: Arc<dyn Fn() -> Result<String, GenerationError> + Send + Sync>,
    requests: Arc<Mutex<Vec<GenerationRequest>>>,
}

impl StubGenerator {
    pub fn ok(text: &str) -> Self {
        let text = text.to_string();
        Self {
            reply: Arc::new(move || Ok(text.clone())),
            requests: Arc::default(),
        }
    }

    pub fn failing(make_error: fn() -> GenerationError) -> Self {
        Self {
            reply: Arc::new(move || Err(make_error())),
            requests: Arc::default(),
        }
    }

    pub fn requests(&self) -> Vec<GenerationRequest> {
        self.requests.lock().unwrap().clone()
    }
}

#[async_trait]
impl TextGenerator for StubGenerator {
    async fn generate(&self, request: &GenerationRequest) -> Result<String, GenerationError> {
        self.requests.lock().unwrap().push(request.clone());
        (self.reply)()
    }

    fn describe(&self) -> String {
        "stub".to_string()
    }
}

/// Every attempt fails
pub struct NoTranscripts;

#[async_trait]
impl TranscriptSource for NoTranscripts {
    async fn fetch(
        &self,
        _video_id: &str,
        _attempt: &FetchAttempt,
    ) -> Result<Vec<TranscriptSegment>, FetchError> {
        Err(FetchError::NoCaptions)
    }
}

/// Fails the first `failures` attempts, then returns the given segment texts
pub struct ScriptedTranscripts {
    failures: usize,
    texts: Vec<String>,
    calls: Mutex<usize>,
}

impl ScriptedTranscripts {
    pub fn succeed_on(failures: usize, texts: &[&str]) -> Self {
        Self {
            failures,
            texts: texts.iter().map(|t| t.to_string()).collect(),
            calls: Mutex::new(0),
        }
    }

    pub fn calls(&self) -> usize {
        *self.calls.lock().unwrap()
    }
}

#[async_trait]
impl TranscriptSource for ScriptedTranscripts {
    async fn fetch(
        &self,
        _video_id: &str,
        _attempt: &FetchAttempt,
    ) -> Result<Vec<TranscriptSegment>, FetchError> {
        let mut calls = self.calls.lock().unwrap();
        *calls += 1;
        if *calls <= self.failures {
            return Err(FetchError::Blocked("scripted failure".to_string()));
        }
        Ok(self
            .texts
            .iter()
            .enumerate()
            .map(|(i, text)| TranscriptSegment::new(text.as_str(), i as f64, 1.0))
            .collect())
    }
}
