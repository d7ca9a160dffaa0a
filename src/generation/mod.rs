// src/generation/mod.rs
//! Generation gateway: one prompt in, generated text or a typed error out.
//! No retries and no caching happen here; every call is one backend request.

use async_trait::async_trait;

pub mod chat_client;

pub use chat_client::ChatCompletionsClient;

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct GenerationRequest {
    pub content: String,
    /// Instruction context sent ahead of the content
    pub system_prompt: Option<String>,
}

impl GenerationRequest {
    pub fn new(content: impl Into<String>) -> Self {
        Self {
            content: content.into(),
            system_prompt: None,
        }
    }

    pub fn with_system_prompt(mut self, system_prompt: impl Into<String>) -> Self {
        self.system_prompt = Some(system_prompt.into());
        self
    }
}

/// Every variant renders with a leading `Error` so the message can be shown to users as is
#[derive(Debug, thiserror::Error)]
pub enum GenerationError {
    #[error("Error: nothing to send, the prompt is empty")]
    EmptyPrompt,

    #[error("Error: generation backend is not configured (set LLM_API_KEY)")]
    NotConfigured,

    #[error("Error: request to generation backend failed: {0}")]
    Http(#[from] reqwest::Error),

    #[error("Error: quota exceeded ({0})")]
    QuotaExceeded(String),

    #[error("Error: API error ({status}): {message}")]
    Api { status: u16, message: String },

    #[error("Error: invalid response from generation backend: {0}")]
    InvalidResponse(String),
}

#[async_trait]
pub trait TextGenerator: Send + Sync {
    async fn generate(&self, request: &GenerationRequest) -> Result<String, GenerationError>;

    /// Short human-readable description for status reporting
    fn describe(&self) -> String;

    fn is_configured(&self) -> bool {
        true
    }
}
