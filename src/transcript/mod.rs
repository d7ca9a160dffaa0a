// src/transcript/mod.rs
//! YouTube transcript retrieval with ordered proxy / language fallback

pub mod resolver;
pub mod source;
pub mod video_id;
pub mod youtube;

pub use resolver::{FetchPlan, ResolveError, Transcript, TranscriptResolver};
pub use source::{FetchAttempt, FetchError, ProxyConfig, ProxyScope, TranscriptSegment, TranscriptSource};
pub use video_id::extract_video_id;
pub use youtube::YoutubeTranscriptSource;
