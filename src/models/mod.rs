// src/models/mod.rs
pub mod lecture;
pub mod mentor;

pub use lecture::{LectureSummary, SummaryLength, SummaryStyle};
pub use mentor::{CodeAnalysis, CodingTask, ProgrammingLanguage};
