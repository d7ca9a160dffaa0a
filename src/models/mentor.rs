// src/models/mentor.rs
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// What the user wants help with on the coding mentor page
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum CodingTask {
    #[default]
    CodeReview,
    DebugHelp,
    CodeExplanation,
    BestPractices,
    CodeGeneration,
}

impl CodingTask {
    pub const ALL: [CodingTask; 5] = [
        CodingTask::CodeReview,
        CodingTask::DebugHelp,
        CodingTask::CodeExplanation,
        CodingTask::BestPractices,
        CodingTask::CodeGeneration,
    ];

    pub fn slug(&self) -> &'static str {
        match self {
            CodingTask::CodeReview => "code_review",
            CodingTask::DebugHelp => "debug_help",
            CodingTask::CodeExplanation => "code_explanation",
            CodingTask::BestPractices => "best_practices",
            CodingTask::CodeGeneration => "code_generation",
        }
    }

    pub fn label(&self) -> &'static str {
        match self {
            CodingTask::CodeReview => "Code Review",
            CodingTask::DebugHelp => "Debug Help",
            CodingTask::CodeExplanation => "Code Explanation",
            CodingTask::BestPractices => "Best Practices",
            CodingTask::CodeGeneration => "Code Generation",
        }
    }

    /// Heading shown above the editor for the selected task
    pub fn heading(&self) -> &'static str {
        match self {
            CodingTask::CodeReview => "Please review this code and suggest improvements:",
            CodingTask::DebugHelp => "Help me find and fix bugs in this code:",
            CodingTask::CodeExplanation => "Please explain how this code works:",
            CodingTask::BestPractices => "What are the best practices for this code:",
            CodingTask::CodeGeneration => "Please help me generate code for:",
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ProgrammingLanguage {
    #[default]
    Python,
    #[serde(rename = "javascript")]
    JavaScript,
    Java,
    Cpp,
    Sql,
    Other,
}

impl ProgrammingLanguage {
    pub const ALL: [ProgrammingLanguage; 6] = [
        ProgrammingLanguage::Python,
        ProgrammingLanguage::JavaScript,
        ProgrammingLanguage::Java,
        ProgrammingLanguage::Cpp,
        ProgrammingLanguage::Sql,
        ProgrammingLanguage::Other,
    ];

    pub fn slug(&self) -> &'static str {
        match self {
            ProgrammingLanguage::Python => "python",
            ProgrammingLanguage::JavaScript => "javascript",
            ProgrammingLanguage::Java => "java",
            ProgrammingLanguage::Cpp => "cpp",
            ProgrammingLanguage::Sql => "sql",
            ProgrammingLanguage::Other => "other",
        }
    }

    pub fn label(&self) -> &'static str {
        match self {
            ProgrammingLanguage::Python => "Python",
            ProgrammingLanguage::JavaScript => "JavaScript",
            ProgrammingLanguage::Java => "Java",
            ProgrammingLanguage::Cpp => "C++",
            ProgrammingLanguage::Sql => "SQL",
            ProgrammingLanguage::Other => "Other",
        }
    }
}

/// One recorded analysis on the coding mentor page
#[derive(Debug, Clone, Serialize)]
pub struct CodeAnalysis {
    pub code: String,
    pub language: ProgrammingLanguage,
    pub task: CodingTask,
    pub analysis: String,
    pub created_at: DateTime<Utc>,
}

impl CodeAnalysis {
    pub fn new(
        code: impl Into<String>,
        language: ProgrammingLanguage,
        task: CodingTask,
        analysis: impl Into<String>,
    ) -> Self {
        Self {
            code: code.into(),
            language,
            task,
            analysis: analysis.into(),
            created_at: Utc::now(),
        }
    }
}
