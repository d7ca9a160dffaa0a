// src/prompts.rs
// Prompt construction for both pages. Selections on the page only ever flow into these strings.

use crate::models::{CodingTask, ProgrammingLanguage, SummaryLength, SummaryStyle};

/// System prompt for the "Analyze Code" action
pub fn mentor_system_prompt(language: ProgrammingLanguage, task: CodingTask) -> String {
    format!(
        "You are an expert {language} developer and coding mentor.
Analyze the code based on the selected task type: {task}.
Provide detailed feedback including:
1. Code quality assessment
2. Potential improvements
3. Best practices suggestions
4. Security considerations
5. Performance optimization tips
Format your response in a clear, structured way.",
        language = language.label(),
        task = task.label(),
    )
}

/// Full prompt for the "Format Code" action. Sent without a system prompt.
pub fn format_prompt(language: ProgrammingLanguage, code: &str) -> String {
    format!(
        "Format the following {language} code with proper indentation and style guidelines. \
Return only the formatted code:

{code}",
        language = language.label(),
        code = code,
    )
}

/// System prompt for lecture summarization
pub fn summary_system_prompt(style: SummaryStyle, length: SummaryLength) -> String {
    format!(
        "You are an expert in summarizing educational content.
Create a {style} summary that is approximately {percent}% of the original length.
Focus on key educational points and maintain clarity.

Format the summary with:
1. Main Concepts
2. Key Points
3. Important Examples
4. Key Terms & Definitions

Make the summary clear and well-structured.",
        style = style.label().to_lowercase(),
        percent = length.percent(),
    )
}
