//! Fixed prompt text for summaries and chat.

use crate::domain::{ImportantFile, RepoStats};
use crate::llm::ChatMessage;
use std::fmt::Write as _;

const GENERIC_SYSTEM_PROMPT: &str = "You are a helpful assistant.";

/// Characters of each important file quoted in the summary prompt.
const EXCERPT_CHARS: usize = 4000;

/// Build the single user prompt asking for a repository summary.
pub fn summary_prompt(stats: &RepoStats, files: &[ImportantFile]) -> String {
    let top_languages: Vec<&str> =
        stats.languages.iter().take(3).map(|lang| lang.name.as_str()).collect();

    let mut prompt = String::from(
        "Given the following repository information, provide a concise summary (max 3 paragraphs) \
         that explains the purpose and key aspects of this project:\n\nRepository Stats:\n",
    );
    let _ = writeln!(prompt, "- Number of files: {}", stats.file_count);
    let _ = writeln!(prompt, "- Main languages: {}", top_languages.join(", "));
    if let Some(license) = &stats.license {
        let _ = writeln!(prompt, "- License: {license}");
    }

    prompt.push_str("\nREADME content:\n");
    prompt.push_str(stats.readme.as_deref().unwrap_or("[No README provided]"));
    prompt.push('\n');

    for file in files.iter().filter(|f| f.path != "README.md") {
        let excerpt: String = file.content.chars().take(EXCERPT_CHARS).collect();
        let _ = write!(prompt, "\nFile {} ({}):\n{}\n", file.path, file.reason, excerpt);
    }

    prompt.push_str(
        "\nFocus on:\n\
         1. The main purpose and functionality of the project\n\
         2. Key technologies used\n\
         3. Notable features or characteristics\n\n\
         Keep it professional but easy to understand.",
    );
    prompt
}

/// System message for a chat, focused on a file when one is supplied.
pub fn chat_system_message(file_name: Option<&str>, file_content: Option<&str>) -> ChatMessage {
    match (file_name, file_content) {
        (Some(name), Some(content)) => ChatMessage::system(format!(
            "You are a helpful assistant answering questions about the file `{name}` from a code repository.\n\
             File content:\n```\n{content}\n```"
        )),
        (Some(name), None) => ChatMessage::system(format!(
            "You are a helpful assistant answering questions about the file `{name}` from a code repository."
        )),
        _ => ChatMessage::system(GENERIC_SYSTEM_PROMPT),
    }
}
