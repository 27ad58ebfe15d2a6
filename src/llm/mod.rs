//! Chat-completion capability consumed by summaries and chat.
//!
//! The server only depends on [`CompletionProvider`]; [`OpenAiProvider`]
//! implements it for any OpenAI-compatible endpoint.

use crate::domain::{ImportantFile, RepoStats};
use crate::error::Result;
use async_trait::async_trait;
use futures::stream::BoxStream;
use serde::{Deserialize, Serialize};

pub mod openai;
pub mod prompts;
pub mod sse;

pub use openai::OpenAiProvider;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Role {
    System,
    User,
    Assistant,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ChatMessage {
    pub role: Role,
    pub content: String,
}

impl ChatMessage {
    pub fn system(content: impl Into<String>) -> Self {
        Self { role: Role::System, content: content.into() }
    }

    pub fn user(content: impl Into<String>) -> Self {
        Self { role: Role::User, content: content.into() }
    }

    pub fn assistant(content: impl Into<String>) -> Self {
        Self { role: Role::Assistant, content: content.into() }
    }
}

#[derive(Debug, Clone, Default, PartialEq)]
pub struct CompletionRequest {
    pub messages: Vec<ChatMessage>,
    pub temperature: Option<f64>,
    pub max_tokens: Option<u32>,
}

impl CompletionRequest {
    pub fn new(messages: Vec<ChatMessage>) -> Self {
        Self { messages, ..Default::default() }
    }

    pub fn with_temperature(mut self, temperature: f64) -> Self {
        self.temperature = Some(temperature);
        self
    }

    pub fn with_max_tokens(mut self, max_tokens: u32) -> Self {
        self.max_tokens = Some(max_tokens);
        self
    }
}

/// A stream of text deltas from the model.
pub type TokenStream = BoxStream<'static, Result<String>>;

#[async_trait]
pub trait CompletionProvider: Send + Sync {
    /// Generate a full completion.
    async fn complete(&self, request: CompletionRequest) -> Result<String>;

    /// Generate a completion as a stream of text deltas.
    ///
    /// Errors before the first byte (auth, bad request) are returned directly;
    /// errors after that arrive as stream items.
    async fn complete_stream(&self, request: CompletionRequest) -> Result<TokenStream>;
}

/// Ask the provider for a short summary of a repository.
pub async fn summarize(
    provider: &dyn CompletionProvider,
    stats: &RepoStats,
    files: &[ImportantFile],
) -> Result<String> {
    let request = CompletionRequest::new(vec![ChatMessage::user(prompts::summary_prompt(stats, files))])
        .with_temperature(0.7)
        .with_max_tokens(300);
    provider.complete(request).await
}

/// Stream a reply to `messages`, optionally focused on one file.
pub async fn chat(
    provider: &dyn CompletionProvider,
    messages: Vec<ChatMessage>,
    file_name: Option<&str>,
    file_content: Option<&str>,
) -> Result<TokenStream> {
    let mut conversation = Vec::with_capacity(messages.len() + 1);
    conversation.push(prompts::chat_system_message(file_name, file_content));
    conversation.extend(messages);
    provider.complete_stream(CompletionRequest::new(conversation)).await
}
