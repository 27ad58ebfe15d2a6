//! OpenAI-compatible chat completion provider.

use crate::domain::Config;
use crate::error::{ExplorerError, Result};
use crate::llm::sse::{SseDecoder, SseEvent};
use crate::llm::{ChatMessage, CompletionProvider, CompletionRequest, TokenStream};
use async_trait::async_trait;
use futures::stream::{self, StreamExt, TryStreamExt};
use reqwest::Client;
use serde::{Deserialize, Serialize};
use std::collections::VecDeque;
use std::time::Duration;

/// Talks to `{base_url}/chat/completions` with bearer authentication.
pub struct OpenAiProvider {
    client: Client,
    api_key: Option<String>,
    base_url: String,
    model: String,
}

impl OpenAiProvider {
    pub fn new(api_key: Option<String>, model: impl Into<String>, timeout: Duration) -> Self {
        let client = Client::builder().timeout(timeout).build().unwrap_or_else(|e| {
            tracing::error!(error = %e, "Failed to build HTTP client with custom timeout, using default client");
            Client::new()
        });

        Self {
            client,
            api_key,
            base_url: "https://api.openai.com/v1".to_string(),
            model: model.into(),
        }
    }

    pub fn from_config(config: &Config) -> Self {
        Self::new(
            config.resolved_llm_api_key(),
            config.llm_model.clone(),
            Duration::from_secs(config.llm_timeout_secs),
        )
        .with_base_url(config.llm_base_url.clone())
    }

    /// Set custom base URL
    pub fn with_base_url(mut self, base_url: impl Into<String>) -> Self {
        self.base_url = base_url.into().trim_end_matches('/').to_string();
        self
    }

    fn chat_url(&self) -> String {
        format!("{}/chat/completions", self.base_url)
    }

    fn to_openai_request(&self, request: &CompletionRequest, stream: bool) -> OpenAiRequest {
        OpenAiRequest {
            model: self.model.clone(),
            messages: request.messages.clone(),
            temperature: request.temperature,
            max_tokens: request.max_tokens,
            stream: stream.then_some(true),
        }
    }

    async fn send(&self, body: &OpenAiRequest) -> Result<reqwest::Response> {
        let api_key = self.api_key.as_deref().ok_or_else(|| {
            ExplorerError::upstream(None, "OPENAI_API_KEY is not defined in environment variables")
        })?;

        tracing::debug!(model = %body.model, stream = body.stream.unwrap_or(false), "Sending completion request");

        let response = self
            .client
            .post(self.chat_url())
            .bearer_auth(api_key)
            .json(body)
            .send()
            .await?;

        if !response.status().is_success() {
            let status = response.status();
            let text = response.text().await.unwrap_or_default();
            tracing::error!(status = %status, "Completion API error: {}", text);
            return Err(ExplorerError::upstream(
                Some(status.as_u16()),
                format!("API error {status}: {text}"),
            ));
        }

        Ok(response)
    }
}

#[async_trait]
impl CompletionProvider for OpenAiProvider {
    async fn complete(&self, request: CompletionRequest) -> Result<String> {
        let body = self.to_openai_request(&request, false);
        let response: OpenAiResponse = self.send(&body).await?.json().await?;

        response
            .choices
            .into_iter()
            .next()
            .and_then(|choice| choice.message.content)
            .ok_or_else(|| ExplorerError::upstream(None, "No content in response"))
    }

    async fn complete_stream(&self, request: CompletionRequest) -> Result<TokenStream> {
        let body = self.to_openai_request(&request, true);
        let response = self.send(&body).await?;
        let bytes = response.bytes_stream().map_err(ExplorerError::from).boxed();

        let state = (bytes, SseDecoder::new(), VecDeque::<String>::new(), false);
        let tokens = stream::unfold(state, |(mut bytes, mut decoder, mut ready, mut done)| async move {
            loop {
                if let Some(text) = ready.pop_front() {
                    return Some((Ok(text), (bytes, decoder, ready, done)));
                }
                if done {
                    return None;
                }

                match bytes.next().await {
                    Some(Ok(chunk)) => {
                        for event in decoder.push(&chunk) {
                            match event {
                                SseEvent::Delta(text) => ready.push_back(text),
                                SseEvent::Done => done = true,
                            }
                        }
                    }
                    Some(Err(e)) => return Some((Err(e), (bytes, decoder, ready, true))),
                    None => {
                        if let Some(SseEvent::Delta(text)) = decoder.finish() {
                            ready.push_back(text);
                        }
                        done = true;
                    }
                }
            }
        });

        Ok(tokens.boxed())
    }
}

#[derive(Debug, Serialize)]
struct OpenAiRequest {
    model: String,
    messages: Vec<ChatMessage>,
    #[serde(skip_serializing_if = "Option::is_none")]
    temperature: Option<f64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    max_tokens: Option<u32>,
    #[serde(skip_serializing_if = "Option::is_none")]
    stream: Option<bool>,
}

#[derive(Debug, Deserialize)]
struct OpenAiResponse {
    choices: Vec<OpenAiChoice>,
}

#[derive(Debug, Deserialize)]
struct OpenAiChoice {
    message: OpenAiMessage,
}

#[derive(Debug, Deserialize)]
struct OpenAiMessage {
    content: Option<String>,
}
