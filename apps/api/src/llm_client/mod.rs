//! Completion client — the single point of entry for all language-model calls.
//!
//! No other module may call the completion API directly; everything goes
//! through `CompletionClient`.
//!
//! Model, temperature and output cap are hardcoded. Do not make them configurable.

use std::time::Duration;

use async_trait::async_trait;
use reqwest::Client;
use serde::{Deserialize, Serialize};
use thiserror::Error;
use tracing::debug;

const OPENAI_API_URL: &str = "https://api.openai.com/v1/chat/completions";
/// The model used for every reply.
pub const MODEL: &str = "gpt-3.5-turbo";
const TEMPERATURE: f32 = 0.7;
const MAX_TOKENS: u32 = 500;
const REQUEST_TIMEOUT: Duration = Duration::from_secs(120);

#[derive(Debug, Error)]
pub enum CompletionError {
    #[error("completion API key not configured; set OPENAI_API_KEY")]
    NotConfigured,

    #[error("HTTP error: {0}")]
    Http(#[from] reqwest::Error),

    #[error("API error (status {status}): {message}")]
    Api { status: u16, message: String },

    #[error("JSON parse error: {0}")]
    Parse(#[from] serde_json::Error),

    #[error("completion returned empty content")]
    EmptyContent,
}

/// One stateless request/response exchange with a text-completion service.
#[async_trait]
pub trait CompletionClient: Send + Sync {
    /// `false` when no credential was configured; `complete` then fails fast.
    fn is_configured(&self) -> bool;

    async fn complete(
        &self,
        system_instruction: &str,
        user_content: &str,
    ) -> Result<String, CompletionError>;
}

#[derive(Debug, Serialize)]
struct ChatRequest<'a> {
    model: &'a str,
    messages: Vec<ChatMessage<'a>>,
    temperature: f32,
    max_tokens: u32,
}

#[derive(Debug, Serialize)]
struct ChatMessage<'a> {
    role: &'a str,
    content: &'a str,
}

#[derive(Debug, Deserialize)]
pub struct ChatResponse {
    pub choices: Vec<Choice>,
    pub usage: Option<Usage>,
}

#[derive(Debug, Deserialize)]
pub struct Choice {
    pub message: ChoiceMessage,
}

#[derive(Debug, Deserialize)]
pub struct ChoiceMessage {
    pub content: Option<String>,
}

#[derive(Debug, Deserialize)]
pub struct Usage {
    pub prompt_tokens: u32,
    pub completion_tokens: u32,
}

impl ChatResponse {
    /// Text of the first candidate, if it has any.
    pub fn text(&self) -> Option<&str> {
        self.choices
            .first()
            .and_then(|c| c.message.content.as_deref())
            .filter(|t| !t.trim().is_empty())
    }
}

#[derive(Debug, Deserialize)]
struct ApiErrorEnvelope {
    error: ApiErrorBody,
}

#[derive(Debug, Deserialize)]
struct ApiErrorBody {
    message: String,
}

/// Chat-completions client. Built once at startup; cheap to clone.
#[derive(Clone)]
pub struct OpenAiClient {
    client: Client,
    api_key: Option<String>,
}

impl OpenAiClient {
    pub fn new(api_key: Option<String>) -> Result<Self, CompletionError> {
        Ok(Self {
            client: Client::builder().timeout(REQUEST_TIMEOUT).build()?,
            api_key,
        })
    }
}

fn build_request<'a>(system_instruction: &'a str, user_content: &'a str) -> ChatRequest<'a> {
    ChatRequest {
        model: MODEL,
        messages: vec![
            ChatMessage {
                role: "system",
                content: system_instruction,
            },
            ChatMessage {
                role: "user",
                content: user_content,
            },
        ],
        temperature: TEMPERATURE,
        max_tokens: MAX_TOKENS,
    }
}

#[async_trait]
impl CompletionClient for OpenAiClient {
    fn is_configured(&self) -> bool {
        self.api_key.is_some()
    }

    /// Sends exactly one request. No retries.
    async fn complete(
        &self,
        system_instruction: &str,
        user_content: &str,
    ) -> Result<String, CompletionError> {
        let api_key = self
            .api_key
            .as_deref()
            .ok_or(CompletionError::NotConfigured)?;

        let response = self
            .client
            .post(OPENAI_API_URL)
            .bearer_auth(api_key)
            .json(&build_request(system_instruction, user_content))
            .send()
            .await?;

        let status = response.status();
        if !status.is_success() {
            let body = response.text().await.unwrap_or_default();
            let message = serde_json::from_str::<ApiErrorEnvelope>(&body)
                .map(|e| e.error.message)
                .unwrap_or(body);
            return Err(CompletionError::Api {
                status: status.as_u16(),
                message,
            });
        }

        let body = response.text().await?;
        let parsed: ChatResponse = serde_json::from_str(&body)?;

        if let Some(usage) = &parsed.usage {
            debug!(
                "Completion succeeded: prompt_tokens={}, completion_tokens={}",
                usage.prompt_tokens, usage.completion_tokens
            );
        }

        parsed
            .text()
            .map(str::to_string)
            .ok_or(CompletionError::EmptyContent)
    }
}

/// Scripted client for tests. Records every call it receives.
#[cfg(test)]
pub struct StubCompletion {
    configured: bool,
    reply: Option<String>,
    calls: std::sync::Mutex<Vec<(String, String)>>,
}

#[cfg(test)]
impl StubCompletion {
    pub fn replying(reply: &str) -> Self {
        Self {
            configured: true,
            reply: Some(reply.to_string()),
            calls: Default::default(),
        }
    }

    /// Configured, but every call fails with an API error.
    pub fn failing() -> Self {
        Self {
            configured: true,
            reply: None,
            calls: Default::default(),
        }
    }

    pub fn unconfigured() -> Self {
        Self {
            configured: false,
            reply: None,
            calls: Default::default(),
        }
    }

    pub fn calls(&self) -> Vec<(String, String)> {
        self.calls.lock().unwrap().clone()
    }
}

#[cfg(test)]
#[async_trait]
impl CompletionClient for StubCompletion {
    fn is_configured(&self) -> bool {
        self.configured
    }

    async fn complete(
        &self,
        system_instruction: &str,
        user_content: &str,
    ) -> Result<String, CompletionError> {
        if !self.configured {
            return Err(CompletionError::NotConfigured);
        }
        self.calls
            .lock()
            .unwrap()
            .push((system_instruction.to_string(), user_content.to_string()));
        self.reply.clone().ok_or(CompletionError::Api {
            status: 502,
            message: "upstream overloaded".to_string(),
        })
    }
}
