//! Reasoning-capability client
//!
//! Narrow request/response seam around the external language model:
//! free text in, raw completion text out. The HTTP client speaks the
//! OpenAI chat-completions shape; tests substitute a scripted
//! implementation of [`ReasoningClient`].

use std::time::Duration;

use async_trait::async_trait;
use serde::{Deserialize, Serialize};
use thiserror::Error;

/// Errors internal to the extraction path. None of these fail a search
/// request; they all route into the graceful-degradation fallback.
#[derive(Error, Debug)]
pub enum ExtractError {
    #[error("Extraction timed out")]
    Timeout,

    #[error("Reasoning service error: {0}")]
    Service(String),

    #[error("Malformed extraction output: {0}")]
    Malformed(String),
}

/// Connection settings for the reasoning capability
#[derive(Debug, Clone)]
pub struct ReasoningConfig {
    pub endpoint: String,
    pub api_key: String,
    pub model: String,
    pub timeout: Duration,
}

impl ReasoningConfig {
    pub fn new(api_key: impl Into<String>, model: impl Into<String>) -> Self {
        Self {
            endpoint: "https://api.openai.com/v1".to_string(),
            api_key: api_key.into(),
            model: model.into(),
            timeout: Duration::from_secs(10),
        }
    }

    #[must_use]
    pub fn with_endpoint(mut self, endpoint: impl Into<String>) -> Self {
        self.endpoint = endpoint.into();
        self
    }

    #[must_use]
    pub fn with_timeout(mut self, timeout: Duration) -> Self {
        self.timeout = timeout;
        self
    }
}

/// The external reasoning seam: one completion call
#[async_trait]
pub trait ReasoningClient: Send + Sync {
    async fn complete(&self, system: &str, user: &str) -> Result<String, ExtractError>;
}

/// OpenAI-compatible chat-completions client
pub struct OpenAiClient {
    config: ReasoningConfig,
    http: reqwest::Client,
}

#[derive(Serialize)]
struct ChatMessage<'a> {
    role: &'a str,
    content: &'a str,
}

#[derive(Serialize)]
struct ChatRequest<'a> {
    model: &'a str,
    messages: Vec<ChatMessage<'a>>,
    temperature: f32,
    response_format: ResponseFormat<'a>,
}

#[derive(Serialize)]
struct ResponseFormat<'a> {
    #[serde(rename = "type")]
    kind: &'a str,
}

#[derive(Deserialize)]
struct ChatReply {
    choices: Vec<ChatChoice>,
}

#[derive(Deserialize)]
struct ChatChoice {
    message: ChatReplyMessage,
}

#[derive(Deserialize)]
struct ChatReplyMessage {
    content: Option<String>,
}

impl OpenAiClient {
    pub fn new(config: ReasoningConfig) -> Result<Self, ExtractError> {
        let http = reqwest::Client::builder()
            .timeout(config.timeout)
            .build()
            .map_err(|e| ExtractError::Service(e.to_string()))?;
        Ok(Self { config, http })
    }
}

#[async_trait]
impl ReasoningClient for OpenAiClient {
    async fn complete(&self, system: &str, user: &str) -> Result<String, ExtractError> {
        let url = format!(
            "{}/chat/completions",
            self.config.endpoint.trim_end_matches('/')
        );
        let body = ChatRequest {
            model: &self.config.model,
            messages: vec![
                ChatMessage {
                    role: "system",
                    content: system,
                },
                ChatMessage {
                    role: "user",
                    content: user,
                },
            ],
            temperature: 0.0,
            response_format: ResponseFormat { kind: "json_object" },
        };

        let response = self
            .http
            .post(&url)
            .bearer_auth(&self.config.api_key)
            .json(&body)
            .send()
            .await
            .map_err(|e| {
                if e.is_timeout() {
                    ExtractError::Timeout
                } else {
                    ExtractError::Service(e.to_string())
                }
            })?;

        if !response.status().is_success() {
            return Err(ExtractError::Service(format!(
                "HTTP {}",
                response.status()
            )));
        }

        let reply: ChatReply = response
            .json()
            .await
            .map_err(|e| ExtractError::Malformed(e.to_string()))?;

        reply
            .choices
            .into_iter()
            .next()
            .and_then(|c| c.message.content)
            .ok_or_else(|| ExtractError::Malformed("empty completion".into()))
    }
}
