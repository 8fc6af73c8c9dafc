//! Chat completion client.
//!
//! `ChatClient` is the seam the generators call through. `OpenAiClient`
//! talks to any OpenAI-compatible `/chat/completions` endpoint.

use crate::error::GenerationError;
use async_trait::async_trait;
use serde::{Deserialize, Serialize};
use std::time::Duration;
use tracing::{debug, info};

/// Message in a chat request.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ChatMessage {
    pub role: String,
    pub content: String,
}

impl ChatMessage {
    pub fn system(content: impl Into<String>) -> Self {
        Self {
            role: "system".to_string(),
            content: content.into(),
        }
    }

    pub fn user(content: impl Into<String>) -> Self {
        Self {
            role: "user".to_string(),
            content: content.into(),
        }
    }
}

/// A single completion request. The model is chosen by the client.
#[derive(Debug, Clone, PartialEq)]
pub struct ChatRequest {
    pub messages: Vec<ChatMessage>,
    pub temperature: f64,
    pub max_tokens: u32,
}

/// Something that turns a chat request into completion text.
#[async_trait]
pub trait ChatClient: Send + Sync {
    async fn complete(&self, request: ChatRequest) -> Result<String, GenerationError>;
}

/// Settings for [`OpenAiClient`].
#[derive(Debug, Clone)]
pub struct OpenAiConfig {
    pub api_base: String,
    pub api_key: Option<String>,
    pub model: String,
    /// `None` keeps the HTTP client's default (no timeout).
    pub timeout_seconds: Option<u64>,
}

/// Wire body of `POST /chat/completions`.
#[derive(Debug, Serialize)]
struct CompletionRequest<'a> {
    model: &'a str,
    messages: &'a [ChatMessage],
    temperature: f64,
    max_tokens: u32,
}

#[derive(Debug, Deserialize)]
struct CompletionResponse {
    #[serde(default)]
    choices: Vec<Choice>,
}

#[derive(Debug, Deserialize)]
struct Choice {
    message: ResponseMessage,
}

#[derive(Debug, Deserialize)]
struct ResponseMessage {
    #[serde(default)]
    content: Option<String>,
}

/// HTTP client for OpenAI-compatible chat completion APIs.
pub struct OpenAiClient {
    config: OpenAiConfig,
    http_client: reqwest::Client,
}

impl OpenAiClient {
    /// Create a client. Built once at startup and shared across requests.
    pub fn new(config: OpenAiConfig) -> Result<Self, reqwest::Error> {
        info!(
            "Initializing chat client with model {} at {}",
            config.model, config.api_base
        );

        let mut builder = reqwest::Client::builder();
        if let Some(secs) = config.timeout_seconds {
            builder = builder.timeout(Duration::from_secs(secs));
        }

        Ok(Self {
            config,
            http_client: builder.build()?,
        })
    }

    fn endpoint(&self) -> String {
        format!(
            "{}/chat/completions",
            self.config.api_base.trim_end_matches('/')
        )
    }
}

#[async_trait]
impl ChatClient for OpenAiClient {
    async fn complete(&self, request: ChatRequest) -> Result<String, GenerationError> {
        let body = CompletionRequest {
            model: &self.config.model,
            messages: &request.messages,
            temperature: request.temperature,
            max_tokens: request.max_tokens,
        };

        debug!(
            "Sending chat request with {} messages (temperature {}, max_tokens {})",
            request.messages.len(),
            request.temperature,
            request.max_tokens
        );

        let mut http_request = self.http_client.post(self.endpoint()).json(&body);
        if let Some(ref key) = self.config.api_key {
            http_request = http_request.bearer_auth(key);
        }

        let response = http_request.send().await.map_err(|e| {
            if e.is_timeout() {
                GenerationError::Request(format!("request timed out: {}", e))
            } else if e.is_connect() {
                GenerationError::Request(format!(
                    "cannot connect to {}: {}",
                    self.config.api_base, e
                ))
            } else {
                GenerationError::Request(e.to_string())
            }
        })?;

        if !response.status().is_success() {
            let status = response.status().as_u16();
            let body = response.text().await.unwrap_or_default();
            return Err(GenerationError::Api { status, body });
        }

        let completion: CompletionResponse = response
            .json()
            .await
            .map_err(|e| GenerationError::Request(format!("malformed API response: {}", e)))?;

        completion
            .choices
            .into_iter()
            .next()
            .and_then(|choice| choice.message.content)
            .ok_or(GenerationError::EmptyCompletion)
    }
}
