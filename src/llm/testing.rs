//! Test doubles for the chat client.

use crate::error::GenerationError;
use crate::llm::client::{ChatClient, ChatRequest};
use async_trait::async_trait;
use std::collections::VecDeque;
use std::sync::{Arc, Mutex};

/// Replies with queued completions, one per call, and records each request.
pub struct ScriptedClient {
    replies: Mutex<VecDeque<Result<String, GenerationError>>>,
    pub seen: Mutex<Vec<ChatRequest>>,
}

impl ScriptedClient {
    pub fn new(replies: Vec<Result<String, GenerationError>>) -> Arc<Self> {
        Arc::new(Self {
            replies: Mutex::new(replies.into()),
            seen: Mutex::new(Vec::new()),
        })
    }

    /// A client whose every reply is the given text.
    pub fn replying(texts: &[&str]) -> Arc<Self> {
        Self::new(texts.iter().map(|t| Ok(t.to_string())).collect())
    }
}

#[async_trait]
impl ChatClient for ScriptedClient {
    async fn complete(&self, request: ChatRequest) -> Result<String, GenerationError> {
        self.seen.lock().unwrap().push(request);
        self.replies
            .lock()
            .unwrap()
            .pop_front()
            .unwrap_or(Err(GenerationError::EmptyCompletion))
    }
}

/// A single-trend completion matching the dashboard scenario.
pub const ONE_TREND: &str = r#"[{
    "trendName": "X",
    "platform": "TikTok",
    "category": "Music",
    "region": "US",
    "velocity": 5000,
    "viralityScore": 80,
    "sentiment": {"positive": 60, "negative": 20, "neutral": 20},
    "emergingTopic": true,
    "impactLevel": "High",
    "confidenceScore": 90,
    "aiInsights": "..."
}]"#;

/// A single-insight completion.
pub const ONE_INSIGHT: &str =
    r#"[{"trend": "X", "insight": "Partner early.", "impact": "High", "confidence": 88}]"#;
