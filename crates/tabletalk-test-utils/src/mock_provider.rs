// SPDX-FileCopyrightText: 2026 Tabletalk Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Mock model provider for deterministic testing.
//!
//! `MockProvider` implements `ModelProvider` with pre-configured replies,
//! enabling fast, CI-runnable tests without external API calls. Every
//! invocation is recorded so tests can assert on the composed turns.

use std::collections::VecDeque;
use std::sync::Arc;

use async_trait::async_trait;
use tokio::sync::Mutex;

use tabletalk_core::{ModelProvider, PromptTurn, TabletalkError};

/// One scripted provider outcome.
#[derive(Debug, Clone)]
pub enum MockReply {
    /// Return this text as the model's reply.
    Text(String),
    /// Fail the invocation with a provider error carrying this message.
    Error(String),
}

/// One recorded call to [`MockProvider::invoke`].
#[derive(Debug, Clone)]
pub struct RecordedInvocation {
    pub model: String,
    pub turns: Vec<PromptTurn>,
}

/// A mock model provider that returns pre-configured replies.
///
/// Replies are popped from a FIFO queue. When the queue is empty,
/// a default "mock reply" text is returned.
pub struct MockProvider {
    replies: Arc<Mutex<VecDeque<MockReply>>>,
    invocations: Arc<Mutex<Vec<RecordedInvocation>>>,
}

impl MockProvider {
    /// Create a new mock provider with an empty reply queue.
    pub fn new() -> Self {
        Self {
            replies: Arc::new(Mutex::new(VecDeque::new())),
            invocations: Arc::new(Mutex::new(Vec::new())),
        }
    }

    /// Create a mock provider pre-loaded with the given text replies.
    pub fn with_replies(replies: Vec<String>) -> Self {
        let queue: VecDeque<MockReply> = replies.into_iter().map(MockReply::Text).collect();
        Self {
            replies: Arc::new(Mutex::new(queue)),
            invocations: Arc::new(Mutex::new(Vec::new())),
        }
    }

    /// Add a text reply to the end of the queue.
    pub async fn queue_reply(&self, text: impl Into<String>) {
        self.replies.lock().await.push_back(MockReply::Text(text.into()));
    }

    /// Add a failing invocation to the end of the queue.
    pub async fn queue_error(&self, message: impl Into<String>) {
        self.replies
            .lock()
            .await
            .push_back(MockReply::Error(message.into()));
    }

    /// Snapshot of every invocation made so far, in call order.
    pub async fn invocations(&self) -> Vec<RecordedInvocation> {
        self.invocations.lock().await.clone()
    }

    /// Pop the next scripted reply, or fall back to the default text.
    async fn next_reply(&self) -> MockReply {
        self.replies
            .lock()
            .await
            .pop_front()
            .unwrap_or_else(|| MockReply::Text("mock reply".to_string()))
    }
}

impl Default for MockProvider {
    fn default() -> Self {
        Self::new()
    }
}

#[async_trait]
impl ModelProvider for MockProvider {
    async fn invoke(&self, model: &str, turns: &[PromptTurn]) -> Result<String, TabletalkError> {
        self.invocations.lock().await.push(RecordedInvocation {
            model: model.to_string(),
            turns: turns.to_vec(),
        });
        match self.next_reply().await {
            MockReply::Text(text) => Ok(text),
            MockReply::Error(message) => Err(TabletalkError::provider(message)),
        }
    }
}
