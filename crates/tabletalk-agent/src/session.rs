// SPDX-FileCopyrightText: 2026 Tabletalk Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! In-memory conversation store.
//!
//! Conversations live for the process lifetime: created lazily on first
//! reference, never expired, removed only on explicit delete. Each
//! transcript sits behind its own async mutex so one turn at a time runs
//! per conversation, while distinct conversations proceed concurrently.

use std::sync::Arc;

use chrono::Utc;
use dashmap::DashMap;
use serde::Serialize;
use tokio::sync::Mutex;
use uuid::Uuid;

use tabletalk_core::ChatMessage;

/// One conversation's transcript and its creation instant.
pub struct SessionHandle {
    created_at: String,
    messages: Mutex<Vec<ChatMessage>>,
}

impl SessionHandle {
    fn new() -> Self {
        Self {
            created_at: Utc::now().to_rfc3339(),
            messages: Mutex::new(Vec::new()),
        }
    }

    /// The transcript lock. Turn processing holds it for the whole turn,
    /// including both model round-trips.
    pub fn messages(&self) -> &Mutex<Vec<ChatMessage>> {
        &self.messages
    }

    pub fn created_at(&self) -> &str {
        &self.created_at
    }
}

/// One row of the conversation listing.
#[derive(Debug, Clone, Serialize)]
pub struct ConversationSummary {
    pub conversation_id: String,
    pub created_at: String,
    pub message_count: usize,
}

/// Concurrent map from conversation id to transcript handle.
#[derive(Default)]
pub struct SessionStore {
    sessions: DashMap<String, Arc<SessionHandle>>,
}

impl SessionStore {
    pub fn new() -> Self {
        Self {
            sessions: DashMap::new(),
        }
    }

    /// Returns the handle for this conversation, creating it on first
    /// reference.
    pub fn get_or_create(&self, conversation_id: &str) -> Arc<SessionHandle> {
        self.sessions
            .entry(conversation_id.to_string())
            .or_insert_with(|| Arc::new(SessionHandle::new()))
            .value()
            .clone()
    }

    /// Snapshot of one transcript, `None` for an unknown id.
    pub async fn history(&self, conversation_id: &str) -> Option<Vec<ChatMessage>> {
        // Clone the handle out so the map shard is released before the
        // transcript lock is awaited.
        let handle = self.sessions.get(conversation_id)?.value().clone();
        let messages = handle.messages.lock().await;
        Some(messages.clone())
    }

    /// Removes a conversation. True when it existed.
    pub fn delete(&self, conversation_id: &str) -> bool {
        self.sessions.remove(conversation_id).is_some()
    }

    /// Snapshot of all conversations, unordered.
    pub async fn list(&self) -> Vec<ConversationSummary> {
        let handles: Vec<(String, Arc<SessionHandle>)> = self
            .sessions
            .iter()
            .map(|entry| (entry.key().clone(), entry.value().clone()))
            .collect();

        let mut summaries = Vec::with_capacity(handles.len());
        for (conversation_id, handle) in handles {
            let message_count = handle.messages.lock().await.len();
            summaries.push(ConversationSummary {
                conversation_id,
                created_at: handle.created_at.clone(),
                message_count,
            });
        }
        summaries
    }

    pub fn len(&self) -> usize {
        self.sessions.len()
    }

    pub fn is_empty(&self) -> bool {
        self.sessions.is_empty()
    }
}

/// A fresh collision-free conversation identifier.
pub fn new_conversation_id() -> String {
    Uuid::new_v4().to_string()
}
