// SPDX-FileCopyrightText: 2026 Tabletalk Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Common types shared across the Tabletalk workspace.

use chrono::Utc;
use serde::{Deserialize, Serialize};
use serde_json::Value;
use strum::{Display, EnumString};

/// Role of a stored transcript message.
///
/// `System` entries carry lookup results injected for the model's next pass.
/// They are stored as a distinct role but never sent as one: the prompt
/// composer folds them into user-role turns with a marker.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Role {
    User,
    Assistant,
    System,
}

impl std::fmt::Display for Role {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Role::User => write!(f, "user"),
            Role::Assistant => write!(f, "assistant"),
            Role::System => write!(f, "system"),
        }
    }
}

/// One transcript entry.
///
/// Invariant: transcript order is insertion order is causal order. Messages
/// are never reordered or deduplicated.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ChatMessage {
    pub role: Role,
    pub content: String,
    /// Creation instant, RFC 3339. Informational only.
    pub timestamp: String,
    /// Lookup result envelope, attached only to assistant messages that
    /// resulted from a lookup.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub structured_data: Option<Value>,
}

impl ChatMessage {
    fn new(role: Role, content: impl Into<String>) -> Self {
        Self {
            role,
            content: content.into(),
            timestamp: Utc::now().to_rfc3339(),
            structured_data: None,
        }
    }

    /// A user-role message.
    pub fn user(content: impl Into<String>) -> Self {
        Self::new(Role::User, content)
    }

    /// An assistant-role message without structured data.
    pub fn assistant(content: impl Into<String>) -> Self {
        Self::new(Role::Assistant, content)
    }

    /// An assistant-role message carrying a lookup result envelope.
    pub fn assistant_with_data(content: impl Into<String>, data: Option<Value>) -> Self {
        Self {
            structured_data: data,
            ..Self::new(Role::Assistant, content)
        }
    }

    /// A system-role message holding injected lookup results.
    pub fn system(content: impl Into<String>) -> Self {
        Self::new(Role::System, content)
    }
}

/// Wire-level turn role. The model protocol knows only these two.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum TurnRole {
    User,
    Assistant,
}

impl TurnRole {
    /// The protocol string for this role.
    pub fn as_str(&self) -> &'static str {
        match self {
            TurnRole::User => "user",
            TurnRole::Assistant => "assistant",
        }
    }
}

/// One composed prompt turn, ready for the model wire protocol.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PromptTurn {
    pub role: TurnRole,
    pub content: String,
}

impl PromptTurn {
    pub fn user(content: impl Into<String>) -> Self {
        Self {
            role: TurnRole::User,
            content: content.into(),
        }
    }

    pub fn assistant(content: impl Into<String>) -> Self {
        Self {
            role: TurnRole::Assistant,
            content: content.into(),
        }
    }
}

/// The four supported backing-store operations.
///
/// Display and FromStr use the wire-level operation names, so the same
/// strings serve dispatch parsing and the `X-Amz-Target` header.
#[derive(
    Debug, Clone, Copy, PartialEq, Eq, Hash, Display, EnumString, Serialize, Deserialize,
)]
pub enum TableOp {
    GetItem,
    Query,
    Scan,
    BatchGetItem,
}
