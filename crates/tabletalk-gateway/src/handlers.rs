// SPDX-FileCopyrightText: 2026 Tabletalk Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! HTTP request handlers for the chat REST API.
//!
//! Handles POST /chat, transcript reads and deletes, and prompt reload.

use axum::{
    extract::{Path, State},
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use serde::{Deserialize, Serialize};
use serde_json::Value;
use tracing::{debug, error};

use tabletalk_agent::ConversationSummary;
use tabletalk_core::ChatMessage;

use crate::server::GatewayState;

/// Request body for POST /chat.
#[derive(Debug, Deserialize)]
pub struct ChatRequest {
    /// Conversation to continue. Absent starts a new conversation.
    #[serde(default)]
    pub conversation_id: Option<String>,
    /// The user's message text.
    pub message: String,
}

/// Response body for POST /chat.
#[derive(Debug, Serialize)]
pub struct ChatResponse {
    /// Conversation ID (may be newly created).
    pub conversation_id: String,
    /// The assistant's reply text.
    pub response: String,
    /// Lookup result envelope, present when the turn ran a lookup.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub data: Option<Value>,
    /// Full transcript after the turn.
    pub history: Vec<ChatMessage>,
}

/// Response body for GET /health.
#[derive(Debug, Serialize, Deserialize)]
pub struct HealthResponse {
    /// Health status string.
    pub status: String,
    /// Binary version.
    pub version: String,
    /// Uptime in seconds.
    pub uptime_secs: u64,
}

/// Response body for GET /conversation/{id}.
#[derive(Debug, Serialize)]
pub struct ConversationResponse {
    pub conversation_id: String,
    pub history: Vec<ChatMessage>,
}

/// Response body for GET /conversations.
#[derive(Debug, Serialize)]
pub struct ConversationListResponse {
    pub conversations: Vec<ConversationSummary>,
}

/// Plain status message body, used by the root, delete, and reload routes.
#[derive(Debug, Serialize, Deserialize)]
pub struct StatusMessage {
    pub message: String,
}

/// Error response body.
#[derive(Debug, Serialize, Deserialize)]
pub struct ErrorResponse {
    /// Error description.
    pub error: String,
}

/// GET /
pub async fn get_root() -> Json<StatusMessage> {
    Json(StatusMessage {
        message: "Tabletalk API is running".to_string(),
    })
}

/// GET /health
pub async fn get_health(State(state): State<GatewayState>) -> Json<HealthResponse> {
    Json(HealthResponse {
        status: "healthy".to_string(),
        version: env!("CARGO_PKG_VERSION").to_string(),
        uptime_secs: state.start_time.elapsed().as_secs(),
    })
}

/// POST /chat
///
/// Runs one conversational turn. A model transport fault maps to a 500
/// with a generic message; the failure detail stays in the logs and in the
/// transcript, not in the response body.
pub async fn post_chat(
    State(state): State<GatewayState>,
    Json(body): Json<ChatRequest>,
) -> Response {
    if body.message.trim().is_empty() {
        return (
            StatusCode::BAD_REQUEST,
            Json(ErrorResponse {
                error: "message must not be empty".to_string(),
            }),
        )
            .into_response();
    }

    match state
        .engine
        .handle_turn(body.conversation_id, &body.message)
        .await
    {
        Ok(turn) => (
            StatusCode::OK,
            Json(ChatResponse {
                conversation_id: turn.conversation_id,
                response: turn.reply,
                data: turn.data,
                history: turn.history,
            }),
        )
            .into_response(),
        Err(e) => {
            error!(error = %e, "chat turn failed");
            (
                StatusCode::INTERNAL_SERVER_ERROR,
                Json(ErrorResponse {
                    error: "The assistant is unavailable right now. Please try again.".to_string(),
                }),
            )
                .into_response()
        }
    }
}

/// GET /conversations
pub async fn get_conversations(
    State(state): State<GatewayState>,
) -> Json<ConversationListResponse> {
    Json(ConversationListResponse {
        conversations: state.engine.list_conversations().await,
    })
}

/// GET /conversation/{conversation_id}
pub async fn get_conversation(
    State(state): State<GatewayState>,
    Path(conversation_id): Path<String>,
) -> Response {
    match state.engine.history(&conversation_id).await {
        Some(history) => (
            StatusCode::OK,
            Json(ConversationResponse {
                conversation_id,
                history,
            }),
        )
            .into_response(),
        None => (
            StatusCode::NOT_FOUND,
            Json(ErrorResponse {
                error: "Conversation not found".to_string(),
            }),
        )
            .into_response(),
    }
}

/// DELETE /conversation/{conversation_id}
///
/// Idempotent: deleting an unknown conversation still reports success.
pub async fn delete_conversation(
    State(state): State<GatewayState>,
    Path(conversation_id): Path<String>,
) -> Json<StatusMessage> {
    let existed = state.engine.delete_conversation(&conversation_id);
    debug!(conversation_id = %conversation_id, existed, "conversation delete");
    Json(StatusMessage {
        message: "Conversation deleted".to_string(),
    })
}

/// POST /prompt/reload
///
/// Re-reads the instruction and schema sources. Turns already in flight
/// keep the bundle they started with.
pub async fn post_prompt_reload(State(state): State<GatewayState>) -> Response {
    match state.prompts.reload().await {
        Ok(()) => (
            StatusCode::OK,
            Json(StatusMessage {
                message: "Prompt configuration reloaded".to_string(),
            }),
        )
            .into_response(),
        Err(e) => {
            error!(error = %e, "prompt reload failed");
            (
                StatusCode::INTERNAL_SERVER_ERROR,
                Json(ErrorResponse {
                    error: format!("reload failed: {e}"),
                }),
            )
                .into_response()
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn chat_request_deserializes_without_conversation_id() {
        let json = r#"{"message": "Hello"}"#;
        let req: ChatRequest = serde_json::from_str(json).unwrap();
        assert_eq!(req.message, "Hello");
        assert!(req.conversation_id.is_none());
    }

    #[test]
    fn chat_request_deserializes_with_all_fields() {
        let json = r#"{"conversation_id": "conv-123", "message": "Hello"}"#;
        let req: ChatRequest = serde_json::from_str(json).unwrap();
        assert_eq!(req.conversation_id.as_deref(), Some("conv-123"));
    }

    #[test]
    fn chat_response_omits_absent_data() {
        let resp = ChatResponse {
            conversation_id: "conv-1".to_string(),
            response: "hi".to_string(),
            data: None,
            history: vec![],
        };
        let json = serde_json::to_string(&resp).unwrap();
        assert!(!json.contains("\"data\""));

        let resp = ChatResponse {
            data: Some(serde_json::json!({"Count": 1})),
            ..resp
        };
        let json = serde_json::to_string(&resp).unwrap();
        assert!(json.contains("\"data\":{\"Count\":1}"));
    }

    #[test]
    fn health_response_serializes() {
        let resp = HealthResponse {
            status: "healthy".to_string(),
            version: "0.1.0".to_string(),
            uptime_secs: 42,
        };
        let json = serde_json::to_string(&resp).unwrap();
        assert!(json.contains("\"status\":\"healthy\""));
        assert!(json.contains("\"uptime_secs\":42"));
    }

    #[test]
    fn error_response_serializes() {
        let resp = ErrorResponse {
            error: "something went wrong".to_string(),
        };
        let json = serde_json::to_string(&resp).unwrap();
        assert_eq!(json, "{\"error\":\"something went wrong\"}");
    }
}
