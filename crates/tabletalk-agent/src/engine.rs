// SPDX-FileCopyrightText: 2026 Tabletalk Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! The per-turn conversation state machine.
//!
//! Each turn: append the user message, compose the prompt, invoke the
//! model, parse its directive, then either answer directly or run the
//! requested lookup and optionally invoke the model a second time to
//! summarize the results. Whatever path a turn takes, it appends exactly
//! one user and one assistant message to the transcript.

use std::sync::Arc;

use serde_json::Value;
use tracing::{debug, warn};

use tabletalk_config::AgentConfig;
use tabletalk_core::{ChatMessage, ModelProvider, TableStore, TabletalkError};

use crate::compose::compose_turns;
use crate::directive::{parse_directive, DirectiveContent, ResponseType};
use crate::executor;
use crate::prompts::PromptStore;
use crate::session::{new_conversation_id, ConversationSummary, SessionStore};

/// Reply when a QUERY directive's content cannot be read as a lookup spec.
const BAD_SPEC_REPLY: &str =
    "I could not build a valid query from that request. Could you rephrase it?";

/// Reply when the lookup itself failed.
const LOOKUP_FAILED_REPLY: &str =
    "I ran into a problem looking that up. Could you rephrase your question and try again?";

/// Everything a completed turn hands back to the HTTP layer.
#[derive(Debug, Clone)]
pub struct TurnReply {
    pub conversation_id: String,
    pub reply: String,
    /// The lookup result envelope, when this turn ran a lookup.
    pub data: Option<Value>,
    /// Snapshot of the full transcript after the turn.
    pub history: Vec<ChatMessage>,
}

/// Drives conversations end to end.
pub struct ChatEngine {
    provider: Arc<dyn ModelProvider>,
    store: Arc<dyn TableStore>,
    prompts: Arc<PromptStore>,
    sessions: SessionStore,
    model: String,
    summarize_results: bool,
    attach_failure_detail: bool,
}

impl ChatEngine {
    pub fn new(
        provider: Arc<dyn ModelProvider>,
        store: Arc<dyn TableStore>,
        prompts: Arc<PromptStore>,
        agent: &AgentConfig,
        model: impl Into<String>,
    ) -> Self {
        Self {
            provider,
            store,
            prompts,
            sessions: SessionStore::new(),
            model: model.into(),
            summarize_results: agent.summarize_results,
            attach_failure_detail: agent.attach_failure_detail,
        }
    }

    /// Runs one conversational turn.
    ///
    /// A missing conversation id starts a new conversation. The transcript
    /// lock is held for the whole turn, both model round-trips included,
    /// so concurrent turns against one conversation serialize.
    ///
    /// Only a model transport fault propagates as `Err`; even then the
    /// failure is recorded in the transcript first, so the turn still
    /// appends one user and one assistant message.
    pub async fn handle_turn(
        &self,
        conversation_id: Option<String>,
        message: &str,
    ) -> Result<TurnReply, TabletalkError> {
        let conversation_id = conversation_id.unwrap_or_else(new_conversation_id);
        let handle = self.sessions.get_or_create(&conversation_id);
        let mut transcript = handle.messages().lock().await;

        transcript.push(ChatMessage::user(message));

        match self.drive(&mut transcript).await {
            Ok((reply, data)) => {
                transcript.push(ChatMessage::assistant_with_data(reply.clone(), data.clone()));
                debug!(
                    conversation_id = %conversation_id,
                    transcript_len = transcript.len(),
                    lookup = data.is_some(),
                    "turn complete"
                );
                Ok(TurnReply {
                    conversation_id,
                    reply,
                    data,
                    history: transcript.clone(),
                })
            }
            Err(e) => {
                // The failure goes into the transcript as the assistant
                // message, so the next turn carries the context that this
                // one died.
                transcript.push(ChatMessage::assistant(format!("Error: {e}")));
                Err(e)
            }
        }
    }

    /// One or two model passes, returning the final reply text and the
    /// lookup envelope if a lookup ran.
    async fn drive(
        &self,
        transcript: &mut Vec<ChatMessage>,
    ) -> Result<(String, Option<Value>), TabletalkError> {
        let bundle = self.prompts.current();
        let system_block = bundle.system_block();

        let turns = compose_turns(&system_block, transcript);
        let raw = self.provider.invoke(&self.model, &turns).await?;
        let directive = parse_directive(&raw);

        match directive.response_type {
            ResponseType::Query => {
                self.lookup(transcript, &system_block, directive.content)
                    .await
            }
            _ => Ok((directive.content.into_text(), None)),
        }
    }

    /// The lookup path: coerce the spec, execute it, and either summarize
    /// with a second model pass or report the count.
    async fn lookup(
        &self,
        transcript: &mut Vec<ChatMessage>,
        system_block: &str,
        content: DirectiveContent,
    ) -> Result<(String, Option<Value>), TabletalkError> {
        let Some(spec) = content.into_spec() else {
            warn!("query directive content is not a usable lookup spec");
            return Ok((BAD_SPEC_REPLY.to_string(), None));
        };

        let outcome = executor::run_lookup(self.store.as_ref(), &spec).await;

        if !outcome.ok {
            let envelope = if self.attach_failure_detail {
                outcome.envelope
            } else {
                redact_failure(outcome.envelope)
            };
            return Ok((LOOKUP_FAILED_REPLY.to_string(), Some(envelope)));
        }

        if !self.summarize_results {
            let reply = count_sentence(&outcome.envelope);
            return Ok((reply, Some(outcome.envelope)));
        }

        // Feed the results back and let the model phrase the answer.
        transcript.push(ChatMessage::system(outcome.envelope.to_string()));
        let turns = compose_turns(system_block, transcript);
        let raw = self.provider.invoke(&self.model, &turns).await?;
        let directive = parse_directive(&raw);
        if directive.content.is_empty_text() {
            warn!("summary pass returned empty content");
        }
        Ok((directive.content.into_text(), Some(outcome.envelope)))
    }

    /// Snapshot of one transcript, `None` for an unknown id.
    pub async fn history(&self, conversation_id: &str) -> Option<Vec<ChatMessage>> {
        self.sessions.history(conversation_id).await
    }

    /// Removes a conversation. True when it existed.
    pub fn delete_conversation(&self, conversation_id: &str) -> bool {
        self.sessions.delete(conversation_id)
    }

    /// Snapshot of all conversations.
    pub async fn list_conversations(&self) -> Vec<ConversationSummary> {
        self.sessions.list().await
    }
}

/// Strips the diagnostic detail from a failure envelope, leaving the fixed
/// message and the spec echo.
fn redact_failure(mut envelope: Value) -> Value {
    if let Some(object) = envelope.as_object_mut() {
        object.remove("Error");
    }
    envelope
}

/// Fixed-template reply describing how much data a lookup returned.
fn count_sentence(envelope: &Value) -> String {
    let count = if let Some(count) = envelope.get("Count").and_then(Value::as_u64) {
        count
    } else if let Some(items) = envelope.get("Items").and_then(Value::as_array) {
        items.len() as u64
    } else if envelope.get("Item").is_some() {
        1
    } else if let Some(responses) = envelope.get("Responses").and_then(Value::as_object) {
        responses
            .values()
            .filter_map(Value::as_array)
            .map(|items| items.len() as u64)
            .sum()
    } else {
        return "The lookup completed.".to_string();
    };
    let noun = if count == 1 { "result" } else { "results" };
    format!("The lookup returned {count} {noun}.")
}
