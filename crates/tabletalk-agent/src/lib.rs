// SPDX-FileCopyrightText: 2026 Tabletalk Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Conversation engine and session management for Tabletalk.
//!
//! The [`ChatEngine`] is the central coordinator that:
//! - Appends each user turn to its conversation transcript
//! - Composes strictly alternating prompts with the system-context block
//! - Parses the model's directive and decides answer-vs-lookup
//! - Validates and dispatches lookups through the field allow-list
//! - Optionally runs a second model pass to summarize lookup results

pub mod compose;
pub mod directive;
pub mod engine;
pub mod executor;
pub mod prompts;
pub mod session;

pub use compose::compose_turns;
pub use directive::{parse_directive, Directive, DirectiveContent, ResponseType};
pub use engine::{ChatEngine, TurnReply};
pub use executor::QueryOutcome;
pub use prompts::{PromptBundle, PromptStore};
pub use session::{new_conversation_id, ConversationSummary, SessionStore};
