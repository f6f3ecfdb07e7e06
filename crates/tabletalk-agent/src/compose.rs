// SPDX-FileCopyrightText: 2026 Tabletalk Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Prompt composition from a conversation transcript.
//!
//! The model wire protocol requires strict user/assistant alternation with
//! no adjacent same-role turns. The transcript stores three roles, so
//! composition folds it: consecutive same-role messages merge into one turn,
//! and system-role entries (lookup results) ride inside user-role turns
//! behind a marker. The system-context block lands exactly once, at the
//! head of the first emitted turn.

use tabletalk_core::{ChatMessage, PromptTurn, Role, TurnRole};

/// Prefix that tells the model the following text is injected lookup
/// results, not something the human typed.
pub const LOOKUP_RESULTS_MARKER: &str = "[lookup results]";

/// Folds the transcript into strictly alternating wire turns and prefixes
/// the system-context block onto the first one.
///
/// An empty transcript yields a single user turn holding only the block.
/// The sequence may end on either role; a trailing assistant turn is left
/// as-is.
pub fn compose_turns(system_block: &str, transcript: &[ChatMessage]) -> Vec<PromptTurn> {
    let mut turns: Vec<PromptTurn> = Vec::new();

    for message in transcript {
        match message.role {
            Role::User => push_or_merge(&mut turns, TurnRole::User, &message.content),
            Role::Assistant => push_or_merge(&mut turns, TurnRole::Assistant, &message.content),
            Role::System => {
                let marked = format!("{LOOKUP_RESULTS_MARKER}\n{}", message.content);
                push_or_merge(&mut turns, TurnRole::User, &marked);
            }
        }
    }

    match turns.first_mut() {
        Some(first) => {
            first.content = format!("{system_block}\n\n{}", first.content);
        }
        None => turns.push(PromptTurn::user(system_block)),
    }

    turns
}

/// Appends content as a turn of the given role, merging into the previous
/// turn when it carries the same role.
fn push_or_merge(turns: &mut Vec<PromptTurn>, role: TurnRole, content: &str) {
    match turns.last_mut() {
        Some(last) if last.role == role => {
            last.content.push_str("\n\n");
            last.content.push_str(content);
        }
        _ => turns.push(PromptTurn {
            role,
            content: content.to_string(),
        }),
    }
}
