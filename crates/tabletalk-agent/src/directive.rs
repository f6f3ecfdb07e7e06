// SPDX-FileCopyrightText: 2026 Tabletalk Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Directive extraction from raw model output.
//!
//! The model is instructed to reply with a JSON object, but real replies
//! wrap it in markdown fences, surround it with prose, or skip JSON
//! entirely. Parsing is total: whatever comes back, the caller gets a
//! directive, in the worst case a natural-language wrapping of the raw
//! text.

use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};
use tracing::{debug, warn};

/// The model's declared intent for a turn.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub enum ResponseType {
    #[serde(rename = "QUERY")]
    Query,
    #[serde(rename = "NATURAL_LANGUAGE")]
    NaturalLanguage,
    /// Any other string the model produced. Treated as a direct answer.
    #[serde(untagged)]
    Other(String),
}

/// Directive content as the model sent it: plain text, a lookup spec
/// object, or something else entirely.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum DirectiveContent {
    Text(String),
    Spec(Map<String, Value>),
    Other(Value),
}

impl DirectiveContent {
    /// Coerces the content to user-facing text.
    pub fn into_text(self) -> String {
        match self {
            DirectiveContent::Text(text) => text,
            DirectiveContent::Spec(map) => Value::Object(map).to_string(),
            DirectiveContent::Other(value) => value.to_string(),
        }
    }

    /// Interprets the content as a lookup spec. A text-encoded object gets
    /// a second-level parse; anything else that is not an object is `None`.
    pub fn into_spec(self) -> Option<Map<String, Value>> {
        match self {
            DirectiveContent::Spec(map) => Some(map),
            DirectiveContent::Text(text) => serde_json::from_str(&text).ok(),
            DirectiveContent::Other(_) => None,
        }
    }

    /// True when the content is the empty string.
    pub fn is_empty_text(&self) -> bool {
        matches!(self, DirectiveContent::Text(text) if text.is_empty())
    }
}

/// The structured decision extracted from one model reply.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Directive {
    pub response_type: ResponseType,
    pub content: DirectiveContent,
}

impl Directive {
    /// Wraps raw model text as a direct natural-language answer.
    pub fn natural_language(text: impl Into<String>) -> Self {
        Self {
            response_type: ResponseType::NaturalLanguage,
            content: DirectiveContent::Text(text.into()),
        }
    }
}

/// Extracts a directive from raw model output. Never fails.
///
/// Extraction order: the first fenced code block, narrowed to the object
/// inside it; otherwise the first-to-last brace span of the raw text.
/// When no span exists or the span fails to parse, the trimmed raw text
/// becomes a natural-language directive.
pub fn parse_directive(raw: &str) -> Directive {
    let Some(candidate) = extract_candidate(raw) else {
        debug!("no directive span in model reply, treating as natural language");
        return Directive::natural_language(raw.trim());
    };
    match parse_object(candidate) {
        Some(directive) => directive,
        None => {
            debug!("directive span failed structured parsing, treating as natural language");
            Directive::natural_language(raw.trim())
        }
    }
}

/// Picks the span most likely to hold the directive object.
fn extract_candidate(raw: &str) -> Option<&str> {
    if let Some(inner) = first_fenced_block(raw) {
        return Some(brace_span(inner).unwrap_or(inner));
    }
    brace_span(raw)
}

/// The inner text of the first ``` fenced block, language tag excluded.
fn first_fenced_block(raw: &str) -> Option<&str> {
    let start = raw.find("```")?;
    let after_open = &raw[start + 3..];
    let close = after_open.find("```")?;
    let inner = &after_open[..close];
    // A tag such as "json" sits on the opening line; skip to the next one.
    match inner.find('\n') {
        Some(newline) => Some(&inner[newline + 1..]),
        None => Some(inner),
    }
}

/// The span from the first `{` to the last `}`, when both exist in order.
fn brace_span(text: &str) -> Option<&str> {
    let open = text.find('{')?;
    let close = text.rfind('}')?;
    if close < open {
        return None;
    }
    Some(&text[open..=close])
}

/// Parses one candidate span into a directive, inserting an empty content
/// field when the object lacks one.
fn parse_object(candidate: &str) -> Option<Directive> {
    let mut value: Value = serde_json::from_str(candidate).ok()?;
    let object = value.as_object_mut()?;
    if !object.contains_key("content") {
        warn!("directive missing content field, inserting empty text");
        object.insert("content".to_string(), Value::String(String::new()));
    }
    serde_json::from_value(value).ok()
}

#[cfg(test)]
mod tests {
    use super::*;
    use proptest::prelude::*;

    #[test]
    fn parses_tagged_fenced_block() {
        let raw = "Here is my decision:\n```json\n{\"response_type\": \"QUERY\", \"content\": {\"operation\": \"Scan\", \"TableName\": \"orders\"}}\n```\nDone.";
        let directive = parse_directive(raw);

        assert_eq!(directive.response_type, ResponseType::Query);
        let spec = directive.content.into_spec().unwrap();
        assert_eq!(spec["operation"], "Scan");
        assert_eq!(spec["TableName"], "orders");
    }

    #[test]
    fn parses_untagged_fenced_block() {
        let raw = "```\n{\"response_type\": \"NATURAL_LANGUAGE\", \"content\": \"hello\"}\n```";
        let directive = parse_directive(raw);

        assert_eq!(directive.response_type, ResponseType::NaturalLanguage);
        assert_eq!(directive.content, DirectiveContent::Text("hello".into()));
    }

    #[test]
    fn fenced_block_wins_over_earlier_braces() {
        let raw = "ignore {\"response_type\": \"NATURAL_LANGUAGE\", \"content\": \"outside\"} then\n```json\n{\"response_type\": \"QUERY\", \"content\": {\"operation\": \"Scan\", \"TableName\": \"t\"}}\n```";
        let directive = parse_directive(raw);
        assert_eq!(directive.response_type, ResponseType::Query);
    }

    #[test]
    fn parses_bare_object_without_fence() {
        let raw = "Sure. {\"response_type\": \"NATURAL_LANGUAGE\", \"content\": \"the answer\"} hope that helps";
        let directive = parse_directive(raw);

        assert_eq!(directive.response_type, ResponseType::NaturalLanguage);
        assert_eq!(directive.content, DirectiveContent::Text("the answer".into()));
    }

    #[test]
    fn garbage_degrades_to_trimmed_natural_language() {
        let raw = "   I cannot answer that in JSON today.   ";
        let directive = parse_directive(raw);

        assert_eq!(directive.response_type, ResponseType::NaturalLanguage);
        assert_eq!(
            directive.content,
            DirectiveContent::Text("I cannot answer that in JSON today.".into())
        );
    }

    #[test]
    fn empty_input_yields_empty_text() {
        let directive = parse_directive("");
        assert_eq!(directive.response_type, ResponseType::NaturalLanguage);
        assert_eq!(directive.content, DirectiveContent::Text(String::new()));
    }

    #[test]
    fn missing_content_is_inserted_empty() {
        let raw = "{\"response_type\": \"NATURAL_LANGUAGE\"}";
        let directive = parse_directive(raw);

        assert_eq!(directive.response_type, ResponseType::NaturalLanguage);
        assert_eq!(directive.content, DirectiveContent::Text(String::new()));
    }

    #[test]
    fn object_without_response_type_falls_back() {
        let raw = "{\"content\": \"orphan\"}";
        let directive = parse_directive(raw);

        assert_eq!(directive.response_type, ResponseType::NaturalLanguage);
        assert_eq!(directive.content, DirectiveContent::Text(raw.into()));
    }

    #[test]
    fn unknown_response_type_is_preserved() {
        let raw = "{\"response_type\": \"CLARIFY\", \"content\": \"which table?\"}";
        let directive = parse_directive(raw);

        assert_eq!(
            directive.response_type,
            ResponseType::Other("CLARIFY".into())
        );
        assert_eq!(
            directive.content,
            DirectiveContent::Text("which table?".into())
        );
    }

    #[test]
    fn string_encoded_spec_gets_second_level_parse() {
        let content = DirectiveContent::Text(
            "{\"operation\": \"GetItem\", \"TableName\": \"orders\"}".into(),
        );
        let spec = content.into_spec().unwrap();
        assert_eq!(spec["operation"], "GetItem");
    }

    #[test]
    fn non_object_content_is_not_a_spec() {
        assert!(DirectiveContent::Text("just words".into()).into_spec().is_none());
        assert!(DirectiveContent::Other(Value::Bool(true)).into_spec().is_none());
    }

    #[test]
    fn content_coerces_to_text() {
        let mut map = Map::new();
        map.insert("operation".to_string(), Value::String("Scan".into()));
        assert_eq!(
            DirectiveContent::Spec(map).into_text(),
            "{\"operation\":\"Scan\"}"
        );
        assert_eq!(DirectiveContent::Other(Value::from(41)).into_text(), "41");
    }

    proptest! {
        #[test]
        fn parse_is_total(raw in any::<String>()) {
            let directive = parse_directive(&raw);
            // Coercion to text must always succeed, whatever came out.
            let _ = directive.content.into_text();
        }

        #[test]
        fn braceless_input_round_trips_trimmed(raw in "[a-zA-Z ,.!?]{0,60}") {
            let directive = parse_directive(&raw);
            prop_assert_eq!(directive.response_type, ResponseType::NaturalLanguage);
            prop_assert_eq!(
                directive.content,
                DirectiveContent::Text(raw.trim().to_string())
            );
        }
    }
}
