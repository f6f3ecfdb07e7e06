// SPDX-FileCopyrightText: 2026 Tabletalk Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! End-to-end turn scenarios against mocked provider and store.

use std::sync::Arc;

use serde_json::json;

use tabletalk_agent::{ChatEngine, PromptStore};
use tabletalk_config::{AgentConfig, PromptConfig};
use tabletalk_core::Role;
use tabletalk_test_utils::{MockProvider, MockTableStore};

const LOOKUP_FAILED_REPLY: &str =
    "I ran into a problem looking that up. Could you rephrase your question and try again?";
const BAD_SPEC_REPLY: &str =
    "I could not build a valid query from that request. Could you rephrase it?";

fn agent_config(summarize: bool, attach_detail: bool) -> AgentConfig {
    AgentConfig {
        name: "tabletalk".to_string(),
        log_level: "info".to_string(),
        summarize_results: summarize,
        attach_failure_detail: attach_detail,
    }
}

async fn build_engine(
    provider: &Arc<MockProvider>,
    store: &Arc<MockTableStore>,
    summarize: bool,
    attach_detail: bool,
) -> ChatEngine {
    let prompts = Arc::new(
        PromptStore::load(PromptConfig::default())
            .await
            .expect("default prompt config loads"),
    );
    ChatEngine::new(
        provider.clone(),
        store.clone(),
        prompts,
        &agent_config(summarize, attach_detail),
        "test-model",
    )
}

#[tokio::test]
async fn direct_answer_turn_round_trips() {
    let provider = Arc::new(MockProvider::with_replies(vec![
        r#"{"response_type": "NATURAL_LANGUAGE", "content": "I cannot see the sky from here."}"#
            .to_string(),
    ]));
    let store = Arc::new(MockTableStore::new());
    let engine = build_engine(&provider, &store, true, true).await;

    let reply = engine
        .handle_turn(None, "What is the weather?")
        .await
        .unwrap();

    assert_eq!(reply.reply, "I cannot see the sky from here.");
    assert!(reply.data.is_none());
    assert_eq!(reply.history.len(), 2);
    assert_eq!(reply.history[0].role, Role::User);
    assert_eq!(reply.history[0].content, "What is the weather?");
    assert_eq!(reply.history[1].role, Role::Assistant);
    assert!(store.dispatches().await.is_empty());
    assert_eq!(provider.invocations().await.len(), 1);
}

#[tokio::test]
async fn garbage_reply_is_returned_trimmed() {
    let provider = Arc::new(MockProvider::with_replies(vec![
        "  I will not produce JSON today, sorry.  ".to_string(),
    ]));
    let store = Arc::new(MockTableStore::new());
    let engine = build_engine(&provider, &store, true, true).await;

    let reply = engine.handle_turn(None, "hello").await.unwrap();

    assert_eq!(reply.reply, "I will not produce JSON today, sorry.");
    assert!(reply.data.is_none());
    assert!(store.dispatches().await.is_empty());
}

#[tokio::test]
async fn fenced_query_runs_lookup_and_summarizes() {
    let provider = Arc::new(MockProvider::with_replies(vec![
        "```json\n{\"response_type\": \"QUERY\", \"content\": {\"operation\": \"Scan\", \"TableName\": \"orders\"}}\n```".to_string(),
        r#"{"response_type": "NATURAL_LANGUAGE", "content": "You have 3 orders."}"#.to_string(),
    ]));
    let store = Arc::new(MockTableStore::with_results(vec![json!({
        "Count": 3,
        "Items": [{"id": {"S": "o-1"}}, {"id": {"S": "o-2"}}, {"id": {"S": "o-3"}}],
        "ScannedCount": 3
    })]));
    let engine = build_engine(&provider, &store, true, true).await;

    let reply = engine
        .handle_turn(None, "How many orders do I have?")
        .await
        .unwrap();

    // The store saw only the allow-listed fields, not the operation selector.
    let dispatches = store.dispatches().await;
    assert_eq!(dispatches.len(), 1);
    assert_eq!(dispatches[0].params.len(), 1);
    assert_eq!(dispatches[0].params["TableName"], "orders");

    // The envelope carries the native result plus the original spec echo.
    let data = reply.data.expect("lookup turn carries data");
    assert_eq!(data["Count"], 3);
    assert_eq!(
        data["_generated_query"],
        json!({"operation": "Scan", "TableName": "orders"})
    );

    assert_eq!(reply.reply, "You have 3 orders.");

    // Transcript: user, injected lookup results, assistant.
    assert_eq!(reply.history.len(), 3);
    assert_eq!(reply.history[1].role, Role::System);
    assert_eq!(reply.history[2].role, Role::Assistant);
    assert_eq!(reply.history[2].structured_data.as_ref().unwrap()["Count"], 3);

    // The second pass folded the results into a marked user turn.
    let invocations = provider.invocations().await;
    assert_eq!(invocations.len(), 2);
    let second = &invocations[1];
    assert_eq!(second.turns.len(), 1);
    assert!(second.turns[0].content.contains("[lookup results]"));
    assert!(second.turns[0].content.contains("\"Count\":3"));
}

#[tokio::test]
async fn count_sentence_used_when_summarize_disabled() {
    let provider = Arc::new(MockProvider::with_replies(vec![
        r#"{"response_type": "QUERY", "content": {"operation": "Scan", "TableName": "orders"}}"#
            .to_string(),
    ]));
    let store = Arc::new(MockTableStore::with_results(vec![json!({
        "Count": 2,
        "Items": [{"id": {"S": "o-1"}}, {"id": {"S": "o-2"}}]
    })]));
    let engine = build_engine(&provider, &store, false, true).await;

    let reply = engine.handle_turn(None, "count my orders").await.unwrap();

    assert_eq!(reply.reply, "The lookup returned 2 results.");
    assert_eq!(provider.invocations().await.len(), 1);
    // No summarize pass, so no injected results message.
    assert_eq!(reply.history.len(), 2);
    assert!(reply.data.is_some());
}

#[tokio::test]
async fn store_failure_surfaces_apology_with_envelope() {
    let provider = Arc::new(MockProvider::with_replies(vec![
        r#"{"response_type": "QUERY", "content": {"operation": "Query", "TableName": "orders", "KeyConditionExpression": "id = :id"}}"#.to_string(),
    ]));
    let store = Arc::new(MockTableStore::new());
    store
        .queue_error("AccessDeniedException: User is not authorized to perform: dynamodb:Query")
        .await;
    let engine = build_engine(&provider, &store, true, true).await;

    let reply = engine.handle_turn(None, "find order o-1").await.unwrap();

    assert_eq!(reply.reply, LOOKUP_FAILED_REPLY);

    let data = reply.data.expect("failure envelope attached");
    assert_eq!(data["Message"], "Failed to execute DynamoDB query");
    assert!(data["Error"].as_str().unwrap().contains("AccessDeniedException"));
    assert_eq!(data["_generated_query"]["operation"], "Query");
    assert_eq!(data["_generated_query"]["TableName"], "orders");

    // One model pass only; the failure does not trigger summarization.
    assert_eq!(provider.invocations().await.len(), 1);
    assert_eq!(reply.history.len(), 2);
    let assistant = &reply.history[1];
    assert_eq!(assistant.role, Role::Assistant);
    assert_eq!(
        assistant.structured_data.as_ref().unwrap()["_generated_query"]["TableName"],
        "orders"
    );
}

#[tokio::test]
async fn failure_detail_redacted_when_disabled() {
    let provider = Arc::new(MockProvider::with_replies(vec![
        r#"{"response_type": "QUERY", "content": {"operation": "Scan", "TableName": "secrets"}}"#
            .to_string(),
    ]));
    let store = Arc::new(MockTableStore::new());
    store
        .queue_error("AccessDeniedException: arn:aws:iam::123456789012:user/svc lacks permission")
        .await;
    let engine = build_engine(&provider, &store, true, false).await;

    let reply = engine.handle_turn(None, "show secrets").await.unwrap();

    assert_eq!(reply.reply, LOOKUP_FAILED_REPLY);
    let data = reply.data.expect("redacted envelope still attached");
    assert!(data.get("Error").is_none());
    assert_eq!(data["Message"], "Failed to execute DynamoDB query");
    assert_eq!(data["_generated_query"]["TableName"], "secrets");
}

#[tokio::test]
async fn unusable_query_content_skips_store() {
    let provider = Arc::new(MockProvider::with_replies(vec![
        r#"{"response_type": "QUERY", "content": "please scan the orders table"}"#.to_string(),
    ]));
    let store = Arc::new(MockTableStore::new());
    let engine = build_engine(&provider, &store, true, true).await;

    let reply = engine.handle_turn(None, "scan orders").await.unwrap();

    assert_eq!(reply.reply, BAD_SPEC_REPLY);
    assert!(reply.data.is_none());
    assert!(store.dispatches().await.is_empty());
    assert_eq!(provider.invocations().await.len(), 1);
    assert_eq!(reply.history.len(), 2);
}

#[tokio::test]
async fn provider_fault_still_appends_assistant_message() {
    let provider = Arc::new(MockProvider::new());
    provider.queue_error("connection reset by peer").await;
    let store = Arc::new(MockTableStore::new());
    let engine = build_engine(&provider, &store, true, true).await;

    let err = engine
        .handle_turn(Some("conv-err".to_string()), "hello?")
        .await
        .unwrap_err();
    assert!(err.to_string().contains("connection reset"));

    // Turn symmetry holds on the failure path.
    let history = engine.history("conv-err").await.unwrap();
    assert_eq!(history.len(), 2);
    assert_eq!(history[0].role, Role::User);
    assert_eq!(history[1].role, Role::Assistant);
    assert!(history[1].content.starts_with("Error: "));
}

#[tokio::test]
async fn second_pass_query_directive_is_not_executed() {
    // If the summary pass itself asks for another lookup, its content is
    // used as text; there is no lookup loop.
    let provider = Arc::new(MockProvider::with_replies(vec![
        r#"{"response_type": "QUERY", "content": {"operation": "Scan", "TableName": "orders"}}"#
            .to_string(),
        r#"{"response_type": "QUERY", "content": {"operation": "Scan", "TableName": "again"}}"#
            .to_string(),
    ]));
    let store = Arc::new(MockTableStore::with_results(vec![json!({"Count": 1, "Items": [{}]})]));
    let engine = build_engine(&provider, &store, true, true).await;

    let reply = engine.handle_turn(None, "go").await.unwrap();

    assert_eq!(store.dispatches().await.len(), 1);
    assert!(reply.reply.contains("\"TableName\":\"again\""));
}

#[tokio::test]
async fn conversation_continues_under_same_id() {
    let provider = Arc::new(MockProvider::with_replies(vec![
        r#"{"response_type": "NATURAL_LANGUAGE", "content": "first"}"#.to_string(),
        r#"{"response_type": "NATURAL_LANGUAGE", "content": "second"}"#.to_string(),
    ]));
    let store = Arc::new(MockTableStore::new());
    let engine = build_engine(&provider, &store, true, true).await;

    let first = engine.handle_turn(None, "one").await.unwrap();
    assert_eq!(first.conversation_id.len(), 36);

    let second = engine
        .handle_turn(Some(first.conversation_id.clone()), "two")
        .await
        .unwrap();

    assert_eq!(second.conversation_id, first.conversation_id);
    assert_eq!(second.history.len(), 4);

    // The second composition carried the whole transcript.
    let invocations = provider.invocations().await;
    assert_eq!(invocations[1].turns.len(), 3);
}

#[tokio::test]
async fn history_and_delete_round_trip() {
    let provider = Arc::new(MockProvider::with_replies(vec![
        r#"{"response_type": "NATURAL_LANGUAGE", "content": "hi"}"#.to_string(),
    ]));
    let store = Arc::new(MockTableStore::new());
    let engine = build_engine(&provider, &store, true, true).await;

    let reply = engine.handle_turn(None, "hello").await.unwrap();
    let id = reply.conversation_id;

    assert_eq!(engine.history(&id).await.unwrap().len(), 2);
    assert_eq!(engine.list_conversations().await.len(), 1);

    assert!(engine.delete_conversation(&id));
    assert!(engine.history(&id).await.is_none());
    assert!(!engine.delete_conversation(&id));
}
