// SPDX-FileCopyrightText: 2026 Tabletalk Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Lookup spec validation and dispatch.
//!
//! The spec arrives from a generative model, so it is treated as hostile
//! on structure and friendly on intent: unknown fields are dropped rather
//! than rejected, while the operation itself must be one of the four
//! supported kinds. All outcomes, success or failure, leave here as a
//! uniform envelope; nothing is raised past this boundary.

use std::str::FromStr;

use serde_json::{Map, Value};
use tracing::{debug, warn};

use tabletalk_core::{TableOp, TableStore};

/// Fixed failure text placed in the envelope's `Message` field.
const FAILURE_MESSAGE: &str = "Failed to execute DynamoDB query";

/// Fields forwarded to the store for a point lookup.
const GET_ITEM_FIELDS: &[&str] = &[
    "TableName",
    "Key",
    "ProjectionExpression",
    "ExpressionAttributeNames",
    "ConsistentRead",
];

/// Fields forwarded for a key-range lookup.
const QUERY_FIELDS: &[&str] = &[
    "TableName",
    "IndexName",
    "KeyConditionExpression",
    "FilterExpression",
    "ProjectionExpression",
    "ExpressionAttributeNames",
    "ExpressionAttributeValues",
    "Limit",
    "ScanIndexForward",
    "ExclusiveStartKey",
    "ConsistentRead",
];

/// Fields forwarded for a full scan.
const SCAN_FIELDS: &[&str] = &[
    "TableName",
    "IndexName",
    "FilterExpression",
    "ProjectionExpression",
    "ExpressionAttributeNames",
    "ExpressionAttributeValues",
    "Limit",
    "ExclusiveStartKey",
    "ConsistentRead",
];

/// Fields forwarded for a batch point lookup. Target tables are embedded
/// per item inside `RequestItems`.
const BATCH_GET_FIELDS: &[&str] = &["RequestItems", "ReturnConsumedCapacity"];

fn allowed_fields(op: TableOp) -> &'static [&'static str] {
    match op {
        TableOp::GetItem => GET_ITEM_FIELDS,
        TableOp::Query => QUERY_FIELDS,
        TableOp::Scan => SCAN_FIELDS,
        TableOp::BatchGetItem => BATCH_GET_FIELDS,
    }
}

/// Result of one lookup attempt.
#[derive(Debug)]
pub struct QueryOutcome {
    /// False when `envelope` carries the failure shape.
    pub ok: bool,
    /// Success: the store's native result plus a `_generated_query` echo.
    /// Failure: `{Error, Message, _generated_query}`.
    pub envelope: Value,
}

/// Validates a lookup spec, narrows it to the allow-listed fields for its
/// operation, and dispatches it. Never fails past this function: every
/// outcome is an envelope.
pub async fn run_lookup(store: &dyn TableStore, spec: &Map<String, Value>) -> QueryOutcome {
    let Some(op_name) = spec.get("operation").and_then(Value::as_str) else {
        warn!("lookup spec has no operation field");
        return failure(spec, "Missing or non-string operation field".to_string());
    };

    let Ok(op) = TableOp::from_str(op_name) else {
        warn!(operation = op_name, "unsupported lookup operation");
        return failure(spec, format!("Unsupported operation: {op_name}"));
    };

    let (params, dropped) = narrow_spec(op, spec);
    if !dropped.is_empty() {
        debug!(operation = %op, dropped = ?dropped, "dropped fields outside the allow-list");
    }

    if op != TableOp::BatchGetItem && !params.contains_key("TableName") {
        warn!(operation = %op, "lookup spec has no TableName");
        return failure(spec, format!("TableName is required for {op}"));
    }

    match store.dispatch(op, &params).await {
        Ok(native) => QueryOutcome {
            ok: true,
            envelope: success_envelope(native, spec),
        },
        Err(e) => {
            warn!(operation = %op, error = %e, "store dispatch failed");
            failure(spec, e.to_string())
        }
    }
}

/// Splits the spec into allow-listed parameters and the dropped remainder.
/// The `operation` selector is consumed by dispatch and counts as neither.
fn narrow_spec(op: TableOp, spec: &Map<String, Value>) -> (Map<String, Value>, Vec<String>) {
    let allowed = allowed_fields(op);
    let mut params = Map::new();
    let mut dropped = Vec::new();
    for (key, value) in spec {
        if key == "operation" {
            continue;
        }
        if allowed.contains(&key.as_str()) {
            params.insert(key.clone(), value.clone());
        } else {
            dropped.push(key.clone());
        }
    }
    (params, dropped)
}

/// Native store result with the originating spec echoed in. A non-object
/// result is wrapped so the echo has somewhere to live.
fn success_envelope(native: Value, spec: &Map<String, Value>) -> Value {
    let mut envelope = match native {
        Value::Object(map) => map,
        other => {
            let mut map = Map::new();
            map.insert("Result".to_string(), other);
            map
        }
    };
    envelope.insert("_generated_query".to_string(), Value::Object(spec.clone()));
    Value::Object(envelope)
}

fn failure(spec: &Map<String, Value>, error: String) -> QueryOutcome {
    let mut envelope = Map::new();
    envelope.insert("Error".to_string(), Value::String(error));
    envelope.insert(
        "Message".to_string(),
        Value::String(FAILURE_MESSAGE.to_string()),
    );
    envelope.insert("_generated_query".to_string(), Value::Object(spec.clone()));
    QueryOutcome {
        ok: false,
        envelope: Value::Object(envelope),
    }
}
