// SPDX-FileCopyrightText: 2026 Tabletalk Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Mock table store for deterministic testing.
//!
//! `MockTableStore` implements `TableStore` with scripted results, so engine
//! tests can exercise the full lookup path without a running DynamoDB. Every
//! dispatch is recorded with its operation and parameters.

use std::collections::VecDeque;
use std::sync::Arc;

use async_trait::async_trait;
use serde_json::{Map, Value};
use tokio::sync::Mutex;

use tabletalk_core::{TableOp, TableStore, TabletalkError};

/// One recorded call to [`MockTableStore::dispatch`].
#[derive(Debug, Clone)]
pub struct RecordedDispatch {
    pub op: TableOp,
    pub params: Map<String, Value>,
}

/// A mock table store that returns scripted results.
///
/// Results are popped from a FIFO queue. When the queue is empty, an empty
/// scan-shaped result is returned.
pub struct MockTableStore {
    results: Arc<Mutex<VecDeque<Result<Value, String>>>>,
    dispatches: Arc<Mutex<Vec<RecordedDispatch>>>,
}

impl MockTableStore {
    /// Create a new mock store with an empty result queue.
    pub fn new() -> Self {
        Self {
            results: Arc::new(Mutex::new(VecDeque::new())),
            dispatches: Arc::new(Mutex::new(Vec::new())),
        }
    }

    /// Create a mock store pre-loaded with the given successful results.
    pub fn with_results(results: Vec<Value>) -> Self {
        let queue: VecDeque<Result<Value, String>> = results.into_iter().map(Ok).collect();
        Self {
            results: Arc::new(Mutex::new(queue)),
            dispatches: Arc::new(Mutex::new(Vec::new())),
        }
    }

    /// Add a successful result to the end of the queue.
    pub async fn queue_result(&self, value: Value) {
        self.results.lock().await.push_back(Ok(value));
    }

    /// Add a failing dispatch to the end of the queue.
    pub async fn queue_error(&self, message: impl Into<String>) {
        self.results.lock().await.push_back(Err(message.into()));
    }

    /// Snapshot of every dispatch made so far, in call order.
    pub async fn dispatches(&self) -> Vec<RecordedDispatch> {
        self.dispatches.lock().await.clone()
    }

    /// Pop the next scripted result, or fall back to an empty scan result.
    async fn next_result(&self) -> Result<Value, String> {
        self.results.lock().await.pop_front().unwrap_or_else(|| {
            Ok(serde_json::json!({"Count": 0, "Items": [], "ScannedCount": 0}))
        })
    }
}

impl Default for MockTableStore {
    fn default() -> Self {
        Self::new()
    }
}

#[async_trait]
impl TableStore for MockTableStore {
    async fn dispatch(
        &self,
        op: TableOp,
        params: &Map<String, Value>,
    ) -> Result<Value, TabletalkError> {
        self.dispatches.lock().await.push(RecordedDispatch {
            op,
            params: params.clone(),
        });
        self.next_result()
            .await
            .map_err(TabletalkError::store)
    }
}
