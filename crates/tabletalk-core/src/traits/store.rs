// SPDX-FileCopyrightText: 2026 Tabletalk Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Backing-store trait for tabular/key-value lookups.

use async_trait::async_trait;
use serde_json::{Map, Value};

use crate::error::TabletalkError;
use crate::types::TableOp;

/// A tabular backing store addressed with DynamoDB-shaped requests.
///
/// `params` is the already-validated field map for the operation; the
/// operation discriminator travels separately and is never part of the
/// request body. One outbound request per call: no retry, and continuation
/// tokens in the response are returned as-is, not followed.
#[async_trait]
pub trait TableStore: Send + Sync {
    /// Dispatches one operation and returns the store's native result object.
    async fn dispatch(
        &self,
        op: TableOp,
        params: &Map<String, Value>,
    ) -> Result<Value, TabletalkError>;
}
