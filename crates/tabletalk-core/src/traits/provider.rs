// SPDX-FileCopyrightText: 2026 Tabletalk Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Model provider trait for generative text backends.

use async_trait::async_trait;

use crate::error::TabletalkError;
use crate::types::PromptTurn;

/// A generative text model invoked with an alternating-role transcript.
///
/// Implementations make exactly one outbound call per `invoke`: no retries
/// and no caching. A failed call is fatal to the turn that issued it, so
/// retry policy belongs to the caller, not the provider.
#[async_trait]
pub trait ModelProvider: Send + Sync {
    /// Sends the composed turns to `model` and returns the raw reply text.
    ///
    /// `turns` must strictly alternate user/assistant roles; composing such
    /// a sequence is the caller's responsibility.
    async fn invoke(&self, model: &str, turns: &[PromptTurn]) -> Result<String, TabletalkError>;
}
