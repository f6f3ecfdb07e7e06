// SPDX-FileCopyrightText: 2026 Tabletalk Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Anthropic Messages API provider for Tabletalk.
//!
//! Implements [`tabletalk_core::ModelProvider`] over the Messages API. The
//! client makes exactly one attempt per invocation; the conversation engine
//! treats a failed call as fatal to the turn, so there is nothing useful a
//! retry here could add.

pub mod client;
pub mod types;

pub use client::AnthropicClient;
pub use types::{ApiMessage, MessageRequest, MessageResponse};
