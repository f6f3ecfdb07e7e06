// SPDX-FileCopyrightText: 2026 Tabletalk Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Test utilities for Tabletalk integration tests.
//!
//! Provides mock trait implementations for fast, deterministic, CI-runnable
//! tests without external services.
//!
//! # Components
//!
//! - [`MockProvider`] - Mock model provider with pre-configured replies
//! - [`MockTableStore`] - Mock table store with scripted results and dispatch capture

pub mod mock_provider;
pub mod mock_store;

pub use mock_provider::{MockProvider, MockReply, RecordedInvocation};
pub use mock_store::{MockTableStore, RecordedDispatch};
