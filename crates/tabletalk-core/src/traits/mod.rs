// SPDX-FileCopyrightText: 2026 Tabletalk Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Collaborator trait definitions.
//!
//! The conversation engine only ever sees these seams: a generative model
//! behind [`ModelProvider`] and a tabular backing store behind
//! [`TableStore`]. Both use `#[async_trait]` for dynamic dispatch.

pub mod provider;
pub mod store;

pub use provider::ModelProvider;
pub use store::TableStore;
