// SPDX-FileCopyrightText: 2026 Tabletalk Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Core library for the Tabletalk service.
//!
//! This crate provides the shared vocabulary of the workspace: transcript
//! and prompt types, the error type, and the traits behind which the two
//! external collaborators (generative model, backing store) live.

pub mod error;
pub mod traits;
pub mod types;

// Re-export key items at crate root for ergonomic imports.
pub use error::TabletalkError;
pub use traits::{ModelProvider, TableStore};
pub use types::{ChatMessage, PromptTurn, Role, TableOp, TurnRole};
