// SPDX-FileCopyrightText: 2026 Tabletalk Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! HTTP gateway for Tabletalk.
//!
//! Serves the chat REST API over axum:
//!
//! - `POST /chat` runs one conversational turn
//! - `GET /conversation/{id}` and `DELETE /conversation/{id}` read and
//!   drop transcripts
//! - `GET /conversations` lists active conversations
//! - `POST /prompt/reload` re-reads the prompt sources without a restart
//! - `GET /health` and `GET /` report liveness

pub mod handlers;
pub mod server;

pub use server::{create_router, start_server, GatewayState, ServerConfig};
