// SPDX-FileCopyrightText: 2026 Tabletalk Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Gateway HTTP server built on axum.
//!
//! Sets up routes, middleware, and shared state for the chat API.

use std::sync::Arc;
use std::time::Instant;

use axum::{
    routing::{get, post},
    Router,
};
use tower_http::cors::CorsLayer;
use tower_http::trace::TraceLayer;

use tabletalk_agent::{ChatEngine, PromptStore};
use tabletalk_core::TabletalkError;

use crate::handlers;

/// Shared state for axum request handlers.
#[derive(Clone)]
pub struct GatewayState {
    /// The conversation engine driving every chat turn.
    pub engine: Arc<ChatEngine>,
    /// Prompt state, reloadable through the API.
    pub prompts: Arc<PromptStore>,
    /// Process start time for uptime reporting.
    pub start_time: Instant,
}

impl GatewayState {
    pub fn new(engine: Arc<ChatEngine>, prompts: Arc<PromptStore>) -> Self {
        Self {
            engine,
            prompts,
            start_time: Instant::now(),
        }
    }
}

/// Gateway server configuration (mirrors GatewayConfig from tabletalk-config).
#[derive(Debug, Clone)]
pub struct ServerConfig {
    /// Host address to bind.
    pub host: String,
    /// Port to bind.
    pub port: u16,
}

/// Builds the API router with all routes and middleware attached.
pub fn create_router(state: GatewayState) -> Router {
    Router::new()
        .route("/", get(handlers::get_root))
        .route("/health", get(handlers::get_health))
        .route("/chat", post(handlers::post_chat))
        .route("/conversations", get(handlers::get_conversations))
        .route(
            "/conversation/{conversation_id}",
            get(handlers::get_conversation).delete(handlers::delete_conversation),
        )
        .route("/prompt/reload", post(handlers::post_prompt_reload))
        .layer(TraceLayer::new_for_http())
        .layer(CorsLayer::permissive())
        .with_state(state)
}

/// Starts the gateway HTTP server.
///
/// Binds to the configured host:port and serves until Ctrl-C, then drains
/// in-flight requests before returning.
pub async fn start_server(config: &ServerConfig, state: GatewayState) -> Result<(), TabletalkError> {
    let app = create_router(state);

    let addr = format!("{}:{}", config.host, config.port);
    let listener =
        tokio::net::TcpListener::bind(&addr)
            .await
            .map_err(|e| TabletalkError::Gateway {
                message: format!("failed to bind gateway to {addr}: {e}"),
                source: Some(Box::new(e)),
            })?;

    tracing::info!("Gateway server listening on {addr}");

    axum::serve(listener, app)
        .with_graceful_shutdown(shutdown_signal())
        .await
        .map_err(|e| TabletalkError::Gateway {
            message: format!("gateway server error: {e}"),
            source: Some(Box::new(e)),
        })?;

    Ok(())
}

async fn shutdown_signal() {
    if let Err(e) = tokio::signal::ctrl_c().await {
        tracing::error!(error = %e, "failed to listen for shutdown signal");
        return;
    }
    tracing::info!("shutdown signal received, draining connections");
}
