// SPDX-FileCopyrightText: 2026 Tabletalk Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! `tabletalk serve` command implementation.
//!
//! Wires the Anthropic provider, the DynamoDB table store, and the prompt
//! store into a chat engine, then serves the HTTP API until shutdown.

use std::sync::Arc;

use tracing::info;

use tabletalk_agent::{ChatEngine, PromptStore};
use tabletalk_anthropic::AnthropicClient;
use tabletalk_config::model::TabletalkConfig;
use tabletalk_core::TabletalkError;
use tabletalk_dynamo::DynamoClient;
use tabletalk_gateway::{start_server, GatewayState, ServerConfig};

/// Runs the `tabletalk serve` command.
pub async fn run_serve(config: TabletalkConfig) -> Result<(), TabletalkError> {
    init_tracing(&config.agent.log_level);

    info!("starting tabletalk serve");

    let api_key = resolve_credential(
        &config.anthropic.api_key,
        "ANTHROPIC_API_KEY",
        "anthropic.api_key",
    )?;
    let provider = Arc::new(AnthropicClient::new(
        api_key,
        config.anthropic.api_version.clone(),
        config.anthropic.default_model.clone(),
        config.anthropic.max_tokens,
    )?);
    info!(
        model = config.anthropic.default_model.as_str(),
        "Anthropic provider initialized"
    );

    let access_key_id = resolve_credential(
        &config.dynamo.access_key_id,
        "AWS_ACCESS_KEY_ID",
        "dynamo.access_key_id",
    )?;
    let secret_access_key = resolve_credential(
        &config.dynamo.secret_access_key,
        "AWS_SECRET_ACCESS_KEY",
        "dynamo.secret_access_key",
    )?;
    let store = Arc::new(DynamoClient::new(
        config.dynamo.region.clone(),
        config.dynamo.endpoint.clone(),
        access_key_id,
        secret_access_key,
    )?);
    info!(
        region = config.dynamo.region.as_str(),
        "DynamoDB table store initialized"
    );

    let prompts = Arc::new(PromptStore::load(config.prompt.clone()).await?);

    let engine = Arc::new(ChatEngine::new(
        provider,
        store,
        prompts.clone(),
        &config.agent,
        config.anthropic.default_model.clone(),
    ));

    let server_config = ServerConfig {
        host: config.gateway.host.clone(),
        port: config.gateway.port,
    };
    start_server(&server_config, GatewayState::new(engine, prompts)).await
}

/// Resolves a credential from config, falling back to an environment
/// variable.
fn resolve_credential(
    config_value: &Option<String>,
    env_var: &str,
    config_key: &str,
) -> Result<String, TabletalkError> {
    if let Some(value) = config_value
        && !value.is_empty()
    {
        return Ok(value.clone());
    }

    std::env::var(env_var).map_err(|_| {
        TabletalkError::Config(format!(
            "credential not found. Set {config_key} in config or the {env_var} environment variable."
        ))
    })
}

fn init_tracing(log_level: &str) {
    use tracing_subscriber::EnvFilter;

    let filter = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| EnvFilter::new(format!("{log_level},hyper=warn,reqwest=warn")));

    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_target(true)
        .with_thread_names(false)
        .init();
}
