// SPDX-FileCopyrightText: 2026 Tabletalk Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Configuration model structs for the Tabletalk service.
//!
//! All structs use `#[serde(deny_unknown_fields)]` so unrecognized keys are
//! rejected at startup with actionable error messages.

use serde::{Deserialize, Serialize};

/// Top-level Tabletalk configuration.
///
/// Loaded from TOML files following the XDG hierarchy, with environment
/// variable overrides. All sections are optional and default to sensible
/// values.
#[derive(Debug, Clone, Default, Deserialize, Serialize)]
#[serde(deny_unknown_fields)]
pub struct TabletalkConfig {
    /// Conversation engine behavior settings.
    #[serde(default)]
    pub agent: AgentConfig,

    /// Anthropic API settings.
    #[serde(default)]
    pub anthropic: AnthropicConfig,

    /// DynamoDB backing-store settings.
    #[serde(default)]
    pub dynamo: DynamoConfig,

    /// HTTP gateway settings.
    #[serde(default)]
    pub gateway: GatewayConfig,

    /// Prompt and schema material settings.
    #[serde(default)]
    pub prompt: PromptConfig,
}

/// Conversation engine configuration.
#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(deny_unknown_fields)]
pub struct AgentConfig {
    /// Service display name.
    #[serde(default = "default_agent_name")]
    pub name: String,

    /// Logging level (trace, debug, info, warn, error).
    #[serde(default = "default_log_level")]
    pub log_level: String,

    /// When true, a second model pass summarizes lookup results. When
    /// false, a fixed sentence reporting the result count is used instead,
    /// saving one model round-trip per lookup turn.
    #[serde(default = "default_summarize_results")]
    pub summarize_results: bool,

    /// When true, failed-lookup envelopes attached to assistant messages
    /// include the store's error detail. When false, the detail is redacted
    /// and only the fixed message and attempted spec are attached.
    #[serde(default = "default_attach_failure_detail")]
    pub attach_failure_detail: bool,
}

impl Default for AgentConfig {
    fn default() -> Self {
        Self {
            name: default_agent_name(),
            log_level: default_log_level(),
            summarize_results: default_summarize_results(),
            attach_failure_detail: default_attach_failure_detail(),
        }
    }
}

fn default_agent_name() -> String {
    "tabletalk".to_string()
}

fn default_log_level() -> String {
    "info".to_string()
}

fn default_summarize_results() -> bool {
    true
}

fn default_attach_failure_detail() -> bool {
    true
}

/// Anthropic API configuration.
#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(deny_unknown_fields)]
pub struct AnthropicConfig {
    /// Anthropic API key. `None` requires the `ANTHROPIC_API_KEY`
    /// environment variable.
    #[serde(default)]
    pub api_key: Option<String>,

    /// Default model for both the decision pass and the summary pass.
    #[serde(default = "default_model")]
    pub default_model: String,

    /// Maximum tokens to generate per response.
    #[serde(default = "default_max_tokens")]
    pub max_tokens: u32,

    /// Anthropic API version string.
    #[serde(default = "default_api_version")]
    pub api_version: String,
}

impl Default for AnthropicConfig {
    fn default() -> Self {
        Self {
            api_key: None,
            default_model: default_model(),
            max_tokens: default_max_tokens(),
            api_version: default_api_version(),
        }
    }
}

fn default_model() -> String {
    "claude-sonnet-4-20250514".to_string()
}

fn default_max_tokens() -> u32 {
    1000
}

fn default_api_version() -> String {
    "2023-06-01".to_string()
}

/// DynamoDB backing-store configuration.
#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(deny_unknown_fields)]
pub struct DynamoConfig {
    /// AWS region for request signing and the default endpoint.
    #[serde(default = "default_region")]
    pub region: String,

    /// Endpoint URL override (for DynamoDB Local or VPC endpoints).
    /// Defaults to `https://dynamodb.{region}.amazonaws.com`.
    #[serde(default)]
    pub endpoint: Option<String>,

    /// AWS access key id. `None` requires the `AWS_ACCESS_KEY_ID`
    /// environment variable.
    #[serde(default)]
    pub access_key_id: Option<String>,

    /// AWS secret access key. `None` requires the `AWS_SECRET_ACCESS_KEY`
    /// environment variable.
    #[serde(default)]
    pub secret_access_key: Option<String>,
}

impl Default for DynamoConfig {
    fn default() -> Self {
        Self {
            region: default_region(),
            endpoint: None,
            access_key_id: None,
            secret_access_key: None,
        }
    }
}

fn default_region() -> String {
    "us-east-1".to_string()
}

/// HTTP gateway configuration.
#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(deny_unknown_fields)]
pub struct GatewayConfig {
    /// Host address to bind.
    #[serde(default = "default_gateway_host")]
    pub host: String,

    /// Port to bind.
    #[serde(default = "default_gateway_port")]
    pub port: u16,
}

impl Default for GatewayConfig {
    fn default() -> Self {
        Self {
            host: default_gateway_host(),
            port: default_gateway_port(),
        }
    }
}

fn default_gateway_host() -> String {
    "0.0.0.0".to_string()
}

fn default_gateway_port() -> u16 {
    8000
}

/// Prompt and schema material configuration.
#[derive(Debug, Clone, Default, Deserialize, Serialize)]
#[serde(deny_unknown_fields)]
pub struct PromptConfig {
    /// Inline operating instructions. Overridden by `instructions_file`
    /// when both are set; when neither is set the built-in instructions
    /// are used.
    #[serde(default)]
    pub instructions: Option<String>,

    /// Path to a file containing the operating instructions. Takes
    /// precedence over `instructions`.
    #[serde(default)]
    pub instructions_file: Option<String>,

    /// Path to a JSON file describing the database schema. Rendered into
    /// the system-context block of every prompt.
    #[serde(default)]
    pub schema_file: Option<String>,

    /// When set, the system-context block names this as the single table
    /// lookups may touch.
    #[serde(default)]
    pub restrict_table: Option<String>,
}
