// SPDX-FileCopyrightText: 2026 Tabletalk Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Post-deserialization validation for configuration values.
//!
//! Validates semantic constraints that cannot be expressed via serde
//! attributes, such as valid bind addresses, sane token budgets, and
//! well-formed endpoint URLs.

use crate::diagnostic::ConfigError;
use crate::model::TabletalkConfig;

/// Validate a deserialized configuration for semantic correctness.
///
/// Returns `Ok(())` if all validations pass, or `Err(Vec<ConfigError>)` with
/// all collected validation errors (does not fail fast).
pub fn validate_config(config: &TabletalkConfig) -> Result<(), Vec<ConfigError>> {
    let mut errors = Vec::new();

    let host = config.gateway.host.trim();
    if host.is_empty() {
        errors.push(ConfigError::Validation {
            message: "gateway.host must not be empty".to_string(),
        });
    } else {
        let is_valid_ip = host.parse::<std::net::IpAddr>().is_ok();
        let is_valid_hostname = host
            .chars()
            .all(|c| c.is_alphanumeric() || c == '.' || c == '-' || c == ':');
        if !is_valid_ip && !is_valid_hostname {
            errors.push(ConfigError::Validation {
                message: format!("gateway.host `{host}` is not a valid IP address or hostname"),
            });
        }
    }

    if config.anthropic.max_tokens == 0 {
        errors.push(ConfigError::Validation {
            message: "anthropic.max_tokens must be at least 1".to_string(),
        });
    }

    if config.dynamo.region.trim().is_empty() {
        errors.push(ConfigError::Validation {
            message: "dynamo.region must not be empty".to_string(),
        });
    }

    if let Some(endpoint) = &config.dynamo.endpoint
        && !(endpoint.starts_with("http://") || endpoint.starts_with("https://"))
    {
        errors.push(ConfigError::Validation {
            message: format!("dynamo.endpoint `{endpoint}` must start with http:// or https://"),
        });
    }

    if let Some(table) = &config.prompt.restrict_table
        && table.trim().is_empty()
    {
        errors.push(ConfigError::Validation {
            message: "prompt.restrict_table must not be empty when set".to_string(),
        });
    }

    if let Some(path) = &config.prompt.instructions_file
        && path.trim().is_empty()
    {
        errors.push(ConfigError::Validation {
            message: "prompt.instructions_file must not be empty when set".to_string(),
        });
    }

    if let Some(path) = &config.prompt.schema_file
        && path.trim().is_empty()
    {
        errors.push(ConfigError::Validation {
            message: "prompt.schema_file must not be empty when set".to_string(),
        });
    }

    let level = config.agent.log_level.as_str();
    if !matches!(level, "trace" | "debug" | "info" | "warn" | "error") {
        errors.push(ConfigError::Validation {
            message: format!(
                "agent.log_level `{level}` is not one of trace, debug, info, warn, error"
            ),
        });
    }

    if errors.is_empty() { Ok(()) } else { Err(errors) }
}
