// SPDX-FileCopyrightText: 2026 Tabletalk Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Configuration loader using Figment for layered config merging.
//!
//! Supports XDG hierarchy: `./tabletalk.toml` > `~/.config/tabletalk/tabletalk.toml`
//! > `/etc/tabletalk/tabletalk.toml` with environment variable overrides via the
//! `TABLETALK_` prefix.

#![allow(clippy::result_large_err)] // figment::Error is external and cannot be boxed without wrapper

use std::path::Path;

use figment::{
    Figment,
    providers::{Env, Format, Serialized, Toml},
};

use crate::model::TabletalkConfig;

/// Load configuration from the standard XDG hierarchy with env var overrides.
///
/// Merge order (later overrides earlier):
/// 1. Compiled defaults
/// 2. `/etc/tabletalk/tabletalk.toml` (system-wide)
/// 3. `~/.config/tabletalk/tabletalk.toml` (user XDG config)
/// 4. `./tabletalk.toml` (local directory)
/// 5. `TABLETALK_*` environment variables
pub fn load_config() -> Result<TabletalkConfig, figment::Error> {
    Figment::new()
        .merge(Serialized::defaults(TabletalkConfig::default()))
        .merge(Toml::file("/etc/tabletalk/tabletalk.toml"))
        .merge(Toml::file(
            dirs::config_dir()
                .map(|d| d.join("tabletalk/tabletalk.toml"))
                .unwrap_or_default(),
        ))
        .merge(Toml::file("tabletalk.toml"))
        .merge(env_provider())
        .extract()
}

/// Load configuration from a TOML string only (no XDG lookup, no env vars).
///
/// Used for testing and explicit config specification.
pub fn load_config_from_str(toml_content: &str) -> Result<TabletalkConfig, figment::Error> {
    Figment::new()
        .merge(Serialized::defaults(TabletalkConfig::default()))
        .merge(Toml::string(toml_content))
        .extract()
}

/// Load configuration from a specific file path with env var overrides.
pub fn load_config_from_path(path: &Path) -> Result<TabletalkConfig, figment::Error> {
    Figment::new()
        .merge(Serialized::defaults(TabletalkConfig::default()))
        .merge(Toml::file(path))
        .merge(env_provider())
        .extract()
}

/// Create the environment variable provider using explicit `map()` for
/// section-to-dot mapping.
///
/// Uses `Env::map()` rather than `Env::split("_")` to avoid ambiguity with
/// underscore-containing key names: `TABLETALK_AGENT_LOG_LEVEL` must map to
/// `agent.log_level`, not `agent.log.level`.
fn env_provider() -> Env {
    Env::prefixed("TABLETALK_").map(|key| {
        // `key` is the lowercased env var name with prefix stripped.
        // Example: TABLETALK_DYNAMO_ACCESS_KEY_ID -> "dynamo_access_key_id"
        let key_str = key.as_str();
        let mapped = key_str
            .replacen("agent_", "agent.", 1)
            .replacen("anthropic_", "anthropic.", 1)
            .replacen("dynamo_", "dynamo.", 1)
            .replacen("gateway_", "gateway.", 1)
            .replacen("prompt_", "prompt.", 1);
        mapped.into()
    })
}
