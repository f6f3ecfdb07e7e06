// SPDX-FileCopyrightText: 2026 Tabletalk Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! `tabletalk config` command implementation.
//!
//! Prints the effective configuration as TOML, after merging config files
//! and environment overrides. Secret values are replaced with a placeholder
//! so the output is safe to paste into bug reports.

use tabletalk_config::model::TabletalkConfig;

const REDACTED: &str = "<redacted>";

/// Runs the `tabletalk config` command.
pub fn run_config(config: &TabletalkConfig) {
    match toml::to_string_pretty(&redact(config.clone())) {
        Ok(rendered) => print!("{rendered}"),
        Err(e) => eprintln!("error: failed to render configuration: {e}"),
    }
}

/// Masks secret values while keeping their presence visible.
fn redact(mut config: TabletalkConfig) -> TabletalkConfig {
    if config.anthropic.api_key.is_some() {
        config.anthropic.api_key = Some(REDACTED.to_string());
    }
    if config.dynamo.access_key_id.is_some() {
        config.dynamo.access_key_id = Some(REDACTED.to_string());
    }
    if config.dynamo.secret_access_key.is_some() {
        config.dynamo.secret_access_key = Some(REDACTED.to_string());
    }
    config
}
