// SPDX-FileCopyrightText: 2026 Tabletalk Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Reloadable prompt and schema state.
//!
//! Owns the operating instructions, the table schema description, and the
//! optional single-table restriction. Loaded once at startup and swapped
//! atomically on explicit reload; turns already in flight keep the bundle
//! they started with, so a reload never lands mid-turn.

use std::sync::Arc;

use arc_swap::ArcSwap;
use serde_json::Value;
use tracing::info;

use tabletalk_config::PromptConfig;
use tabletalk_core::TabletalkError;

/// Operating instructions used when none are configured.
///
/// Describes the directive protocol the model must follow. Lookup results
/// are fed back in a user turn prefixed with `[lookup results]`, which the
/// text below tells the model to expect.
const DEFAULT_INSTRUCTIONS: &str = r#"You are a data assistant with access to DynamoDB tables.

For every user message, reply with a single JSON object and nothing else:

{"response_type": "NATURAL_LANGUAGE", "content": "<your answer as plain text>"}

or, when the question requires data from a table:

{"response_type": "QUERY", "content": {"operation": "<Query|Scan|GetItem|BatchGetItem>", "TableName": "<table>", ...}}

For QUERY, "content" holds the DynamoDB request parameters in the low-level
JSON form (KeyConditionExpression, ExpressionAttributeValues, Key, and so on).
Use the smallest operation that answers the question: GetItem for a known
primary key, Query for a key range, Scan only when nothing narrower works.

After a QUERY, the results arrive in the next user turn prefixed with
"[lookup results]". Read them and reply with a NATURAL_LANGUAGE directive
summarizing the data for the user. Never invent rows that are not in the
results."#;

/// One immutable snapshot of the prompt state.
#[derive(Debug)]
pub struct PromptBundle {
    pub instructions: String,
    /// Structured schema description, `Value::Null` when unconfigured.
    pub schema: Value,
    pub restrict_table: Option<String>,
}

impl PromptBundle {
    /// Renders the system-context block placed at the head of every
    /// composed prompt: instructions, then the schema if present, then the
    /// table restriction if present.
    pub fn system_block(&self) -> String {
        let mut block = self.instructions.clone();
        if !self.schema.is_null() {
            let rendered = serde_json::to_string_pretty(&self.schema)
                .unwrap_or_else(|_| self.schema.to_string());
            block.push_str("\n\nDatabase schema:\n");
            block.push_str(&rendered);
        }
        if let Some(ref table) = self.restrict_table {
            block.push_str(&format!(
                "\n\nOnly the table \"{table}\" may be queried. Never reference any other table."
            ));
        }
        block
    }
}

/// Process-owned prompt state with atomic reload.
#[derive(Debug)]
pub struct PromptStore {
    config: PromptConfig,
    bundle: ArcSwap<PromptBundle>,
}

impl PromptStore {
    /// Reads the initial bundle from the configured sources.
    pub async fn load(config: PromptConfig) -> Result<Self, TabletalkError> {
        let bundle = read_bundle(&config).await?;
        Ok(Self {
            config,
            bundle: ArcSwap::from_pointee(bundle),
        })
    }

    /// The current bundle. Callers hold the returned `Arc` for the duration
    /// of the work that uses it.
    pub fn current(&self) -> Arc<PromptBundle> {
        self.bundle.load_full()
    }

    /// Re-reads the configured sources and swaps the bundle. On failure the
    /// previous bundle stays in place.
    pub async fn reload(&self) -> Result<(), TabletalkError> {
        let bundle = read_bundle(&self.config).await?;
        self.bundle.store(Arc::new(bundle));
        info!("prompt bundle reloaded");
        Ok(())
    }
}

async fn read_bundle(config: &PromptConfig) -> Result<PromptBundle, TabletalkError> {
    let instructions = load_instructions(config).await?;
    let schema = load_schema(config).await?;
    Ok(PromptBundle {
        instructions,
        schema,
        restrict_table: config.restrict_table.clone(),
    })
}

/// Loads instructions following config priority: file > inline > built-in.
///
/// A configured but unreadable file is an error rather than a silent
/// fallback, so a failed reload is visible to the caller that asked for it.
async fn load_instructions(config: &PromptConfig) -> Result<String, TabletalkError> {
    if let Some(ref path) = config.instructions_file {
        let content = tokio::fs::read_to_string(path).await.map_err(|e| {
            TabletalkError::Config(format!("failed to read instructions file {path}: {e}"))
        })?;
        let trimmed = content.trim().to_string();
        if trimmed.is_empty() {
            return Err(TabletalkError::Config(format!(
                "instructions file {path} is empty"
            )));
        }
        info!(path = path.as_str(), "loaded instructions from file");
        return Ok(trimmed);
    }

    if let Some(ref inline) = config.instructions
        && !inline.is_empty()
    {
        return Ok(inline.clone());
    }

    Ok(DEFAULT_INSTRUCTIONS.to_string())
}

async fn load_schema(config: &PromptConfig) -> Result<Value, TabletalkError> {
    let Some(ref path) = config.schema_file else {
        return Ok(Value::Null);
    };
    let content = tokio::fs::read_to_string(path)
        .await
        .map_err(|e| TabletalkError::Config(format!("failed to read schema file {path}: {e}")))?;
    let schema: Value = serde_json::from_str(&content).map_err(|e| {
        TabletalkError::Config(format!("schema file {path} is not valid JSON: {e}"))
    })?;
    info!(path = path.as_str(), "loaded schema from file");
    Ok(schema)
}
