// SPDX-FileCopyrightText: 2026 Tabletalk Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! HTTP client for the DynamoDB low-level JSON protocol.
//!
//! Speaks `application/x-amz-json-1.0` directly: one POST to the endpoint
//! root per operation, routed by the `X-Amz-Target` header and signed with
//! SigV4. One attempt per dispatch; continuation tokens in responses are
//! returned untouched.

use std::time::Duration;

use async_trait::async_trait;
use chrono::Utc;
use serde::Deserialize;
use serde_json::{Map, Value};
use tracing::debug;

use tabletalk_core::{TableOp, TableStore, TabletalkError};

use crate::sigv4::{self, SigningParams};

/// Wire prefix for the `X-Amz-Target` header.
const TARGET_PREFIX: &str = "DynamoDB_20120810";

/// HTTP client for DynamoDB communication.
#[derive(Debug, Clone)]
pub struct DynamoClient {
    client: reqwest::Client,
    endpoint: String,
    host: String,
    region: String,
    access_key_id: String,
    secret_access_key: String,
}

impl DynamoClient {
    /// Creates a new DynamoDB client.
    ///
    /// `endpoint` overrides the regional default, e.g. for DynamoDB Local;
    /// `None` targets `https://dynamodb.{region}.amazonaws.com`.
    pub fn new(
        region: String,
        endpoint: Option<String>,
        access_key_id: String,
        secret_access_key: String,
    ) -> Result<Self, TabletalkError> {
        let endpoint =
            endpoint.unwrap_or_else(|| format!("https://dynamodb.{region}.amazonaws.com"));

        let url = reqwest::Url::parse(&endpoint)
            .map_err(|e| TabletalkError::Config(format!("invalid dynamo endpoint: {e}")))?;
        let host = url
            .host_str()
            .ok_or_else(|| TabletalkError::Config("dynamo endpoint has no host".to_string()))?;
        // The signed host must match the Host header reqwest sends, which
        // carries the port only when it is non-default for the scheme.
        let host = match url.port() {
            Some(port) => format!("{host}:{port}"),
            None => host.to_string(),
        };

        let client = reqwest::Client::builder()
            .timeout(Duration::from_secs(30))
            .build()
            .map_err(|e| TabletalkError::Store {
                message: format!("failed to build HTTP client: {e}"),
                source: Some(Box::new(e)),
            })?;

        Ok(Self {
            client,
            endpoint,
            host,
            region,
            access_key_id,
            secret_access_key,
        })
    }

    /// The resolved endpoint URL this client talks to.
    pub fn endpoint(&self) -> &str {
        &self.endpoint
    }
}

#[async_trait]
impl TableStore for DynamoClient {
    async fn dispatch(
        &self,
        op: TableOp,
        params: &Map<String, Value>,
    ) -> Result<Value, TabletalkError> {
        let payload = serde_json::to_string(params).map_err(|e| {
            TabletalkError::Internal(format!("failed to serialize request body: {e}"))
        })?;
        let target = format!("{TARGET_PREFIX}.{op}");

        let signed = sigv4::sign(&SigningParams {
            access_key_id: &self.access_key_id,
            secret_access_key: &self.secret_access_key,
            region: &self.region,
            host: &self.host,
            target: &target,
            payload: &payload,
            timestamp: Utc::now(),
        })?;

        let response = self
            .client
            .post(&self.endpoint)
            .header("content-type", sigv4::CONTENT_TYPE)
            .header("x-amz-date", &signed.amz_date)
            .header("x-amz-target", &target)
            .header("authorization", &signed.authorization)
            .body(payload)
            .send()
            .await
            .map_err(|e| TabletalkError::Store {
                message: format!("HTTP request failed: {e}"),
                source: Some(Box::new(e)),
            })?;

        let status = response.status();
        debug!(status = %status, operation = %op, "store response received");

        let body = response.text().await.map_err(|e| TabletalkError::Store {
            message: format!("failed to read response body: {e}"),
            source: Some(Box::new(e)),
        })?;

        if status.is_success() {
            serde_json::from_str(&body).map_err(|e| TabletalkError::Store {
                message: format!("failed to parse store response: {e}"),
                source: Some(Box::new(e)),
            })
        } else {
            Err(map_service_error(status, &body))
        }
    }
}

/// DynamoDB service error body.
#[derive(Debug, Deserialize)]
struct ServiceError {
    /// Fully qualified exception, e.g.
    /// `com.amazonaws.dynamodb.v20120810#ResourceNotFoundException`.
    #[serde(rename = "__type")]
    type_: Option<String>,
    /// The service uses both spellings depending on the exception.
    #[serde(rename = "message", alias = "Message")]
    message: Option<String>,
}

/// Maps a non-2xx response body to a store error.
fn map_service_error(status: reqwest::StatusCode, body: &str) -> TabletalkError {
    match serde_json::from_str::<ServiceError>(body) {
        Ok(err) if err.type_.is_some() || err.message.is_some() => {
            let exception = err
                .type_
                .as_deref()
                .and_then(|t| t.rsplit('#').next())
                .unwrap_or("UnknownException");
            let detail = err.message.as_deref().unwrap_or("no detail provided");
            TabletalkError::store(format!("{exception}: {detail}"))
        }
        _ => TabletalkError::store(format!("store returned {status}: {body}")),
    }
}
