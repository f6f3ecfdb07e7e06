// SPDX-FileCopyrightText: 2026 Tabletalk Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! DynamoDB table store for Tabletalk.
//!
//! Implements [`tabletalk_core::TableStore`] over the low-level JSON wire
//! protocol (`application/x-amz-json-1.0`) with in-crate SigV4 request
//! signing. No AWS SDK: the four supported operations need only a signed
//! POST and the service's JSON error shape.

pub mod client;
pub mod sigv4;

pub use client::DynamoClient;
