// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! Source connector contract.
//!
//! A source produces events either by being polled on a schedule or by
//! receiving a webhook push (handled above this trait, at the runtime's HTTP
//! surface — the connector itself only ever sees `poll`).

use async_trait::async_trait;
use orgloop_core::RawEvent;
use serde_json::{Map, Value};
use thiserror::Error;

#[derive(Debug, Error)]
pub enum SourceError {
    #[error("source {source_id} init failed: {message}")]
    InitFailed { source_id: String, message: String },
    #[error("source {source_id} poll failed: {message}")]
    PollFailed { source_id: String, message: String },
    #[error("source {source_id} shutdown failed: {message}")]
    ShutdownFailed { source_id: String, message: String },
}

/// The outcome of one poll: zero or more events plus the cursor to hand
/// back on the next call. `next_cursor` of `None` means "nothing to persist,
/// start from scratch next time" — most connectors always return `Some`.
#[derive(Debug, Clone, Default)]
pub struct PollResult {
    pub events: Vec<RawEvent>,
    pub next_cursor: Option<Value>,
}

/// Adapter for a source plugin, polled by the scheduler on the
/// source's configured interval or cron expression.
#[async_trait]
pub trait SourceConnector: Send + Sync + 'static {
    /// One-time setup using the source's declarative config.
    async fn init(&self, config: &Map<String, Value>) -> Result<(), SourceError>;

    /// Fetch events since `cursor` (the last `next_cursor` this connector
    /// returned, or `None` on first poll).
    async fn poll(&self, cursor: Option<Value>) -> Result<PollResult, SourceError>;

    /// Release any held resources (connections, file handles) on module
    /// unload.
    async fn shutdown(&self) -> Result<(), SourceError>;
}

#[cfg(any(test, feature = "test-support"))]
mod fake;
#[cfg(any(test, feature = "test-support"))]
pub use fake::{FakeSourceConnector, SourceCall};

#[cfg(test)]
#[path = "source_tests.rs"]
mod tests;
