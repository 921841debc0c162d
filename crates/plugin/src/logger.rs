// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! Logger sink contract.
//!
//! Every lifecycle, poll, route, and delivery event funnels through zero or
//! more configured loggers, fanned out concurrently by the engine's
//! `LoggerManager`. A logger that errors or panics is isolated from the
//! others and from the event pipeline itself — logging is never allowed to
//! block delivery.

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use serde_json::{Map, Value};
use thiserror::Error;

#[derive(Debug, Error)]
pub enum LoggerError {
    #[error("logger {logger_name} failed: {message}")]
    Failed { logger_name: String, message: String },
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LogLevel {
    Debug,
    Info,
    Warn,
    Error,
}

impl LogLevel {
    pub fn as_str(&self) -> &'static str {
        match self {
            LogLevel::Debug => "debug",
            LogLevel::Info => "info",
            LogLevel::Warn => "warn",
            LogLevel::Error => "error",
        }
    }
}

/// One structured log line, e.g. `deliver.success`, `poll.failure`,
/// `route.matched`, `module.loaded`.
#[derive(Debug, Clone)]
pub struct LogRecord {
    pub timestamp: DateTime<Utc>,
    pub level: LogLevel,
    pub module: String,
    pub kind: String,
    pub message: String,
    pub fields: Map<String, Value>,
}

impl LogRecord {
    pub fn new(module: impl Into<String>, level: LogLevel, kind: impl Into<String>, message: impl Into<String>) -> Self {
        Self {
            timestamp: Utc::now(),
            level,
            module: module.into(),
            kind: kind.into(),
            message: message.into(),
            fields: Map::new(),
        }
    }

    pub fn with_field(mut self, key: impl Into<String>, value: impl Into<Value>) -> Self {
        self.fields.insert(key.into(), value.into());
        self
    }
}

/// A logger sink. Implementations should never panic and should treat
/// their own failures as fire-and-forget: the caller logs the failure via
/// `tracing` and moves on.
#[async_trait]
pub trait Logger: Send + Sync + 'static {
    async fn log(&self, record: &LogRecord) -> Result<(), LoggerError>;

    /// Flush any buffered output. Default is a no-op for sinks that write
    /// synchronously on every `log()` call.
    async fn flush(&self) -> Result<(), LoggerError> {
        Ok(())
    }

    /// Release held resources. Called once on module unload or runtime
    /// stop; must be idempotent.
    async fn shutdown(&self) -> Result<(), LoggerError> {
        Ok(())
    }
}

/// Discards every record. Used when a module declares no loggers.
#[derive(Debug, Clone, Copy, Default)]
pub struct NoOpLogger;

#[async_trait]
impl Logger for NoOpLogger {
    async fn log(&self, _record: &LogRecord) -> Result<(), LoggerError> {
        Ok(())
    }
}

#[cfg(any(test, feature = "test-support"))]
mod fake;
#[cfg(any(test, feature = "test-support"))]
pub use fake::FakeLogger;

#[cfg(test)]
#[path = "logger_tests.rs"]
mod tests;
