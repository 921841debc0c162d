// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! Logger fan-out.
//!
//! Holds an ordered list of `(logger, tag)` entries. `log()` dispatches a
//! record to every entry concurrently; one logger's failure or panic never
//! blocks or fails the others. `remove_by_tag` drops every entry carrying a
//! module's tag on unload.

use futures::future::join_all;
use orgloop_plugin::{LogRecord, Logger, LoggerError};
use parking_lot::RwLock;
use std::sync::Arc;
use tracing::warn;

struct Entry {
    logger: Arc<dyn Logger>,
    tag: Option<String>,
}

/// Concurrent, failure-isolated fan-out across every configured logger sink.
#[derive(Default)]
pub struct LoggerManager {
    entries: RwLock<Vec<Entry>>,
}

impl LoggerManager {
    pub fn new() -> Self {
        Self::default()
    }

    /// Attach a logger, optionally tagged with the module that owns it.
    pub fn register(&self, logger: Arc<dyn Logger>, tag: Option<String>) {
        self.entries.write().push(Entry { logger, tag });
    }

    /// Drop every logger tagged with `tag` (spec: module unload).
    pub fn remove_by_tag(&self, tag: &str) {
        self.entries.write().retain(|e| e.tag.as_deref() != Some(tag));
    }

    pub fn len(&self) -> usize {
        self.entries.read().len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.read().is_empty()
    }

    /// Fan the record out to every sink concurrently. A sink's own error is
    /// logged via `tracing` and otherwise swallowed: observability must
    /// never threaten liveness.
    pub async fn log(&self, record: LogRecord) {
        let loggers: Vec<Arc<dyn Logger>> = self.entries.read().iter().map(|e| e.logger.clone()).collect();
        if loggers.is_empty() {
            return;
        }
        let record = Arc::new(record);
        let dispatches = loggers.into_iter().map(|logger| {
            let record = record.clone();
            async move { logger.log(&record).await }
        });
        for result in join_all(dispatches).await {
            if let Err(e) = result {
                log_dispatch_error(e);
            }
        }
    }

    /// Flush every sink, independently. Failures are swallowed the same way
    /// as `log()`.
    pub async fn flush(&self) {
        let loggers: Vec<Arc<dyn Logger>> = self.entries.read().iter().map(|e| e.logger.clone()).collect();
        let dispatches = loggers.into_iter().map(|logger| async move { logger.flush().await });
        for result in join_all(dispatches).await {
            if let Err(e) = result {
                log_dispatch_error(e);
            }
        }
    }

    /// Tear down every sink. Idempotent: called once on runtime stop.
    pub async fn shutdown(&self) {
        let loggers: Vec<Arc<dyn Logger>> = self.entries.read().iter().map(|e| e.logger.clone()).collect();
        let dispatches = loggers.into_iter().map(|logger| async move { logger.shutdown().await });
        for result in join_all(dispatches).await {
            if let Err(e) = result {
                log_dispatch_error(e);
            }
        }
        self.entries.write().clear();
    }
}

fn log_dispatch_error(e: LoggerError) {
    warn!(error = %e, "logger sink failed, dropping this record for that sink");
}

#[cfg(test)]
#[path = "logger_manager_tests.rs"]
mod tests;
