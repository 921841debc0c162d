// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! Fake logger for testing.

use super::{LogRecord, Logger, LoggerError};
use async_trait::async_trait;
use parking_lot::Mutex;
use std::sync::Arc;

/// Records every record it receives. Can be told to fail every call, to
/// exercise fan-out failure isolation.
#[derive(Clone, Default)]
pub struct FakeLogger {
    records: Arc<Mutex<Vec<LogRecord>>>,
    always_fails: Arc<Mutex<bool>>,
}

impl FakeLogger {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn set_always_fails(&self, fails: bool) {
        *self.always_fails.lock() = fails;
    }

    pub fn records(&self) -> Vec<LogRecord> {
        self.records.lock().clone()
    }

    pub fn kinds(&self) -> Vec<String> {
        self.records.lock().iter().map(|r| r.kind.clone()).collect()
    }
}

#[async_trait]
impl Logger for FakeLogger {
    async fn log(&self, record: &LogRecord) -> Result<(), LoggerError> {
        self.records.lock().push(record.clone());
        if *self.always_fails.lock() {
            return Err(LoggerError::Failed {
                logger_name: "fake".to_string(),
                message: "configured to always fail".to_string(),
            });
        }
        Ok(())
    }
}

#[cfg(test)]
#[path = "fake_tests.rs"]
mod tests;
