// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! Fake source connector for testing.

use super::{PollResult, SourceConnector, SourceError};
use async_trait::async_trait;
use orgloop_core::RawEvent;
use parking_lot::Mutex;
use serde_json::{Map, Value};
use std::collections::VecDeque;
use std::sync::Arc;

#[derive(Debug, Clone)]
pub enum SourceCall {
    Init(Map<String, Value>),
    Poll(Option<Value>),
    Shutdown,
}

struct FakeState {
    calls: Vec<SourceCall>,
    responses: VecDeque<Result<PollResult, SourceError>>,
}

/// Records every call and returns pre-programmed poll responses in order.
/// Once responses are exhausted, returns an empty `PollResult`.
#[derive(Clone)]
pub struct FakeSourceConnector {
    inner: Arc<Mutex<FakeState>>,
}

impl Default for FakeSourceConnector {
    fn default() -> Self {
        Self {
            inner: Arc::new(Mutex::new(FakeState {
                calls: Vec::new(),
                responses: VecDeque::new(),
            })),
        }
    }
}

impl FakeSourceConnector {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn push_events(&self, events: Vec<RawEvent>, next_cursor: Option<Value>) {
        self.inner
            .lock()
            .responses
            .push_back(Ok(PollResult { events, next_cursor }));
    }

    pub fn push_error(&self, error: SourceError) {
        self.inner.lock().responses.push_back(Err(error));
    }

    pub fn calls(&self) -> Vec<SourceCall> {
        self.inner.lock().calls.clone()
    }
}

#[async_trait]
impl SourceConnector for FakeSourceConnector {
    async fn init(&self, config: &Map<String, Value>) -> Result<(), SourceError> {
        self.inner.lock().calls.push(SourceCall::Init(config.clone()));
        Ok(())
    }

    async fn poll(&self, cursor: Option<Value>) -> Result<PollResult, SourceError> {
        self.inner.lock().calls.push(SourceCall::Poll(cursor));
        let next = self.inner.lock().responses.pop_front();
        match next {
            Some(result) => result,
            None => Ok(PollResult::default()),
        }
    }

    async fn shutdown(&self) -> Result<(), SourceError> {
        self.inner.lock().calls.push(SourceCall::Shutdown);
        Ok(())
    }
}

#[cfg(test)]
#[path = "fake_tests.rs"]
mod tests;
