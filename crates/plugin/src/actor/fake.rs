// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! Fake actor connector for testing.

use super::{ActorError, DeliveryReceipt};
use crate::actor::ActorConnector;
use async_trait::async_trait;
use orgloop_core::Event;
use parking_lot::Mutex;
use serde_json::{Map, Value};
use std::sync::Arc;

#[derive(Debug, Clone)]
pub struct ActorCall {
    pub event: Event,
    pub route_config: Map<String, Value>,
    pub prompt: Option<String>,
}

struct FakeState {
    calls: Vec<ActorCall>,
    fail_next: Option<ActorError>,
}

/// Records every delivery it receives; can be told to fail the next call.
#[derive(Clone)]
pub struct FakeActorConnector {
    inner: Arc<Mutex<FakeState>>,
}

impl Default for FakeActorConnector {
    fn default() -> Self {
        Self {
            inner: Arc::new(Mutex::new(FakeState {
                calls: Vec::new(),
                fail_next: None,
            })),
        }
    }
}

impl FakeActorConnector {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn fail_next_delivery(&self, error: ActorError) {
        self.inner.lock().fail_next = Some(error);
    }

    pub fn calls(&self) -> Vec<ActorCall> {
        self.inner.lock().calls.clone()
    }
}

#[async_trait]
impl ActorConnector for FakeActorConnector {
    async fn init(&self, _config: &Map<String, Value>) -> Result<(), ActorError> {
        Ok(())
    }

    async fn deliver(
        &self,
        event: &Event,
        route_config: &Map<String, Value>,
        prompt: Option<&str>,
    ) -> Result<DeliveryReceipt, ActorError> {
        let mut guard = self.inner.lock();
        guard.calls.push(ActorCall {
            event: event.clone(),
            route_config: route_config.clone(),
            prompt: prompt.map(str::to_string),
        });
        if let Some(error) = guard.fail_next.take() {
            return Err(error);
        }
        Ok(DeliveryReceipt::default())
    }

    async fn shutdown(&self) -> Result<(), ActorError> {
        Ok(())
    }
}

#[cfg(test)]
#[path = "fake_tests.rs"]
mod tests;
