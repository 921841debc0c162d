// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! Fake package transform for testing.

use super::{PackageTransform, TransformError};
use async_trait::async_trait;
use orgloop_core::Event;
use parking_lot::Mutex;
use serde_json::{Map, Value};
use std::sync::Arc;

type TransformFn = dyn Fn(Event) -> Result<Option<Event>, TransformError> + Send + Sync;

/// Applies a caller-supplied function to every event, recording how many
/// times it was called and with what config.
#[derive(Clone)]
pub struct FakePackageTransform {
    apply_fn: Arc<TransformFn>,
    configs_seen: Arc<Mutex<Vec<Map<String, Value>>>>,
}

impl FakePackageTransform {
    /// Pass the event through unchanged.
    pub fn identity() -> Self {
        Self::new(|event| Ok(Some(event)))
    }

    /// Unconditionally drop every event, as if `execute` returned `null`.
    pub fn always_drops() -> Self {
        Self::new(|_event| Ok(None))
    }

    pub fn new(apply_fn: impl Fn(Event) -> Result<Option<Event>, TransformError> + Send + Sync + 'static) -> Self {
        Self {
            apply_fn: Arc::new(apply_fn),
            configs_seen: Arc::new(Mutex::new(Vec::new())),
        }
    }

    pub fn always_fails(transform_id: impl Into<String>, message: impl Into<String>) -> Self {
        let transform_id = transform_id.into();
        let message = message.into();
        Self::new(move |_event| {
            Err(TransformError::Failed {
                transform_id: transform_id.clone(),
                message: message.clone(),
            })
        })
    }

    pub fn configs_seen(&self) -> Vec<Map<String, Value>> {
        self.configs_seen.lock().clone()
    }
}

#[async_trait]
impl PackageTransform for FakePackageTransform {
    async fn apply(&self, event: Event, config: &Map<String, Value>) -> Result<Option<Event>, TransformError> {
        self.configs_seen.lock().push(config.clone());
        (self.apply_fn)(event)
    }
}

#[cfg(test)]
#[path = "fake_tests.rs"]
mod tests;
