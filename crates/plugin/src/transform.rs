// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! Package transform contract.
//!
//! A `package` transform is a compiled-in plugin referenced by name from a
//! route's transform list. `script` transforms don't go through
//! this trait at all — they run as a subprocess and are invoked directly by
//! the pipeline, since they have no Rust-side implementation to register.

use async_trait::async_trait;
use orgloop_core::Event;
use serde_json::{Map, Value};
use thiserror::Error;

#[derive(Debug, Error)]
pub enum TransformError {
    #[error("transform {transform_id} failed: {message}")]
    Failed { transform_id: String, message: String },
}

/// A named, in-process transform plugin. Transforms never mutate `Event` in
/// place — they consume the input and produce a new one. `Ok(None)` is an
/// unconditional drop: the route ends here regardless of the step's
/// `on_error` policy.
#[async_trait]
pub trait PackageTransform: Send + Sync + 'static {
    async fn apply(&self, event: Event, config: &Map<String, Value>) -> Result<Option<Event>, TransformError>;
}

#[cfg(any(test, feature = "test-support"))]
mod fake;
#[cfg(any(test, feature = "test-support"))]
pub use fake::FakePackageTransform;

#[cfg(test)]
#[path = "transform_tests.rs"]
mod tests;
