// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! Actor connector contract.
//!
//! Actors are the delivery target at the end of a route: a chat platform
//! reply, an issue comment, a subprocess invocation. The delivery stage
//! resolves the route's prompt (if any) before calling `deliver`.

use async_trait::async_trait;
use orgloop_core::Event;
use serde_json::{Map, Value};
use thiserror::Error;

#[derive(Debug, Error)]
pub enum ActorError {
    #[error("actor {actor_id} init failed: {message}")]
    InitFailed { actor_id: String, message: String },
    #[error("actor {actor_id} delivery failed: {message}")]
    DeliveryFailed { actor_id: String, message: String },
    #[error("actor {actor_id} shutdown failed: {message}")]
    ShutdownFailed { actor_id: String, message: String },
}

/// Opaque confirmation of a successful delivery, surfaced in
/// `deliver.success` log records.
#[derive(Debug, Clone, Default)]
pub struct DeliveryReceipt {
    pub external_id: Option<String>,
    pub detail: Option<Value>,
}

/// Adapter for an actor plugin, invoked once per matched, transformed event.
#[async_trait]
pub trait ActorConnector: Send + Sync + 'static {
    /// One-time setup using the actor's declarative config.
    async fn init(&self, config: &Map<String, Value>) -> Result<(), ActorError>;

    /// Deliver `event` to the actor. `prompt` is the resolved body of the
    /// route's `with.prompt_file`, if one was configured, with any YAML
    /// front matter already stripped.
    async fn deliver(
        &self,
        event: &Event,
        route_config: &Map<String, Value>,
        prompt: Option<&str>,
    ) -> Result<DeliveryReceipt, ActorError>;

    /// Release any held resources on module unload.
    async fn shutdown(&self) -> Result<(), ActorError>;
}

#[cfg(any(test, feature = "test-support"))]
mod fake;
#[cfg(any(test, feature = "test-support"))]
pub use fake::{ActorCall, FakeActorConnector};

#[cfg(test)]
#[path = "actor_tests.rs"]
mod tests;
