// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! Delivery stage.
//!
//! For each route an event survived the transform pipeline for: resolve the
//! route's prompt file (if any), invoke the actor, and log the attempt and
//! its outcome. Prompt read failures are non-fatal — delivery proceeds
//! without a prompt rather than dropping the event.

use crate::logger_manager::LoggerManager;
use orgloop_core::{parse_front_matter, Event, RouteConfig};
use orgloop_plugin::{ActorConnector, DeliveryReceipt, LogLevel, LogRecord};
use serde_json::Value;
use std::path::PathBuf;
use std::time::Instant;
use tracing::{info, warn};

/// The route's prompt file, resolved and stripped of front matter.
struct ResolvedPrompt {
    body: String,
    file: PathBuf,
    meta: serde_json::Map<String, serde_json::Value>,
}

fn resolve_prompt(route: &RouteConfig) -> Option<ResolvedPrompt> {
    let file = route.with.prompt_file.as_ref()?;
    let raw = match std::fs::read_to_string(file) {
        Ok(raw) => raw,
        Err(e) => {
            warn!(route = %route.name, file = %file.display(), error = %e, "failed to read prompt file, delivering without a prompt");
            return None;
        }
    };
    let parsed = parse_front_matter(&raw);
    Some(ResolvedPrompt {
        body: parsed.body,
        file: file.clone(),
        meta: parsed.metadata,
    })
}

/// Outcome of one delivery attempt.
#[derive(Debug)]
pub struct DeliveryOutcome {
    pub receipt: Option<DeliveryReceipt>,
    pub error: Option<String>,
    pub duration_ms: u64,
}

impl DeliveryOutcome {
    pub fn is_success(&self) -> bool {
        self.error.is_none()
    }
}

/// Deliver `event` to `actor` per `route`, logging `deliver.attempt` and
/// then `deliver.success`/`deliver.failure` through `loggers`.
pub async fn deliver(
    actor: &dyn ActorConnector,
    event: &Event,
    route: &RouteConfig,
    module: &str,
    loggers: &LoggerManager,
) -> DeliveryOutcome {
    let mut delivery_config = route.then.config.clone();
    let prompt = resolve_prompt(route);
    if let Some(p) = &prompt {
        delivery_config.insert("launch_prompt".to_string(), Value::String(p.body.clone()));
        delivery_config.insert("launch_prompt_file".to_string(), Value::String(p.file.display().to_string()));
        delivery_config.insert("launch_prompt_meta".to_string(), Value::Object(p.meta.clone()));
    }

    loggers
        .log(
            LogRecord::new(module, LogLevel::Info, "deliver.attempt", "delivering event")
                .with_field("event_id", event.id.to_string())
                .with_field("trace_id", event.trace_id.to_string())
                .with_field("route", route.name.clone())
                .with_field("target", route.then.actor.clone()),
        )
        .await;

    let started = Instant::now();
    let result = actor
        .deliver(event, &delivery_config, prompt.as_ref().map(|p| p.body.as_str()))
        .await;
    let duration_ms = started.elapsed().as_millis() as u64;

    match result {
        Ok(receipt) => {
            info!(
                event_id = %event.id,
                trace_id = %event.trace_id,
                route = %route.name,
                target = %route.then.actor,
                duration_ms,
                "delivery succeeded"
            );
            loggers
                .log(
                    LogRecord::new(module, LogLevel::Info, "deliver.success", "delivery succeeded")
                        .with_field("event_id", event.id.to_string())
                        .with_field("trace_id", event.trace_id.to_string())
                        .with_field("route", route.name.clone())
                        .with_field("target", route.then.actor.clone())
                        .with_field("duration_ms", duration_ms as i64),
                )
                .await;
            DeliveryOutcome {
                receipt: Some(receipt),
                error: None,
                duration_ms,
            }
        }
        Err(e) => {
            let message = e.to_string();
            warn!(
                event_id = %event.id,
                trace_id = %event.trace_id,
                route = %route.name,
                target = %route.then.actor,
                duration_ms,
                error = %message,
                "delivery failed"
            );
            loggers
                .log(
                    LogRecord::new(module, LogLevel::Error, "deliver.failure", "delivery failed")
                        .with_field("event_id", event.id.to_string())
                        .with_field("trace_id", event.trace_id.to_string())
                        .with_field("route", route.name.clone())
                        .with_field("target", route.then.actor.clone())
                        .with_field("duration_ms", duration_ms as i64)
                        .with_field("error", message.clone()),
                )
                .await;
            DeliveryOutcome {
                receipt: None,
                error: Some(message),
                duration_ms,
            }
        }
    }
}

#[cfg(test)]
#[path = "delivery_tests.rs"]
mod tests;
