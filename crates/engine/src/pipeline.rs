// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! Transform pipeline.
//!
//! Runs a route's ordered list of transform references over an event.
//! `package` transforms are in-process plugins looked up by name; `script`
//! transforms run as a subprocess that receives the event as JSON on stdin
//! and must print the transformed event as JSON on stdout. Each step's
//! `on_error` policy decides what happens when it fails: `pass` keeps the
//! pre-transform event and continues, `drop` ends the route silently,
//! `halt` ends the route and is logged as a failure.

use crate::logger_manager::LoggerManager;
use orgloop_core::{Event, OnError, RouteConfig, TransformConfig, TransformKind};
use orgloop_plugin::{LogLevel, LogRecord, PackageTransform, TransformError};
use std::collections::HashMap;
use std::process::Stdio;
use std::sync::Arc;
use std::time::{Duration, Instant};
use tokio::io::AsyncWriteExt;
use tokio::process::Command;

const DEFAULT_TRANSFORM_TIMEOUT: Duration = Duration::from_secs(30);

/// What a route should do after the pipeline finishes.
#[derive(Debug)]
pub enum PipelineOutcome {
    /// Every step either succeeded or passed through; deliver this event.
    Continue(Event),
    /// A step unconditionally dropped the event (`execute` returned `null`,
    /// a script exited 1, or exited 0 with empty stdout); the route ends
    /// here quietly, regardless of that step's `on_error` policy.
    Dropped { transform: String },
    /// A step errored and its `on_error` policy was `drop`; the route ends
    /// here quietly.
    ErrorDropped { transform: String, error: String },
    /// A step errored with `on_error: halt`; the route ends here and the
    /// failure should be logged.
    Halted { transform: String, error: String },
    /// The route referenced a transform name that isn't declared.
    UnknownTransform { transform_ref: String },
}

/// Looks up `package` transforms by name and executes both transform kinds.
#[derive(Clone, Default)]
pub struct TransformRunner {
    registry: HashMap<String, Arc<dyn PackageTransform>>,
}

impl TransformRunner {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn register(&mut self, package: impl Into<String>, transform: Arc<dyn PackageTransform>) {
        self.registry.insert(package.into(), transform);
    }

    /// Run `route`'s transform chain over `event`, using `transforms` to
    /// resolve each step's name to its declaration. Logs `transform.start`
    /// and the terminal phase for every step through `loggers`.
    pub async fn run(
        &self,
        mut event: Event,
        route: &RouteConfig,
        transforms: &HashMap<String, TransformConfig>,
        loggers: &LoggerManager,
        module: &str,
    ) -> PipelineOutcome {
        for step in &route.transforms {
            let Some(config) = transforms.get(&step.transform_ref) else {
                return PipelineOutcome::UnknownTransform {
                    transform_ref: step.transform_ref.clone(),
                };
            };
            let on_error = step.on_error.unwrap_or(config.on_error);

            loggers
                .log(
                    LogRecord::new(module, LogLevel::Debug, "transform.start", "transform started")
                        .with_field("transform", config.name.clone())
                        .with_field("route", route.name.clone()),
                )
                .await;

            let started = Instant::now();
            match self.execute_one(event.clone(), config, &route.name, &route.then.actor).await {
                Ok(Some(next)) => {
                    let duration_ms = started.elapsed().as_millis() as i64;
                    loggers
                        .log(
                            LogRecord::new(module, LogLevel::Info, "transform.pass", "transform passed")
                                .with_field("transform", config.name.clone())
                                .with_field("route", route.name.clone())
                                .with_field("duration_ms", duration_ms),
                        )
                        .await;
                    event = next;
                }
                Ok(None) => {
                    loggers
                        .log(
                            LogRecord::new(module, LogLevel::Info, "transform.drop", "transform dropped event")
                                .with_field("transform", config.name.clone())
                                .with_field("route", route.name.clone()),
                        )
                        .await;
                    return PipelineOutcome::Dropped {
                        transform: config.name.clone(),
                    };
                }
                Err(error) => match on_error {
                    OnError::Pass => {
                        loggers
                            .log(
                                LogRecord::new(module, LogLevel::Warn, "transform.error", "transform failed, passing event through unchanged")
                                    .with_field("transform", config.name.clone())
                                    .with_field("route", route.name.clone())
                                    .with_field("error", error.to_string()),
                            )
                            .await;
                    }
                    OnError::Drop => {
                        loggers
                            .log(
                                LogRecord::new(module, LogLevel::Warn, "transform.error_drop", "transform errored, dropping route")
                                    .with_field("transform", config.name.clone())
                                    .with_field("route", route.name.clone())
                                    .with_field("error", error.to_string()),
                            )
                            .await;
                        return PipelineOutcome::ErrorDropped {
                            transform: config.name.clone(),
                            error: error.to_string(),
                        };
                    }
                    OnError::Halt => {
                        loggers
                            .log(
                                LogRecord::new(module, LogLevel::Error, "transform.error_halt", "transform errored, halting route")
                                    .with_field("transform", config.name.clone())
                                    .with_field("route", route.name.clone())
                                    .with_field("error", error.to_string()),
                            )
                            .await;
                        return PipelineOutcome::Halted {
                            transform: config.name.clone(),
                            error: error.to_string(),
                        };
                    }
                },
            }
        }
        PipelineOutcome::Continue(event)
    }

    async fn execute_one(
        &self,
        event: Event,
        config: &TransformConfig,
        route_name: &str,
        actor_id: &str,
    ) -> Result<Option<Event>, TransformError> {
        let timeout = config
            .timeout_ms
            .map(Duration::from_millis)
            .unwrap_or(DEFAULT_TRANSFORM_TIMEOUT);

        match &config.kind {
            TransformKind::Package { package, config: transform_config } => {
                let transform = self.registry.get(package).ok_or_else(|| TransformError::Failed {
                    transform_id: config.name.clone(),
                    message: format!("no package transform registered for {package:?}"),
                })?;
                tokio::time::timeout(timeout, transform.apply(event, transform_config))
                    .await
                    .map_err(|_| TransformError::Failed {
                        transform_id: config.name.clone(),
                        message: "timed out".to_string(),
                    })?
            }
            TransformKind::Script { script } => {
                run_script_transform(event, script, &config.name, route_name, actor_id, timeout).await
            }
        }
    }
}

/// Run a `script` transform as a subprocess. Exit 0 with non-empty stdout
/// parses as the new event; exit 0 with empty stdout and exit 1 are both
/// unconditional drops (`Ok(None)`) regardless of the step's `on_error`
/// policy. Exit codes of 2 or higher, a timeout, or malformed stdout JSON
/// are errors subject to `on_error`.
async fn run_script_transform(
    event: Event,
    script: &std::path::Path,
    transform_id: &str,
    route_name: &str,
    actor_id: &str,
    timeout: Duration,
) -> Result<Option<Event>, TransformError> {
    let input = serde_json::to_vec(&event).map_err(|e| TransformError::Failed {
        transform_id: transform_id.to_string(),
        message: format!("failed to serialize event: {e}"),
    })?;

    let mut child = Command::new(script)
        .env("ORGLOOP_SOURCE", &event.source)
        .env("ORGLOOP_TARGET", actor_id)
        .env("ORGLOOP_EVENT_TYPE", event.event_type.to_string())
        .env("ORGLOOP_EVENT_ID", event.id.as_str())
        .env("ORGLOOP_ROUTE", route_name)
        .stdin(Stdio::piped())
        .stdout(Stdio::piped())
        .stderr(Stdio::piped())
        .spawn()
        .map_err(|e| TransformError::Failed {
            transform_id: transform_id.to_string(),
            message: format!("failed to spawn {}: {e}", script.display()),
        })?;

    if let Some(mut stdin) = child.stdin.take() {
        stdin.write_all(&input).await.map_err(|e| TransformError::Failed {
            transform_id: transform_id.to_string(),
            message: format!("failed to write stdin: {e}"),
        })?;
    }

    let output = tokio::time::timeout(timeout, child.wait_with_output())
        .await
        .map_err(|_| TransformError::Failed {
            transform_id: transform_id.to_string(),
            message: format!("timed out after {}ms", timeout.as_millis()),
        })?
        .map_err(|e| TransformError::Failed {
            transform_id: transform_id.to_string(),
            message: format!("script execution failed: {e}"),
        })?;

    match output.status.code() {
        Some(0) if output.stdout.is_empty() => Ok(None),
        Some(0) => serde_json::from_slice(&output.stdout)
            .map(Some)
            .map_err(|e| TransformError::Failed {
                transform_id: transform_id.to_string(),
                message: format!("script produced invalid event JSON: {e}"),
            }),
        Some(1) => Ok(None),
        _ => {
            let stderr = String::from_utf8_lossy(&output.stderr);
            Err(TransformError::Failed {
                transform_id: transform_id.to_string(),
                message: format!("script exited with {}: {stderr}", output.status),
            })
        }
    }
}

#[cfg(test)]
#[path = "pipeline_tests.rs"]
mod tests;
