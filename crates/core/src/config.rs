// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! Declarative configuration records.
//!
//! These types are the boundary the core consumes: an already-parsed,
//! env-var-substituted configuration record. YAML parsing itself is out of
//! scope; callers hand these structs (or `serde_json::Value`s that
//! deserialize into them) straight to [`crate::OrgLoopError`]-returning
//! validation and to the module host.

use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};
use std::collections::HashMap;
use std::path::PathBuf;

/// What happens when a transform reference errors out.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum OnError {
    /// Fail-open: log and continue with the previous event.
    Pass,
    /// Short-circuit this route only.
    Drop,
    /// Abandon this route; other matched routes are unaffected.
    Halt,
}

impl Default for OnError {
    fn default() -> Self {
        OnError::Pass
    }
}

/// The `when` clause of a route: source, event types, and optional filter.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RouteWhen {
    pub source: String,
    pub events: Vec<String>,
    #[serde(default)]
    pub filter: HashMap<String, Value>,
}

/// One step in a route's transform pipeline.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct TransformRef {
    #[serde(rename = "ref")]
    pub transform_ref: String,
    #[serde(default)]
    pub on_error: Option<OnError>,
}

/// The `then` clause: which actor receives the event and opaque routing hints.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RouteThen {
    pub actor: String,
    #[serde(default)]
    pub config: Map<String, Value>,
}

/// The optional `with` clause: a sidecar prompt file.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct RouteWith {
    #[serde(default)]
    pub prompt_file: Option<PathBuf>,
}

/// A declarative route.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RouteConfig {
    pub name: String,
    pub when: RouteWhen,
    #[serde(default)]
    pub transforms: Vec<TransformRef>,
    pub then: RouteThen,
    #[serde(default)]
    pub with: RouteWith,
}

/// `package` or `script` transform body.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "snake_case", tag = "type")]
pub enum TransformKind {
    Package {
        package: String,
        #[serde(default)]
        config: Map<String, Value>,
    },
    Script {
        script: PathBuf,
    },
}

/// A named, reusable transform definition.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct TransformConfig {
    pub name: String,
    #[serde(flatten)]
    pub kind: TransformKind,
    #[serde(default)]
    pub timeout_ms: Option<u64>,
    #[serde(default)]
    pub on_error: OnError,
}

/// Polling cadence for a source.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PollConfig {
    pub interval: String,
}

/// A source instance.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SourceConfig {
    pub id: String,
    pub connector: String,
    #[serde(default)]
    pub config: Map<String, Value>,
    #[serde(default)]
    pub poll: Option<PollConfig>,
    #[serde(default)]
    pub emits: Vec<String>,
}

/// An actor instance.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ActorConfig {
    pub id: String,
    pub connector: String,
    #[serde(default)]
    pub config: Map<String, Value>,
}

/// A logger sink attached to a module.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct LoggerConfig {
    pub name: String,
    #[serde(rename = "type")]
    pub logger_type: String,
    #[serde(default)]
    pub config: Map<String, Value>,
}

/// Module-wide defaults.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct ModuleDefaults {
    #[serde(default)]
    pub poll_interval: Option<String>,
}

/// A closed bundle of sources/actors/routes/transforms/loggers. The module name is the singleton registry key.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ModuleConfig {
    pub name: String,
    #[serde(default)]
    pub sources: Vec<SourceConfig>,
    #[serde(default)]
    pub actors: Vec<ActorConfig>,
    #[serde(default)]
    pub routes: Vec<RouteConfig>,
    #[serde(default)]
    pub transforms: Vec<TransformConfig>,
    #[serde(default)]
    pub loggers: Vec<LoggerConfig>,
    #[serde(default)]
    pub defaults: ModuleDefaults,
}

#[cfg(test)]
#[path = "config_tests.rs"]
mod tests;
