// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! The `Event` record — immutable once emitted.

use crate::id::{EventId, TraceId};
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use serde_json::Value;
use std::collections::HashMap;

/// Fixed set of event types a source may emit.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum EventType {
    #[serde(rename = "resource.changed")]
    ResourceChanged,
    #[serde(rename = "actor.stopped")]
    ActorStopped,
    #[serde(rename = "message.received")]
    MessageReceived,
}

impl std::fmt::Display for EventType {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let s = match self {
            EventType::ResourceChanged => "resource.changed",
            EventType::ActorStopped => "actor.stopped",
            EventType::MessageReceived => "message.received",
        };
        write!(f, "{s}")
    }
}

/// Structured origin metadata for an event.
///
/// `platform`, `platform_event`, `author`, and `author_type` are the
/// required fields; connectors may stash additional fields in `extra`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Provenance {
    pub platform: String,
    pub platform_event: String,
    pub author: String,
    pub author_type: String,
    #[serde(flatten)]
    pub extra: HashMap<String, Value>,
}

/// An event as handed back by a connector's `poll`/`webhook`, before ingress
/// has assigned an id or (possibly) a trace id.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RawEvent {
    pub source: String,
    #[serde(rename = "type")]
    pub event_type: EventType,
    pub provenance: Provenance,
    pub payload: Value,
    #[serde(default)]
    pub trace_id: Option<TraceId>,
}

/// An event flowing through the bus, router, transform pipeline, and
/// delivery stage. Immutable once emitted — transforms produce a *new*
/// `Event` rather than mutating one in place.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Event {
    pub id: EventId,
    pub trace_id: TraceId,
    pub timestamp: DateTime<Utc>,
    pub source: String,
    #[serde(rename = "type")]
    pub event_type: EventType,
    pub provenance: Provenance,
    pub payload: Value,
}

impl Event {
    /// Build a fresh event, assigning a new id and trace id.
    pub fn new(
        source: impl Into<String>,
        event_type: EventType,
        provenance: Provenance,
        payload: Value,
    ) -> Self {
        Self::from_raw(
            RawEvent {
                source: source.into(),
                event_type,
                provenance,
                payload,
                trace_id: None,
            },
        )
    }

    /// Promote a connector-produced [`RawEvent`] into a fully-formed event,
    /// assigning an id always and a trace id only if the connector didn't
    /// already supply one.
    pub fn from_raw(raw: RawEvent) -> Self {
        Self {
            id: EventId::generate(),
            trace_id: raw.trace_id.unwrap_or_else(TraceId::generate),
            timestamp: Utc::now(),
            source: raw.source,
            event_type: raw.event_type,
            provenance: raw.provenance,
            payload: raw.payload,
        }
    }

    /// Look up a value at a dot-path inside `payload`, e.g. `"a.b.c"`.
    ///
    /// A missing segment anywhere along the path yields `None` — a missing
    /// key is never treated as equal to a present `null`.
    pub fn payload_at(&self, dot_path: &str) -> Option<&Value> {
        dot_path_get(&self.payload, dot_path)
    }
}

/// Walk a dot-path (`"a.b.c"`) through nested JSON objects.
///
/// A missing segment, or a non-object encountered mid-path, yields `None`.
/// An empty path returns the root value.
pub fn dot_path_get<'a>(root: &'a Value, dot_path: &str) -> Option<&'a Value> {
    if dot_path.is_empty() {
        return Some(root);
    }
    let mut current = root;
    for segment in dot_path.split('.') {
        current = current.as_object()?.get(segment)?;
    }
    Some(current)
}

#[cfg(test)]
#[path = "event_tests.rs"]
mod tests;
