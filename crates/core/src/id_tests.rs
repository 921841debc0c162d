// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

use super::*;

#[test]
fn new_adds_missing_prefix() {
    let id = EventId::new("abc123");
    assert_eq!(id.as_str(), "evt_abc123");
}

#[test]
fn new_is_idempotent_on_already_prefixed_string() {
    let id = EventId::new("evt_abc123");
    assert_eq!(id.as_str(), "evt_abc123");
}

#[test]
fn generate_uses_prefix() {
    let id = TraceId::generate();
    assert!(id.as_str().starts_with("trc_"));
}

#[test]
fn display_matches_as_str() {
    let id = EventId::new("x");
    assert_eq!(format!("{id}"), id.as_str());
}

#[test]
fn distinct_generated_ids_differ() {
    assert_ne!(EventId::generate(), EventId::generate());
}
