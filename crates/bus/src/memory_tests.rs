// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

use super::*;
use orgloop_core::{EventType, Provenance};
use serde_json::json;

fn sample_event() -> Event {
    Event::new(
        "github",
        EventType::ResourceChanged,
        Provenance {
            platform: "github".to_string(),
            platform_event: "issues".to_string(),
            author: "octocat".to_string(),
            author_type: "user".to_string(),
            extra: Default::default(),
        },
        json!({}),
    )
}

#[tokio::test]
async fn publish_then_recv_round_trips_the_event() {
    let (bus, mut reader) = MemoryBus::new();
    let event = sample_event();
    bus.publish(event.clone()).unwrap();

    let received = reader.recv().await.unwrap();
    assert_eq!(received.id, event.id);
}

#[tokio::test]
async fn sequence_numbers_increase_monotonically() {
    let (bus, _reader) = MemoryBus::new();
    let first = bus.publish(sample_event()).unwrap();
    let second = bus.publish(sample_event()).unwrap();
    assert!(second > first);
}

#[tokio::test]
async fn recv_returns_none_once_bus_is_dropped() {
    let (bus, mut reader) = MemoryBus::new();
    drop(bus);
    assert!(reader.recv().await.is_none());
}
