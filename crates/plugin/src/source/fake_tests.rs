// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

use super::*;
use orgloop_core::{EventType, Provenance};
use serde_json::json;

fn raw_event() -> RawEvent {
    RawEvent {
        source: "github".to_string(),
        event_type: EventType::ResourceChanged,
        provenance: Provenance {
            platform: "github".to_string(),
            platform_event: "issues".to_string(),
            author: "octocat".to_string(),
            author_type: "user".to_string(),
            extra: Default::default(),
        },
        payload: json!({}),
        trace_id: None,
    }
}

#[tokio::test]
async fn records_init_poll_and_shutdown_calls() {
    let fake = FakeSourceConnector::new();
    fake.init(&Map::new()).await.unwrap();
    fake.poll(None).await.unwrap();
    fake.shutdown().await.unwrap();

    let calls = fake.calls();
    assert_eq!(calls.len(), 3);
    assert!(matches!(calls[0], SourceCall::Init(_)));
    assert!(matches!(calls[1], SourceCall::Poll(None)));
    assert!(matches!(calls[2], SourceCall::Shutdown));
}

#[tokio::test]
async fn returns_pushed_responses_in_order_then_empty() {
    let fake = FakeSourceConnector::new();
    fake.push_events(vec![raw_event()], Some(json!({ "page": 2 })));

    let first = fake.poll(None).await.unwrap();
    assert_eq!(first.events.len(), 1);
    assert_eq!(first.next_cursor, Some(json!({ "page": 2 })));

    let second = fake.poll(first.next_cursor).await.unwrap();
    assert!(second.events.is_empty());
}

#[tokio::test]
async fn pushed_error_surfaces_from_poll() {
    let fake = FakeSourceConnector::new();
    fake.push_error(SourceError::PollFailed {
        source_id: "github".to_string(),
        message: "rate limited".to_string(),
    });
    let result = fake.poll(None).await;
    assert!(result.is_err());
}
