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
async fn records_delivery_calls_with_prompt() {
    let fake = FakeActorConnector::new();
    let event = sample_event();
    fake.deliver(&event, &Map::new(), Some("hello")).await.unwrap();

    let calls = fake.calls();
    assert_eq!(calls.len(), 1);
    assert_eq!(calls[0].prompt.as_deref(), Some("hello"));
    assert_eq!(calls[0].event.id, event.id);
}

#[tokio::test]
async fn fail_next_delivery_surfaces_once_then_recovers() {
    let fake = FakeActorConnector::new();
    fake.fail_next_delivery(ActorError::DeliveryFailed {
        actor_id: "slack".to_string(),
        message: "timeout".to_string(),
    });

    let event = sample_event();
    assert!(fake.deliver(&event, &Map::new(), None).await.is_err());
    assert!(fake.deliver(&event, &Map::new(), None).await.is_ok());
}
