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
        json!({ "n": 1 }),
    )
}

#[tokio::test]
async fn identity_passes_event_through_unchanged() {
    let fake = FakePackageTransform::identity();
    let event = sample_event();
    let out = fake.apply(event.clone(), &Map::new()).await.unwrap().unwrap();
    assert_eq!(out.id, event.id);
    assert_eq!(out.payload, event.payload);
}

#[tokio::test]
async fn always_drops_returns_none() {
    let fake = FakePackageTransform::always_drops();
    let out = fake.apply(sample_event(), &Map::new()).await.unwrap();
    assert!(out.is_none());
}

#[tokio::test]
async fn records_every_config_seen() {
    let fake = FakePackageTransform::identity();
    let mut config = Map::new();
    config.insert("key".to_string(), json!("value"));

    fake.apply(sample_event(), &config).await.unwrap();
    fake.apply(sample_event(), &config).await.unwrap();

    assert_eq!(fake.configs_seen().len(), 2);
}

#[tokio::test]
async fn always_fails_returns_configured_error() {
    let fake = FakePackageTransform::always_fails("redact", "boom");
    let result = fake.apply(sample_event(), &Map::new()).await;
    assert!(matches!(result, Err(TransformError::Failed { .. })));
}
