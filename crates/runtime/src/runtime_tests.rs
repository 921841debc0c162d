// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

use super::*;
use orgloop_core::{ActorConfig, EventType, Provenance, RawEvent, RouteConfig, RouteThen, RouteWhen, SourceConfig};
use orgloop_plugin::{FakeActorConnector, FakeSourceConnector, SourceError};
use std::collections::HashMap as Map;
use tempfile::TempDir;

fn test_config(data_root: &std::path::Path) -> RuntimeConfig {
    RuntimeConfig {
        data_root: data_root.to_path_buf(),
        port: 4800,
        metrics_port: None,
        heartbeat_enabled: false,
    }
}

fn sample_provenance() -> Provenance {
    Provenance {
        platform: "test".to_string(),
        platform_event: "ping".to_string(),
        author: "tester".to_string(),
        author_type: "human".to_string(),
        extra: Map::new(),
    }
}

fn module_config(name: &str, source_id: &str, actor_id: &str) -> ModuleConfig {
    ModuleConfig {
        name: name.to_string(),
        sources: vec![SourceConfig {
            id: source_id.to_string(),
            connector: "fake".to_string(),
            config: Default::default(),
            poll: None,
            emits: vec![],
        }],
        actors: vec![ActorConfig {
            id: actor_id.to_string(),
            connector: "fake".to_string(),
            config: Default::default(),
        }],
        routes: vec![RouteConfig {
            name: "route-1".to_string(),
            when: RouteWhen {
                source: source_id.to_string(),
                events: vec!["resource.changed".to_string()],
                filter: Default::default(),
            },
            transforms: vec![],
            then: RouteThen {
                actor: actor_id.to_string(),
                config: Default::default(),
            },
            with: Default::default(),
        }],
        transforms: vec![],
        loggers: vec![],
        defaults: Default::default(),
    }
}

#[tokio::test]
async fn load_module_activates_and_registers() {
    let dir = TempDir::new().unwrap();
    let runtime = Runtime::new(test_config(dir.path())).unwrap();
    let config = module_config("mod-a", "src-1", "actor-1");
    let mut resources = ModuleResources::default();
    resources.sources.insert("src-1".to_string(), Arc::new(FakeSourceConnector::new()));
    resources.actors.insert("actor-1".to_string(), Arc::new(FakeActorConnector::new()));

    let status = runtime.load_module(config, resources).await.unwrap();
    assert_eq!(status.name, "mod-a");
    assert_eq!(status.state, "active");
    assert!(runtime.module_status_by_name("mod-a").is_some());
}

#[tokio::test]
async fn loading_duplicate_module_name_fails() {
    let dir = TempDir::new().unwrap();
    let runtime = Runtime::new(test_config(dir.path())).unwrap();
    let config = module_config("mod-a", "src-1", "actor-1");
    let mut resources = ModuleResources::default();
    resources.sources.insert("src-1".to_string(), Arc::new(FakeSourceConnector::new()));
    resources.actors.insert("actor-1".to_string(), Arc::new(FakeActorConnector::new()));
    runtime.load_module(config.clone(), resources.clone()).await.unwrap();

    let err = runtime.load_module(config, resources).await.unwrap_err();
    assert!(matches!(err, RuntimeError::Core(OrgLoopError::ModuleConflict { .. })));
}

#[tokio::test]
async fn process_event_delivers_to_matching_route() {
    let dir = TempDir::new().unwrap();
    let runtime = Runtime::new(test_config(dir.path())).unwrap();
    let config = module_config("mod-a", "src-1", "actor-1");
    let actor = Arc::new(FakeActorConnector::new());
    let mut resources = ModuleResources::default();
    resources.sources.insert("src-1".to_string(), Arc::new(FakeSourceConnector::new()));
    resources.actors.insert("actor-1".to_string(), Arc::clone(&actor) as Arc<dyn orgloop_plugin::ActorConnector>);
    runtime.load_module(config, resources).await.unwrap();

    let event = Event::new("src-1", EventType::ResourceChanged, sample_provenance(), serde_json::json!({}));
    runtime.process_event(event, "mod-a").await;

    assert_eq!(actor.calls().len(), 1);
}

#[tokio::test]
async fn process_event_with_no_matching_route_does_not_deliver() {
    let dir = TempDir::new().unwrap();
    let runtime = Runtime::new(test_config(dir.path())).unwrap();
    let config = module_config("mod-a", "src-1", "actor-1");
    let actor = Arc::new(FakeActorConnector::new());
    let mut resources = ModuleResources::default();
    resources.sources.insert("src-1".to_string(), Arc::new(FakeSourceConnector::new()));
    resources.actors.insert("actor-1".to_string(), Arc::clone(&actor) as Arc<dyn orgloop_plugin::ActorConnector>);
    runtime.load_module(config, resources).await.unwrap();

    let event = Event::new("other-source", EventType::ResourceChanged, sample_provenance(), serde_json::json!({}));
    runtime.process_event(event, "mod-a").await;

    assert!(actor.calls().is_empty());
}

#[tokio::test]
async fn poll_source_promotes_events_to_delivery() {
    let dir = TempDir::new().unwrap();
    let runtime = Runtime::new(test_config(dir.path())).unwrap();
    let config = module_config("mod-a", "src-1", "actor-1");
    let source = Arc::new(FakeSourceConnector::new());
    let actor = Arc::new(FakeActorConnector::new());
    source.push_events(
        vec![RawEvent {
            source: "src-1".to_string(),
            event_type: EventType::ResourceChanged,
            provenance: sample_provenance(),
            payload: serde_json::json!({}),
            trace_id: None,
        }],
        None,
    );
    let mut resources = ModuleResources::default();
    resources.sources.insert("src-1".to_string(), Arc::clone(&source) as Arc<dyn orgloop_plugin::SourceConnector>);
    resources.actors.insert("actor-1".to_string(), Arc::clone(&actor) as Arc<dyn orgloop_plugin::ActorConnector>);
    runtime.load_module(config, resources).await.unwrap();

    runtime.poll_source("mod-a", "src-1").await;

    assert_eq!(actor.calls().len(), 1);
    let status = runtime.module_status_by_name("mod-a").unwrap();
    assert_eq!(status.sources[0].consecutive_errors, 0);
}

#[tokio::test]
async fn repeated_poll_failures_open_the_circuit() {
    let dir = TempDir::new().unwrap();
    let runtime = Runtime::new(test_config(dir.path())).unwrap();
    let config = module_config("mod-a", "src-1", "actor-1");
    let source = Arc::new(FakeSourceConnector::new());
    for _ in 0..5 {
        source.push_error(SourceError::PollFailed {
            source_id: "src-1".to_string(),
            message: "boom".to_string(),
        });
    }
    let mut resources = ModuleResources::default();
    resources.sources.insert("src-1".to_string(), Arc::clone(&source) as Arc<dyn orgloop_plugin::SourceConnector>);
    resources.actors.insert("actor-1".to_string(), Arc::new(FakeActorConnector::new()));
    runtime.load_module(config, resources).await.unwrap();

    for _ in 0..5 {
        runtime.poll_source("mod-a", "src-1").await;
    }

    let status = runtime.module_status_by_name("mod-a").unwrap();
    assert!(status.sources[0].circuit_open);

    // a sixth tick should be suppressed by the open circuit: no extra poll call recorded.
    let calls_before = source.calls().len();
    runtime.poll_source("mod-a", "src-1").await;
    assert_eq!(source.calls().len(), calls_before);
}

#[tokio::test]
async fn unload_module_tears_down_and_unregisters() {
    let dir = TempDir::new().unwrap();
    let runtime = Runtime::new(test_config(dir.path())).unwrap();
    let config = module_config("mod-a", "src-1", "actor-1");
    let mut resources = ModuleResources::default();
    resources.sources.insert("src-1".to_string(), Arc::new(FakeSourceConnector::new()));
    resources.actors.insert("actor-1".to_string(), Arc::new(FakeActorConnector::new()));
    runtime.load_module(config, resources).await.unwrap();

    runtime.unload_module("mod-a").await.unwrap();
    assert!(runtime.module_status_by_name("mod-a").is_none());
}

#[tokio::test]
async fn unload_unknown_module_errors() {
    let dir = TempDir::new().unwrap();
    let runtime = Runtime::new(test_config(dir.path())).unwrap();
    let err = runtime.unload_module("nope").await.unwrap_err();
    assert!(matches!(err, RuntimeError::Core(OrgLoopError::ModuleNotFound { .. })));
}

#[tokio::test]
async fn reload_module_restores_it_with_a_fresh_instance() {
    let dir = TempDir::new().unwrap();
    let runtime = Runtime::new(test_config(dir.path())).unwrap();
    let config = module_config("mod-a", "src-1", "actor-1");
    let mut resources = ModuleResources::default();
    resources.sources.insert("src-1".to_string(), Arc::new(FakeSourceConnector::new()));
    resources.actors.insert("actor-1".to_string(), Arc::new(FakeActorConnector::new()));
    runtime.load_module(config, resources).await.unwrap();

    let status = runtime.reload_module("mod-a").await.unwrap();
    assert_eq!(status.state, "active");
}

#[tokio::test]
async fn inject_without_module_name_fans_out_to_every_active_module() {
    let dir = TempDir::new().unwrap();
    let runtime = Runtime::new(test_config(dir.path())).unwrap();

    for n in ["mod-a", "mod-b"] {
        let config = module_config(n, "src-1", "actor-1");
        let actor = Arc::new(FakeActorConnector::new());
        let mut resources = ModuleResources::default();
        resources.sources.insert("src-1".to_string(), Arc::new(FakeSourceConnector::new()));
        resources.actors.insert("actor-1".to_string(), actor as Arc<dyn orgloop_plugin::ActorConnector>);
        runtime.load_module(config, resources).await.unwrap();
    }

    let event = Event::new("src-1", EventType::ResourceChanged, sample_provenance(), serde_json::json!({}));
    runtime.inject(event, None).await;
}

#[tokio::test]
async fn stop_deactivates_every_module() {
    let dir = TempDir::new().unwrap();
    let runtime = Runtime::new(test_config(dir.path())).unwrap();
    let config = module_config("mod-a", "src-1", "actor-1");
    let mut resources = ModuleResources::default();
    resources.sources.insert("src-1".to_string(), Arc::new(FakeSourceConnector::new()));
    resources.actors.insert("actor-1".to_string(), Arc::new(FakeActorConnector::new()));
    runtime.load_module(config, resources).await.unwrap();

    runtime.stop().await;
    assert!(runtime.module_status_by_name("mod-a").is_none());
}

#[tokio::test]
async fn process_event_acks_the_wal_entry_it_publishes() {
    let dir = TempDir::new().unwrap();
    let runtime = Runtime::new(test_config(dir.path())).unwrap();
    let config = module_config("mod-a", "src-1", "actor-1");
    let mut resources = ModuleResources::default();
    resources.sources.insert("src-1".to_string(), Arc::new(FakeSourceConnector::new()));
    resources.actors.insert("actor-1".to_string(), Arc::new(FakeActorConnector::new()));
    runtime.load_module(config, resources).await.unwrap();

    let event = Event::new("src-1", EventType::ResourceChanged, sample_provenance(), serde_json::json!({}));
    runtime.process_event(event, "mod-a").await;

    assert_eq!(runtime.bus.wal().lock().unacked_seq(), 1);
}

#[tokio::test]
async fn stop_only_truncates_entries_that_were_actually_acked() {
    let dir = TempDir::new().unwrap();
    let runtime = Runtime::new(test_config(dir.path())).unwrap();

    // Publish directly without routing it through process_event, so it's
    // never acked.
    runtime.bus.publish(Event::new("src-1", EventType::ResourceChanged, sample_provenance(), serde_json::json!({}))).unwrap();

    runtime.stop().await;
    assert_eq!(runtime.bus.wal().lock().unacked_seq(), 0);
    assert_eq!(runtime.bus.wal().lock().unacked().unwrap().len(), 1);
}
