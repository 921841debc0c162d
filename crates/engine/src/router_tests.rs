// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

use super::*;
use orgloop_core::{EventType, Provenance, RouteThen, RouteWhen, RouteWith};
use serde_json::json;
use std::collections::HashMap;

fn event(source: &str, payload: serde_json::Value) -> Event {
    Event::new(
        source,
        EventType::ResourceChanged,
        Provenance {
            platform: source.to_string(),
            platform_event: "issues".to_string(),
            author: "octocat".to_string(),
            author_type: "user".to_string(),
            extra: Default::default(),
        },
        payload,
    )
}

fn route(name: &str, source: &str, filter: HashMap<String, serde_json::Value>) -> RouteConfig {
    RouteConfig {
        name: name.to_string(),
        when: RouteWhen {
            source: source.to_string(),
            events: vec!["resource.changed".to_string()],
            filter,
        },
        transforms: Vec::new(),
        then: RouteThen {
            actor: "slack".to_string(),
            config: Default::default(),
        },
        with: RouteWith::default(),
    }
}

#[test]
fn matches_on_source_and_event_type() {
    let routes = vec![route("r1", "github", HashMap::new())];
    let matched = matching_routes(&routes, &event("github", json!({})));
    assert_eq!(matched.len(), 1);
    assert_eq!(matched[0].name, "r1");
}

#[test]
fn does_not_match_a_different_source() {
    let routes = vec![route("r1", "github", HashMap::new())];
    let matched = matching_routes(&routes, &event("jira", json!({})));
    assert!(matched.is_empty());
}

#[test]
fn filter_matches_nested_dot_path_value() {
    let mut filter = HashMap::new();
    filter.insert("issue.state".to_string(), json!("open"));
    let routes = vec![route("r1", "github", filter)];

    let matched = matching_routes(&routes, &event("github", json!({ "issue": { "state": "open" } })));
    assert_eq!(matched.len(), 1);

    let unmatched = matching_routes(&routes, &event("github", json!({ "issue": { "state": "closed" } })));
    assert!(unmatched.is_empty());
}

#[test]
fn missing_filter_key_never_matches_even_against_null() {
    let mut filter = HashMap::new();
    filter.insert("issue.state".to_string(), json!(null));
    let routes = vec![route("r1", "github", filter)];

    let matched = matching_routes(&routes, &event("github", json!({ "issue": {} })));
    assert!(matched.is_empty());
}

#[test]
fn an_event_can_match_more_than_one_route() {
    let routes = vec![
        route("r1", "github", HashMap::new()),
        route("r2", "github", HashMap::new()),
    ];
    let matched = matching_routes(&routes, &event("github", json!({})));
    assert_eq!(matched.len(), 2);
}
