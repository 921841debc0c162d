// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

use super::*;

#[test]
fn fresh_registry_renders_all_metric_families() {
    let metrics = Metrics::new().unwrap();
    let rendered = metrics.render().unwrap();

    assert!(rendered.contains("orgloop_uptime_seconds 0"));
    assert!(rendered.contains("orgloop_connected_sources 0"));
}

#[test]
fn events_routed_are_labeled_by_route_and_connector() {
    let metrics = Metrics::new().unwrap();
    metrics.record_event_routed("r1", "slack");
    metrics.record_event_routed("r1", "slack");
    metrics.record_event_routed("r2", "github-comment");

    let rendered = metrics.render().unwrap();
    assert!(rendered.contains(r#"orgloop_events_routed_total{connector="slack",route="r1"} 2"#));
    assert!(rendered.contains(r#"orgloop_events_routed_total{connector="github-comment",route="r2"} 1"#));
}

#[test]
fn connector_errors_are_labeled_by_connector() {
    let metrics = Metrics::new().unwrap();
    metrics.record_connector_error("github");
    metrics.record_connector_error("github");
    metrics.record_connector_error("slack");

    let rendered = metrics.render().unwrap();
    assert!(rendered.contains(r#"orgloop_connector_errors_total{connector="github"} 2"#));
    assert!(rendered.contains(r#"orgloop_connector_errors_total{connector="slack"} 1"#));
}

#[test]
fn processing_duration_is_observed_per_route() {
    let metrics = Metrics::new().unwrap();
    metrics.observe_event_processing("r1", Duration::from_millis(250));

    let rendered = metrics.render().unwrap();
    assert!(rendered.contains(r#"orgloop_event_processing_seconds_count{route="r1"} 1"#));
}

#[test]
fn uptime_and_connected_sources_gauges_update() {
    let metrics = Metrics::new().unwrap();
    metrics.set_uptime(Duration::from_secs(42));
    metrics.set_connected_sources(3);

    let rendered = metrics.render().unwrap();
    assert!(rendered.contains("orgloop_uptime_seconds 42"));
    assert!(rendered.contains("orgloop_connected_sources 3"));
}
