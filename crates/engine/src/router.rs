// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! Route matching.
//!
//! A route matches an event when its source matches, its event type is in
//! the route's `events` list, and every `filter` entry's dot-path resolves
//! to an equal value in the event's payload. An event may match more than
//! one route; every matched route runs independently.

use orgloop_core::{dot_path_get, Event, RouteConfig};

/// Return every route in `routes` that matches `event`, in declaration
/// order.
pub fn matching_routes<'a>(routes: &'a [RouteConfig], event: &Event) -> Vec<&'a RouteConfig> {
    routes.iter().filter(|route| route_matches(route, event)).collect()
}

fn route_matches(route: &RouteConfig, event: &Event) -> bool {
    if route.when.source != event.source {
        return false;
    }
    let event_type = event.event_type.to_string();
    if !route.when.events.iter().any(|e| e == &event_type) {
        return false;
    }
    route
        .when
        .filter
        .iter()
        .all(|(dot_path, expected)| dot_path_get(&event.payload, dot_path) == Some(expected))
}

#[cfg(test)]
#[path = "router_tests.rs"]
mod tests;
