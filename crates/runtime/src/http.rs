// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! HTTP surface: webhook ingestion and the control API. Both
//! are loopback-only; the caller is responsible for binding the listener to
//! `127.0.0.1` (see `orgloopd`'s main).
//!
//! Concrete source connectors never expose their own webhook handler, so
//! ingestion here is generic: the body decodes directly into one or more
//! [`RawEvent`]s and is injected into whichever loaded module declares that
//! source id.

use crate::metrics::Metrics;
use crate::runtime::{ModuleStatus, Runtime, RuntimeStatus};
use axum::extract::{Path, State};
use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use axum::routing::{get, post};
use axum::{Json, Router};
use orgloop_core::{Event, ModuleConfig, RawEvent};
use orgloop_module::ModuleResources;
use serde::Deserialize;
use serde_json::json;
use std::sync::Arc;

/// Build the full router: webhook ingestion plus the control API.
pub fn router(runtime: Runtime) -> Router {
    Router::new()
        .route("/webhook/:source_id", post(webhook))
        .route("/control/status", get(control_status))
        .route("/control/module/list", get(control_module_list))
        .route("/control/module/status/:name", get(control_module_status))
        .route("/control/module/load", post(control_module_load))
        .route("/control/module/unload", post(control_module_unload))
        .route("/control/module/reload", post(control_module_reload))
        .route("/control/shutdown", post(control_shutdown))
        .with_state(runtime)
}

/// Build the metrics-only router, served on its own loopback port
/// (`ORGLOOP_METRICS_PORT`) so it can be scraped independently of the
/// webhook/control surface.
pub fn metrics_router(metrics: Arc<Metrics>) -> Router {
    Router::new().route("/metrics", get(metrics_endpoint)).with_state(metrics)
}

async fn metrics_endpoint(State(metrics): State<Arc<Metrics>>) -> Response {
    match metrics.render() {
        Ok(body) => (StatusCode::OK, body).into_response(),
        Err(e) => (StatusCode::INTERNAL_SERVER_ERROR, e.to_string()).into_response(),
    }
}

fn find_module_for_source(runtime: &Runtime, source_id: &str) -> Option<String> {
    runtime
        .status()
        .modules
        .into_iter()
        .find(|m| m.sources.iter().any(|s| s.source_id == source_id))
        .map(|m| m.name)
}

async fn webhook(
    State(runtime): State<Runtime>,
    Path(source_id): Path<String>,
    body: axum::body::Bytes,
) -> Response {
    let Some(module) = find_module_for_source(&runtime, &source_id) else {
        return (StatusCode::NOT_FOUND, format!("unknown source {source_id}")).into_response();
    };

    let raw_events: Vec<RawEvent> = match serde_json::from_slice::<Vec<RawEvent>>(&body) {
        Ok(events) => events,
        Err(_) => match serde_json::from_slice::<RawEvent>(&body) {
            Ok(event) => vec![event],
            Err(e) => {
                return (StatusCode::INTERNAL_SERVER_ERROR, format!("malformed webhook body: {e}")).into_response();
            }
        },
    };

    for raw in raw_events {
        runtime.inject(Event::from_raw(raw), Some(module.as_str())).await;
    }
    StatusCode::OK.into_response()
}

async fn control_status(State(runtime): State<Runtime>) -> Json<RuntimeStatus> {
    Json(runtime.status())
}

async fn control_module_list(State(runtime): State<Runtime>) -> Json<Vec<ModuleStatus>> {
    Json(runtime.status().modules)
}

async fn control_module_status(State(runtime): State<Runtime>, Path(name): Path<String>) -> Response {
    match runtime.module_status_by_name(&name) {
        Some(status) => Json(status).into_response(),
        None => (StatusCode::NOT_FOUND, format!("module {name} not found")).into_response(),
    }
}

/// Body shape for `POST /control/module/load`. Concrete connector/actor/
/// transform/logger instantiation from declarative config is out of scope
/// here; the resources a module needs must already be resolved by
/// the library caller via [`Runtime::load_module`] directly. This endpoint
/// only supports modules whose sources/actors/transforms/loggers are all
/// pre-registered with no resources of their own (e.g. route-only
/// reconfiguration), and is primarily exercised through that library path
/// in tests.
#[derive(Debug, Deserialize)]
struct LoadModuleRequest {
    #[serde(flatten)]
    config: ModuleConfig,
}

async fn control_module_load(State(runtime): State<Runtime>, Json(req): Json<LoadModuleRequest>) -> Response {
    match runtime.load_module(req.config, ModuleResources::default()).await {
        Ok(status) => Json(status).into_response(),
        Err(e) => (StatusCode::INTERNAL_SERVER_ERROR, e.to_string()).into_response(),
    }
}

#[derive(Debug, Deserialize)]
struct ModuleNameRequest {
    name: String,
}

async fn control_module_unload(State(runtime): State<Runtime>, Json(req): Json<ModuleNameRequest>) -> Response {
    match runtime.unload_module(&req.name).await {
        Ok(()) => StatusCode::OK.into_response(),
        Err(e) => (StatusCode::INTERNAL_SERVER_ERROR, e.to_string()).into_response(),
    }
}

async fn control_module_reload(State(runtime): State<Runtime>, Json(req): Json<ModuleNameRequest>) -> Response {
    match runtime.reload_module(&req.name).await {
        Ok(status) => Json(status).into_response(),
        Err(e) => (StatusCode::INTERNAL_SERVER_ERROR, e.to_string()).into_response(),
    }
}

async fn control_shutdown(State(runtime): State<Runtime>) -> Json<serde_json::Value> {
    tokio::spawn(async move {
        runtime.request_stop();
    });
    Json(json!({ "ok": true }))
}

#[cfg(test)]
#[path = "http_tests.rs"]
mod tests;
