// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! Prometheus text exposition, gated on `ORGLOOP_METRICS_PORT`.
//!
//! A small in-process registry rather than hand-rolled string formatting.

use crate::error::RuntimeError;
use prometheus::{
    Encoder, Gauge, HistogramOpts, HistogramVec, IntCounterVec, IntGauge, Opts, Registry, TextEncoder,
};
use std::time::Duration;

pub struct Metrics {
    registry: Registry,
    events_routed_total: IntCounterVec,
    event_processing_seconds: HistogramVec,
    connector_errors_total: IntCounterVec,
    uptime_seconds: Gauge,
    connected_sources: IntGauge,
}

impl Metrics {
    pub fn new() -> Result<Self, RuntimeError> {
        let registry = Registry::new();

        let events_routed_total = IntCounterVec::new(
            Opts::new("orgloop_events_routed_total", "Events routed to a connector, by route and connector."),
            &["route", "connector"],
        )?;
        let event_processing_seconds = HistogramVec::new(
            HistogramOpts::new(
                "orgloop_event_processing_seconds",
                "Time spent processing an event for one matched route, from route match through delivery.",
            ),
            &["route"],
        )?;
        let connector_errors_total = IntCounterVec::new(
            Opts::new("orgloop_connector_errors_total", "Connector failures (source poll or actor delivery), by connector."),
            &["connector"],
        )?;
        let uptime_seconds = Gauge::with_opts(Opts::new("orgloop_uptime_seconds", "Seconds since the runtime started."))?;
        let connected_sources =
            IntGauge::with_opts(Opts::new("orgloop_connected_sources", "Sources currently registered across active modules."))?;

        registry.register(Box::new(events_routed_total.clone()))?;
        registry.register(Box::new(event_processing_seconds.clone()))?;
        registry.register(Box::new(connector_errors_total.clone()))?;
        registry.register(Box::new(uptime_seconds.clone()))?;
        registry.register(Box::new(connected_sources.clone()))?;

        Ok(Self {
            registry,
            events_routed_total,
            event_processing_seconds,
            connector_errors_total,
            uptime_seconds,
            connected_sources,
        })
    }

    pub fn record_event_routed(&self, route: &str, connector: &str) {
        self.events_routed_total.with_label_values(&[route, connector]).inc();
    }

    pub fn observe_event_processing(&self, route: &str, duration: Duration) {
        self.event_processing_seconds.with_label_values(&[route]).observe(duration.as_secs_f64());
    }

    pub fn record_connector_error(&self, connector: &str) {
        self.connector_errors_total.with_label_values(&[connector]).inc();
    }

    pub fn set_uptime(&self, uptime: Duration) {
        self.uptime_seconds.set(uptime.as_secs_f64());
    }

    pub fn set_connected_sources(&self, count: i64) {
        self.connected_sources.set(count);
    }

    /// Render the registry in Prometheus text exposition format.
    pub fn render(&self) -> Result<String, RuntimeError> {
        let encoder = TextEncoder::new();
        let metric_families = self.registry.gather();
        let mut buf = Vec::new();
        encoder.encode(&metric_families, &mut buf)?;
        Ok(String::from_utf8_lossy(&buf).into_owned())
    }
}

#[cfg(test)]
#[path = "metrics_tests.rs"]
mod tests;
