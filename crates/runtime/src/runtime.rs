// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! The runtime orchestrator.
//!
//! Owns the module registry, the logger fan-out, the per-source scheduler
//! and circuit breakers, and the durable event bus. Polling and webhook
//! ingestion both funnel into [`Runtime::process_event`], which publishes to
//! the bus for durability and then matches, transforms, and delivers inline
//! — there is no separate queue-consumer loop pulling work back off the bus.
//! [`Runtime::run`] only drives the scheduler's 1-second tick and the
//! process's shutdown signals.

use crate::config::RuntimeConfig;
use crate::error::RuntimeError;
use crate::heartbeat;
use crate::metrics::Metrics;
use chrono::Utc;
use orgloop_bus::WalBus;
use orgloop_core::{parse_duration, Clock, CronSchedule, Event, ModuleConfig, OrgLoopError, SystemClock};
use orgloop_engine::{
    deliver, matching_routes, CircuitBreaker, CircuitBreakerConfig, CircuitState, LoggerManager,
    PipelineOutcome, PollSchedule, Scheduler, TransformRunner,
};
use orgloop_module::{ModuleInstance, ModuleRegistry, ModuleResources, ModuleState};
use orgloop_plugin::{LogLevel, LogRecord};
use orgloop_storage::{CheckpointStore, FileCheckpointStore, Wal};
use parking_lot::{Mutex, RwLock};
use serde::Serialize;
use std::collections::HashMap;
use std::sync::Arc;
use std::time::{Duration, Instant};
use tokio::signal::unix::{signal, SignalKind};
use tokio::sync::Notify;
use tracing::{info, warn};

/// Status snapshot for one loaded module, surfaced via the control API.
#[derive(Debug, Clone, Serialize)]
pub struct ModuleStatus {
    pub name: String,
    pub state: String,
    pub activated_at: Option<chrono::DateTime<Utc>>,
    pub sources: Vec<SourceStatus>,
}

#[derive(Debug, Clone, Serialize)]
pub struct SourceStatus {
    pub source_id: String,
    pub status: orgloop_core::HealthStatus,
    pub consecutive_errors: u32,
    pub circuit_open: bool,
    pub last_error: Option<String>,
}

/// Status snapshot for the runtime itself.
#[derive(Debug, Clone, Serialize)]
pub struct RuntimeStatus {
    pub uptime_ms: u128,
    pub modules: Vec<ModuleStatus>,
}

fn breaker_key(module: &str, source_id: &str) -> String {
    format!("{module}\u{0}{source_id}")
}

fn split_key(key: &str) -> Option<(String, String)> {
    let mut parts = key.splitn(2, '\u{0}');
    let module = parts.next()?.to_string();
    let source = parts.next()?.to_string();
    Some((module, source))
}

/// Turn a source's `poll.interval` string into a schedule. Tries a plain
/// duration first (`"30s"`, `"every 5m"`); falls back to a five-field cron
/// expression.
fn poll_schedule_from(interval: &str) -> Result<PollSchedule, OrgLoopError> {
    if let Ok(duration) = parse_duration(interval) {
        return Ok(PollSchedule::Interval(duration));
    }
    CronSchedule::parse(interval)
        .map(PollSchedule::Cron)
        .map_err(|e| OrgLoopError::Config(format!("invalid poll interval {interval:?}: {e}")))
}

/// Single long-lived object owning every loaded module, the scheduler, the
/// circuit breakers, the logger fan-out, and the durable event bus.
#[derive(Clone)]
pub struct Runtime {
    config: RuntimeConfig,
    registry: Arc<ModuleRegistry>,
    bus: WalBus,
    loggers: Arc<LoggerManager>,
    transform_runners: Arc<RwLock<HashMap<String, TransformRunner>>>,
    scheduler: Arc<Mutex<Scheduler>>,
    breakers: Arc<Mutex<HashMap<String, CircuitBreaker>>>,
    saved: Arc<RwLock<HashMap<String, (ModuleConfig, ModuleResources)>>>,
    clock: SystemClock,
    started_at: Arc<RwLock<Option<Instant>>>,
    stop_notify: Arc<Notify>,
    metrics: Arc<Metrics>,
    inflight_polls: Arc<Mutex<Vec<tokio::task::JoinHandle<()>>>>,
}

impl Runtime {
    /// Open the durable event bus at `config.wal_path()` and build an empty
    /// runtime. The WAL's own reader half is dropped: processing is inline
    /// (see module docs), and startup replay is deliberately not implemented
    /// (see `DESIGN.md`).
    pub fn new(config: RuntimeConfig) -> Result<Self, RuntimeError> {
        let wal = Wal::open(&config.wal_path(), 0)?;
        let (bus, _reader) = WalBus::new(wal);
        Ok(Self {
            config,
            registry: Arc::new(ModuleRegistry::new()),
            bus,
            loggers: Arc::new(LoggerManager::new()),
            transform_runners: Arc::new(RwLock::new(HashMap::new())),
            scheduler: Arc::new(Mutex::new(Scheduler::new())),
            breakers: Arc::new(Mutex::new(HashMap::new())),
            saved: Arc::new(RwLock::new(HashMap::new())),
            clock: SystemClock,
            started_at: Arc::new(RwLock::new(None)),
            stop_notify: Arc::new(Notify::new()),
            metrics: Arc::new(Metrics::new()?),
            inflight_polls: Arc::new(Mutex::new(Vec::new())),
        })
    }

    pub fn config(&self) -> &RuntimeConfig {
        &self.config
    }

    pub fn metrics(&self) -> Arc<Metrics> {
        Arc::clone(&self.metrics)
    }

    /// Mark the runtime started, for uptime reporting. Separate from `new`
    /// so tests can build a runtime without starting its clock.
    pub fn mark_started(&self) {
        *self.started_at.write() = Some(Instant::now());
    }

    fn uptime_ms(&self) -> u128 {
        self.started_at
            .read()
            .map(|at| at.elapsed().as_millis())
            .unwrap_or(0)
    }

    /// Refresh the uptime and connected-sources gauges from current state.
    fn refresh_gauges(&self) {
        self.metrics.set_uptime(Duration::from_millis(self.uptime_ms() as u64));
        let connected_sources: i64 = self
            .registry
            .list()
            .iter()
            .filter(|instance| instance.state() == ModuleState::Active)
            .map(|instance| instance.config().sources.len() as i64)
            .sum();
        self.metrics.set_connected_sources(connected_sources);
    }

    pub fn module_status(&self, instance: &ModuleInstance) -> ModuleStatus {
        let state = match instance.state() {
            ModuleState::Loading => "loading",
            ModuleState::Active => "active",
            ModuleState::Unloading => "unloading",
            ModuleState::Removed => "removed",
        };
        let sources = instance
            .config()
            .sources
            .iter()
            .map(|source| {
                let health = instance.health(&source.id).unwrap_or_default();
                SourceStatus {
                    source_id: source.id.clone(),
                    status: health.status,
                    consecutive_errors: health.consecutive_errors,
                    circuit_open: health.circuit_open,
                    last_error: health.last_error,
                }
            })
            .collect();
        ModuleStatus {
            name: instance.name().to_string(),
            state: state.to_string(),
            activated_at: instance.activated_at(),
            sources,
        }
    }

    pub fn status(&self) -> RuntimeStatus {
        RuntimeStatus {
            uptime_ms: self.uptime_ms(),
            modules: self
                .registry
                .list()
                .iter()
                .map(|instance| self.module_status(instance))
                .collect(),
        }
    }

    pub fn module_status_by_name(&self, name: &str) -> Option<ModuleStatus> {
        self.registry.get(name).map(|instance| self.module_status(&instance))
    }

    /// Instantiate, initialize, activate, and register a module; attach its
    /// loggers and transforms; schedule its polled sources. Returns the
    /// module's status snapshot.
    pub async fn load_module(
        &self,
        config: ModuleConfig,
        resources: ModuleResources,
    ) -> Result<ModuleStatus, RuntimeError> {
        let name = config.name.clone();
        let checkpoints: Arc<dyn CheckpointStore> = Arc::new(FileCheckpointStore::new(
            self.config.checkpoints_dir().join(&name),
        ));
        let instance = Arc::new(ModuleInstance::new(config.clone(), resources.clone(), checkpoints));
        instance.initialize().await?;
        instance.activate();
        self.registry.register(Arc::clone(&instance))?;

        for logger_config in &instance.config().loggers {
            if let Some(logger) = resources.loggers.get(&logger_config.name) {
                self.loggers.register(Arc::clone(logger), Some(name.clone()));
            }
        }

        let mut runner = TransformRunner::new();
        for (package, transform) in &resources.transforms {
            runner.register(package.clone(), Arc::clone(transform));
        }
        self.transform_runners.write().insert(name.clone(), runner);

        {
            let mut scheduler = self.scheduler.lock();
            let now = Instant::now();
            for source in &instance.config().sources {
                if let Some(poll) = &source.poll {
                    let schedule = poll_schedule_from(&poll.interval)?;
                    scheduler.register(breaker_key(&name, &source.id), schedule, now);
                }
            }
        }

        self.saved.write().insert(name.clone(), (config, resources));

        self.loggers
            .log(LogRecord::new(&name, LogLevel::Info, "module.active", "module activated"))
            .await;

        Ok(self.module_status(&instance))
    }

    /// Tear down a loaded module: deactivate, drop its scheduled sources and
    /// circuit breakers, shut down its connectors, detach its loggers,
    /// unregister it, and forget its saved config.
    pub async fn unload_module(&self, name: &str) -> Result<(), RuntimeError> {
        let instance = self.registry.get(name).ok_or_else(|| OrgLoopError::module_not_found(name))?;
        instance.deactivate();

        {
            let mut scheduler = self.scheduler.lock();
            for source in &instance.config().sources {
                scheduler.cancel(&breaker_key(name, &source.id));
            }
        }
        {
            let mut breakers = self.breakers.lock();
            breakers.retain(|key, _| split_key(key).map(|(m, _)| m != name).unwrap_or(true));
        }

        instance.shutdown().await;

        self.loggers.remove_by_tag(name);
        self.transform_runners.write().remove(name);
        self.registry.unregister(name)?;
        self.saved.write().remove(name);

        self.loggers
            .log(LogRecord::new(name, LogLevel::Info, "module.removed", "module unloaded"))
            .await;
        Ok(())
    }

    /// Unload then reload a module from its stored config and resources
    ///.
    pub async fn reload_module(&self, name: &str) -> Result<ModuleStatus, RuntimeError> {
        let (config, resources) = self
            .saved
            .read()
            .get(name)
            .cloned()
            .ok_or_else(|| OrgLoopError::module_not_found(name))?;
        self.unload_module(name).await?;
        self.load_module(config, resources).await
    }

    /// Route `event` through `module_name` if given, otherwise through every
    /// currently active module.
    pub async fn inject(&self, event: Event, module_name: Option<&str>) {
        match module_name {
            Some(name) => self.process_event(event, name).await,
            None => {
                for instance in self.registry.list() {
                    if instance.state() == ModuleState::Active {
                        self.process_event(event.clone(), instance.name()).await;
                    }
                }
            }
        }
    }

    /// Publish `event` for durability, match it against `module`'s routes,
    /// and run the transform + delivery pipeline for every match (spec
    /// §4.10 `processEvent`).
    pub async fn process_event(&self, event: Event, module: &str) {
        let Some(instance) = self.registry.get(module) else {
            warn!(module, "process_event: module not found");
            return;
        };

        self.loggers
            .log(
                LogRecord::new(module, LogLevel::Info, "source.emit", "event emitted")
                    .with_field("event_id", event.id.to_string())
                    .with_field("trace_id", event.trace_id.to_string())
                    .with_field("source", event.source.clone()),
            )
            .await;

        let seq = match self.bus.publish(event.clone()) {
            Ok(seq) => Some(seq),
            Err(e) => {
                warn!(module, error = %e, "failed to publish event to the durable bus");
                None
            }
        };

        let routes = matching_routes(instance.routes(), &event).into_iter().cloned().collect::<Vec<_>>();
        if routes.is_empty() {
            self.loggers
                .log(LogRecord::new(module, LogLevel::Debug, "route.no_match", "no route matched event"))
                .await;
            if let Some(seq) = seq {
                self.bus.wal().lock().ack(seq);
            }
            return;
        }

        let transforms = instance.transforms().clone();
        let runner = self.transform_runners.read().get(module).cloned();

        for route in &routes {
            let route_started = Instant::now();
            self.loggers
                .log(
                    LogRecord::new(module, LogLevel::Info, "route.match", "route matched")
                        .with_field("route", route.name.clone())
                        .with_field("event_id", event.id.to_string()),
                )
                .await;

            let outcome = match &runner {
                Some(runner) => runner.run(event.clone(), route, &transforms, &self.loggers, module).await,
                None => PipelineOutcome::Continue(event.clone()),
            };

            let delivered_event = match outcome {
                PipelineOutcome::Continue(event) => event,
                PipelineOutcome::Dropped { .. } | PipelineOutcome::ErrorDropped { .. } | PipelineOutcome::Halted { .. } => {
                    self.metrics.observe_event_processing(&route.name, route_started.elapsed());
                    continue;
                }
                PipelineOutcome::UnknownTransform { transform_ref } => {
                    self.loggers
                        .log(
                            LogRecord::new(module, LogLevel::Error, "transform.unknown", "unknown transform reference")
                                .with_field("transform_ref", transform_ref)
                                .with_field("route", route.name.clone()),
                        )
                        .await;
                    self.metrics.observe_event_processing(&route.name, route_started.elapsed());
                    continue;
                }
            };

            let Some(actor) = instance.actor(&route.then.actor) else {
                warn!(module, actor = %route.then.actor, "route references an unregistered actor");
                continue;
            };
            let outcome = deliver(actor.as_ref(), &delivered_event, route, module, &self.loggers).await;
            if outcome.is_success() {
                self.metrics.record_event_routed(&route.name, &route.then.actor);
            } else {
                self.metrics.record_connector_error(&route.then.actor);
            }
            self.metrics.observe_event_processing(&route.name, route_started.elapsed());
        }

        if let Some(seq) = seq {
            self.bus.wal().lock().ack(seq);
        }
    }

    /// Run one source's scheduled poll, applying circuit breaker state
    /// transitions around the connector call.
    pub async fn poll_source(&self, module: &str, source_id: &str) {
        let Some(instance) = self.registry.get(module) else {
            return;
        };
        if instance.state() != ModuleState::Active {
            return;
        }
        let Some(connector) = instance.source(source_id) else {
            return;
        };

        let key = breaker_key(module, source_id);
        let allowed = {
            let mut breakers = self.breakers.lock();
            let breaker = breakers
                .entry(key.clone())
                .or_insert_with(|| CircuitBreaker::new(CircuitBreakerConfig::default()));
            breaker.allow_poll(&self.clock)
        };
        if !allowed {
            return;
        }

        let now = self.clock.utc_now();
        instance.with_health_mut(source_id, |h| h.record_attempt(now));
        let cursor = instance
            .checkpoints()
            .load(source_id)
            .unwrap_or_else(|e| {
                warn!(module, source_id, error = %e, "checkpoint load failed, polling from scratch");
                None
            });

        match connector.poll(cursor).await {
            Ok(result) => {
                if let Some(next_cursor) = result.next_cursor.clone() {
                    if let Err(e) = instance.checkpoints().save(source_id, next_cursor) {
                        warn!(module, source_id, error = %e, "checkpoint save failed");
                    }
                }
                let was_recovering = instance
                    .health(source_id)
                    .map(|h| h.consecutive_errors > 0)
                    .unwrap_or(false);
                instance.with_health_mut(source_id, |h| h.record_success(now, result.events.len() as u64));
                {
                    let mut breakers = self.breakers.lock();
                    if let Some(b) = breakers.get_mut(&key) {
                        b.record_success();
                    }
                }
                if was_recovering {
                    self.loggers
                        .log(
                            LogRecord::new(module, LogLevel::Info, "source.circuit_close", "circuit closed after successful poll")
                                .with_field("source_id", source_id),
                        )
                        .await;
                }
                for raw in result.events {
                    let event = Event::from_raw(raw);
                    self.process_event(event, module).await;
                }
            }
            Err(e) => {
                self.metrics.record_connector_error(source_id);
                let threshold = CircuitBreakerConfig::default().failure_threshold;
                instance.with_health_mut(source_id, |h| h.record_failure(e.to_string(), threshold));

                let opened = {
                    let mut breakers = self.breakers.lock();
                    let breaker = breakers
                        .entry(key.clone())
                        .or_insert_with(|| CircuitBreaker::new(CircuitBreakerConfig::default()));
                    let was_open = breaker.state() == CircuitState::Open;
                    breaker.record_failure(&self.clock);
                    !was_open && breaker.state() == CircuitState::Open
                };

                let (kind, level) = if opened {
                    ("source.circuit_open", LogLevel::Error)
                } else {
                    ("system.error", LogLevel::Warn)
                };
                self.loggers
                    .log(
                        LogRecord::new(module, level, kind, e.to_string())
                            .with_field("source_id", source_id),
                    )
                    .await;
            }
        }
    }

    async fn run_due_polls(&self) {
        let now = Instant::now();
        let utc_now = Utc::now();
        let due = self.scheduler.lock().due_sources(now, utc_now);
        let mut inflight = self.inflight_polls.lock();
        inflight.retain(|handle| !handle.is_finished());
        for key in due {
            if let Some((module, source)) = split_key(&key) {
                let this = self.clone();
                let handle = tokio::spawn(async move {
                    this.poll_source(&module, &source).await;
                });
                inflight.push(handle);
            }
        }
    }

    /// Await every poll task spawned by `run_due_polls` that hasn't finished
    /// yet, so `stop()` doesn't truncate the WAL out from under events a
    /// racing poll is still publishing and acking.
    async fn join_inflight_polls(&self) {
        let handles = std::mem::take(&mut *self.inflight_polls.lock());
        for handle in handles {
            let _ = handle.await;
        }
    }

    fn spawn_heartbeat(&self) {
        let path = self.config.heartbeat_path();
        let started_at = Instant::now();
        let registry = Arc::clone(&self.registry);
        let stop_notify = Arc::clone(&self.stop_notify);
        let interval_ms = crate::config::heartbeat_interval_ms();
        tokio::spawn(async move {
            let mut ticker = tokio::time::interval(Duration::from_millis(interval_ms));
            loop {
                tokio::select! {
                    _ = ticker.tick() => {
                        heartbeat::write(&path, started_at, registry.len());
                    }
                    _ = stop_notify.notified() => break,
                }
            }
        });
    }

    /// Request a graceful stop; `run` returns once it observes this.
    pub fn request_stop(&self) {
        self.stop_notify.notify_waiters();
    }

    /// Deactivate and shut down every module, flush and shut down loggers,
    /// and truncate the WAL up to whatever has actually been acked (spec
    /// §4.10 `stop`). Waits for any poll-triggered processing still in
    /// flight first, so a racing stop can't truncate entries a poll hasn't
    /// finished publishing and acking yet.
    pub async fn stop(&self) {
        info!("runtime stopping");
        self.join_inflight_polls().await;
        for instance in self.registry.list() {
            instance.deactivate();
            instance.shutdown().await;
            let _ = self.registry.unregister(instance.name());
        }
        self.loggers.flush().await;
        self.loggers.shutdown().await;

        let acked_seq = self.bus.wal().lock().unacked_seq();
        if let Err(e) = self.bus.wal().lock().truncate_before(acked_seq) {
            warn!(error = %e, "failed to truncate WAL on clean shutdown");
        }
    }

    /// Drive the scheduler's 1-second tick and listen for shutdown signals
    /// (`stop()` call, SIGTERM, SIGINT), grounded on the daemon's own main
    /// select loop. Webhook-triggered injection happens independently, off
    /// the HTTP surface, and does not flow through this loop.
    pub async fn run(&self) -> Result<(), RuntimeError> {
        self.mark_started();
        if self.config.heartbeat_enabled {
            self.spawn_heartbeat();
        }

        let mut sigterm = signal(SignalKind::terminate())?;
        let mut sigint = signal(SignalKind::interrupt())?;
        let mut ticker = tokio::time::interval(Duration::from_secs(1));

        info!(port = self.config.port, "runtime ready");

        loop {
            tokio::select! {
                _ = ticker.tick() => {
                    self.refresh_gauges();
                    self.run_due_polls().await;
                }
                _ = self.stop_notify.notified() => {
                    info!("stop requested");
                    break;
                }
                _ = sigterm.recv() => {
                    info!("received SIGTERM");
                    break;
                }
                _ = sigint.recv() => {
                    info!("received SIGINT");
                    break;
                }
            }
        }

        self.stop().await;
        Ok(())
    }
}

#[cfg(test)]
#[path = "runtime_tests.rs"]
mod tests;
