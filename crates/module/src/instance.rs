// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! Module instance.
//!
//! Owns one configuration unit's connectors, routes, transforms, loggers,
//! checkpoint store, and per-source health records. Lifecycle states:
//! `loading -> active -> unloading -> removed`.

use chrono::{DateTime, Utc};
use orgloop_core::{HealthRecord, ModuleConfig, RouteConfig, TransformConfig};
use orgloop_core::OrgLoopError;
use orgloop_plugin::{ActorConnector, Logger, PackageTransform, SourceConnector};
use orgloop_storage::CheckpointStore;
use parking_lot::RwLock;
use std::collections::HashMap;
use std::sync::Arc;
use tracing::warn;

/// Lifecycle state of a [`ModuleInstance`].
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ModuleState {
    Loading,
    Active,
    Unloading,
    Removed,
}

/// The concrete connectors/transforms/loggers a module config resolves to.
/// Construction of these from declarative config is out of scope here (spec
/// §1: concrete plugins are external collaborators); the runtime supplies
/// already-initialized instances, keyed the way the config references them.
#[derive(Default, Clone)]
pub struct ModuleResources {
    pub sources: HashMap<String, Arc<dyn SourceConnector>>,
    pub actors: HashMap<String, Arc<dyn ActorConnector>>,
    /// Keyed by `package` name, as referenced from `TransformKind::Package`.
    pub transforms: HashMap<String, Arc<dyn PackageTransform>>,
    /// Keyed by logger name, as declared in `ModuleConfig.loggers`.
    pub loggers: HashMap<String, Arc<dyn Logger>>,
}

/// One loaded module: its config, its resolved resources, and the mutable
/// state (health, lifecycle) the runtime tracks around them.
pub struct ModuleInstance {
    config: ModuleConfig,
    resources: ModuleResources,
    checkpoints: Arc<dyn CheckpointStore>,
    transforms_by_name: HashMap<String, TransformConfig>,
    health: RwLock<HashMap<String, HealthRecord>>,
    state: RwLock<ModuleState>,
    activated_at: RwLock<Option<DateTime<Utc>>>,
}

impl ModuleInstance {
    pub fn new(config: ModuleConfig, resources: ModuleResources, checkpoints: Arc<dyn CheckpointStore>) -> Self {
        let transforms_by_name = config
            .transforms
            .iter()
            .map(|t| (t.name.clone(), t.clone()))
            .collect();
        let health = config
            .sources
            .iter()
            .map(|s| (s.id.clone(), HealthRecord::default()))
            .collect();
        Self {
            config,
            resources,
            checkpoints,
            transforms_by_name,
            health: RwLock::new(health),
            state: RwLock::new(ModuleState::Loading),
            activated_at: RwLock::new(None),
        }
    }

    pub fn name(&self) -> &str {
        &self.config.name
    }

    pub fn config(&self) -> &ModuleConfig {
        &self.config
    }

    pub fn routes(&self) -> &[RouteConfig] {
        &self.config.routes
    }

    pub fn transforms(&self) -> &HashMap<String, TransformConfig> {
        &self.transforms_by_name
    }

    pub fn source(&self, source_id: &str) -> Option<Arc<dyn SourceConnector>> {
        self.resources.sources.get(source_id).cloned()
    }

    pub fn actor(&self, actor_id: &str) -> Option<Arc<dyn ActorConnector>> {
        self.resources.actors.get(actor_id).cloned()
    }

    pub fn transform(&self, package: &str) -> Option<Arc<dyn PackageTransform>> {
        self.resources.transforms.get(package).cloned()
    }

    pub fn loggers(&self) -> &HashMap<String, Arc<dyn Logger>> {
        &self.resources.loggers
    }

    pub fn checkpoints(&self) -> &Arc<dyn CheckpointStore> {
        &self.checkpoints
    }

    pub fn state(&self) -> ModuleState {
        *self.state.read()
    }

    pub fn activated_at(&self) -> Option<DateTime<Utc>> {
        *self.activated_at.read()
    }

    pub fn health(&self, source_id: &str) -> Option<HealthRecord> {
        self.health.read().get(source_id).cloned()
    }

    pub fn health_snapshot(&self) -> HashMap<String, HealthRecord> {
        self.health.read().clone()
    }

    pub fn with_health_mut<R>(&self, source_id: &str, f: impl FnOnce(&mut HealthRecord) -> R) -> Option<R> {
        self.health.write().get_mut(source_id).map(f)
    }

    /// Call `init(config)` on every source and actor connector. Package
    /// transforms and loggers have no per-module init hook in this plugin
    /// contract; they arrive already initialized.
    pub async fn initialize(&self) -> Result<(), OrgLoopError> {
        for source in &self.config.sources {
            if let Some(connector) = self.resources.sources.get(&source.id) {
                connector
                    .init(&source.config)
                    .await
                    .map_err(|e| OrgLoopError::connector(source.id.clone(), e.to_string()))?;
            }
        }
        for actor in &self.config.actors {
            if let Some(connector) = self.resources.actors.get(&actor.id) {
                connector
                    .init(&actor.config)
                    .await
                    .map_err(|e| OrgLoopError::connector(actor.id.clone(), e.to_string()))?;
            }
        }
        Ok(())
    }

    pub fn activate(&self) {
        *self.state.write() = ModuleState::Active;
        *self.activated_at.write() = Some(Utc::now());
    }

    /// Prevent new event processing without tearing anything down yet.
    pub fn deactivate(&self) {
        *self.state.write() = ModuleState::Unloading;
    }

    /// Shut down every connector in reverse of init order, isolating
    /// failures: one connector's shutdown error doesn't skip the rest.
    pub async fn shutdown(&self) {
        for actor in self.config.actors.iter().rev() {
            if let Some(connector) = self.resources.actors.get(&actor.id) {
                if let Err(e) = connector.shutdown().await {
                    warn!(module = %self.config.name, actor_id = %actor.id, error = %e, "actor shutdown failed");
                }
            }
        }
        for source in self.config.sources.iter().rev() {
            if let Some(connector) = self.resources.sources.get(&source.id) {
                if let Err(e) = connector.shutdown().await {
                    warn!(module = %self.config.name, source_id = %source.id, error = %e, "source shutdown failed");
                }
            }
        }
        *self.state.write() = ModuleState::Removed;
    }
}

#[cfg(test)]
#[path = "instance_tests.rs"]
mod tests;
