// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! Module registry.
//!
//! Unique-name singleton index with conflict detection. Single writer at a
//! time (enforced by the lock); reads are cheap snapshots.

use crate::instance::ModuleInstance;
use orgloop_core::OrgLoopError;
use parking_lot::RwLock;
use std::collections::HashMap;
use std::sync::Arc;

#[derive(Default)]
pub struct ModuleRegistry {
    modules: RwLock<HashMap<String, Arc<ModuleInstance>>>,
}

impl ModuleRegistry {
    pub fn new() -> Self {
        Self::default()
    }

    /// Register `module`, raising [`OrgLoopError::ModuleConflict`] if its
    /// name is already taken.
    pub fn register(&self, module: Arc<ModuleInstance>) -> Result<(), OrgLoopError> {
        let mut modules = self.modules.write();
        if modules.contains_key(module.name()) {
            return Err(OrgLoopError::module_conflict(module.name()));
        }
        modules.insert(module.name().to_string(), module);
        Ok(())
    }

    /// Remove and return the module, raising [`OrgLoopError::ModuleNotFound`]
    /// if it isn't registered.
    pub fn unregister(&self, name: &str) -> Result<Arc<ModuleInstance>, OrgLoopError> {
        self.modules
            .write()
            .remove(name)
            .ok_or_else(|| OrgLoopError::module_not_found(name))
    }

    pub fn get(&self, name: &str) -> Option<Arc<ModuleInstance>> {
        self.modules.read().get(name).cloned()
    }

    pub fn contains(&self, name: &str) -> bool {
        self.modules.read().contains_key(name)
    }

    pub fn list(&self) -> Vec<Arc<ModuleInstance>> {
        self.modules.read().values().cloned().collect()
    }

    pub fn len(&self) -> usize {
        self.modules.read().len()
    }

    pub fn is_empty(&self) -> bool {
        self.modules.read().is_empty()
    }
}

#[cfg(test)]
#[path = "registry_tests.rs"]
mod tests;
