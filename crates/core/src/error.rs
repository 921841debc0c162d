// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! OrgLoop's error taxonomy.
//!
//! Every error the runtime surfaces to logs, the control API, or module
//! load failures is classified into one of these kinds. Components lower in
//! the stack (storage, bus) define their own narrow `thiserror` enums and
//! convert into this one at the boundary where classification and a log
//! phase are assigned.

use thiserror::Error;

/// Tagged error kinds carried with structured fields
#[derive(Debug, Error)]
pub enum OrgLoopError {
    #[error("config error: {0}")]
    Config(String),

    #[error("connector error ({connector_id}): {message}")]
    Connector {
        connector_id: String,
        message: String,
    },

    #[error("transform error ({transform_id}): {message}")]
    Transform {
        transform_id: String,
        message: String,
    },

    #[error("delivery error (actor={actor_id}, route={route_name}): {message}")]
    Delivery {
        actor_id: String,
        route_name: String,
        message: String,
    },

    #[error("schema error: {validation_errors:?}")]
    Schema { validation_errors: Vec<String> },

    #[error("module conflict: {module_name} is already registered")]
    ModuleConflict { module_name: String },

    #[error("module not found: {module_name}")]
    ModuleNotFound { module_name: String },

    #[error("runtime error: {0}")]
    Runtime(String),
}

impl OrgLoopError {
    pub fn connector(connector_id: impl Into<String>, message: impl Into<String>) -> Self {
        Self::Connector {
            connector_id: connector_id.into(),
            message: message.into(),
        }
    }

    pub fn transform(transform_id: impl Into<String>, message: impl Into<String>) -> Self {
        Self::Transform {
            transform_id: transform_id.into(),
            message: message.into(),
        }
    }

    pub fn delivery(
        actor_id: impl Into<String>,
        route_name: impl Into<String>,
        message: impl Into<String>,
    ) -> Self {
        Self::Delivery {
            actor_id: actor_id.into(),
            route_name: route_name.into(),
            message: message.into(),
        }
    }

    pub fn module_not_found(module_name: impl Into<String>) -> Self {
        Self::ModuleNotFound {
            module_name: module_name.into(),
        }
    }

    pub fn module_conflict(module_name: impl Into<String>) -> Self {
        Self::ModuleConflict {
            module_name: module_name.into(),
        }
    }
}
