// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! Environment and file-layout configuration.

use crate::error::RuntimeError;
use std::path::PathBuf;

const DEFAULT_PORT: u16 = 4800;
const DEFAULT_HEARTBEAT_INTERVAL_MS: u64 = 30_000;

/// Resolve the data root: `ORGLOOP_STATE_DIR` override, else `~/.orgloop`.
pub fn data_root() -> Result<PathBuf, RuntimeError> {
    if let Ok(dir) = std::env::var("ORGLOOP_STATE_DIR") {
        return Ok(PathBuf::from(dir));
    }
    let home = std::env::var("HOME").map_err(|_| RuntimeError::NoDataRoot)?;
    Ok(PathBuf::from(home).join(".orgloop"))
}

/// HTTP port, overridable by `ORGLOOP_PORT`.
pub fn port() -> u16 {
    std::env::var("ORGLOOP_PORT")
        .ok()
        .and_then(|s| s.parse().ok())
        .unwrap_or(DEFAULT_PORT)
}

/// Prometheus metrics port. `None` disables the metrics endpoint.
pub fn metrics_port() -> Option<u16> {
    std::env::var("ORGLOOP_METRICS_PORT").ok().and_then(|s| s.parse().ok())
}

/// Whether the heartbeat file should be written by default.
pub fn daemon_enabled() -> bool {
    std::env::var("ORGLOOP_DAEMON").is_ok()
}

/// Set by the supervisor on the child process.
pub fn supervised() -> bool {
    std::env::var("ORGLOOP_SUPERVISED").is_ok()
}

pub fn heartbeat_interval_ms() -> u64 {
    std::env::var("ORGLOOP_HEARTBEAT_MS")
        .ok()
        .and_then(|s| s.parse().ok())
        .unwrap_or(DEFAULT_HEARTBEAT_INTERVAL_MS)
}

/// Everything under the data root the runtime reads or writes, resolved
/// once at startup.
#[derive(Debug, Clone)]
pub struct RuntimeConfig {
    pub data_root: PathBuf,
    pub port: u16,
    pub metrics_port: Option<u16>,
    pub heartbeat_enabled: bool,
}

impl RuntimeConfig {
    pub fn from_env() -> Result<Self, RuntimeError> {
        Ok(Self {
            data_root: data_root()?,
            port: port(),
            metrics_port: metrics_port(),
            heartbeat_enabled: daemon_enabled(),
        })
    }

    pub fn wal_path(&self) -> PathBuf {
        self.data_root.join("data").join("wal").join("events.jsonl")
    }

    pub fn checkpoints_dir(&self) -> PathBuf {
        self.data_root.join("data").join("checkpoints")
    }

    pub fn heartbeat_path(&self) -> PathBuf {
        self.data_root.join("heartbeat")
    }

    pub fn pid_path(&self) -> PathBuf {
        self.data_root.join("orgloop.pid")
    }

    pub fn logs_dir(&self) -> PathBuf {
        self.data_root.join("logs")
    }
}

#[cfg(test)]
#[path = "config_tests.rs"]
mod tests;
