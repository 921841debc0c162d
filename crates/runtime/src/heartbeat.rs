// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! Heartbeat file.
//!
//! Best-effort: a write failure is logged and otherwise ignored, since the
//! heartbeat is an external liveness signal, not something the runtime's
//! own correctness depends on.

use serde::Serialize;
use std::path::Path;
use std::time::Instant;
use tracing::warn;

#[derive(Serialize)]
struct HeartbeatRecord {
    pid: u32,
    timestamp: chrono::DateTime<chrono::Utc>,
    uptime_ms: u128,
    modules: usize,
}

pub fn write(path: &Path, started_at: Instant, module_count: usize) {
    let record = HeartbeatRecord {
        pid: std::process::id(),
        timestamp: chrono::Utc::now(),
        uptime_ms: started_at.elapsed().as_millis(),
        modules: module_count,
    };
    if let Err(e) = write_atomic(path, &record) {
        warn!(error = %e, "failed to write heartbeat file");
    }
}

fn write_atomic(path: &Path, record: &HeartbeatRecord) -> std::io::Result<()> {
    if let Some(parent) = path.parent() {
        std::fs::create_dir_all(parent)?;
    }
    let tmp = path.with_extension("tmp");
    std::fs::write(&tmp, serde_json::to_vec(record)?)?;
    std::fs::rename(&tmp, path)?;
    Ok(())
}
