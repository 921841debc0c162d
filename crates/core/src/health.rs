// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! Per-source health record.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// Coarse health status surfaced via the control API.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum HealthStatus {
    Healthy,
    Degraded,
    Unhealthy,
}

/// Mutable health state for one source, owned by its module.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct HealthRecord {
    pub status: HealthStatus,
    pub last_successful_poll: Option<DateTime<Utc>>,
    pub last_poll_attempt: Option<DateTime<Utc>>,
    pub consecutive_errors: u32,
    pub last_error: Option<String>,
    pub total_events_emitted: u64,
    pub circuit_open: bool,
}

impl Default for HealthRecord {
    fn default() -> Self {
        Self {
            status: HealthStatus::Healthy,
            last_successful_poll: None,
            last_poll_attempt: None,
            consecutive_errors: 0,
            last_error: None,
            total_events_emitted: 0,
            circuit_open: false,
        }
    }
}

impl HealthRecord {
    pub fn record_attempt(&mut self, at: DateTime<Utc>) {
        self.last_poll_attempt = Some(at);
    }

    pub fn record_success(&mut self, at: DateTime<Utc>, events_emitted: u64) {
        self.last_successful_poll = Some(at);
        self.last_error = None;
        self.consecutive_errors = 0;
        self.status = HealthStatus::Healthy;
        self.circuit_open = false;
        self.total_events_emitted += events_emitted;
    }

    pub fn record_failure(&mut self, error: impl Into<String>, threshold: u32) {
        self.consecutive_errors += 1;
        self.last_error = Some(error.into());
        if self.consecutive_errors >= threshold {
            self.circuit_open = true;
            self.status = HealthStatus::Unhealthy;
        } else {
            self.status = HealthStatus::Degraded;
        }
    }
}

#[cfg(test)]
#[path = "health_tests.rs"]
mod tests;
