// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! Restart/backoff decision state machine.
//!
//! Tracks a sliding-window restart count and an exponential backoff
//! duration across a child process's abnormal exits. A child that stays up
//! long enough to be considered stable resets both.

use orgloop_core::Clock;
use std::time::{Duration, Instant};

#[derive(Debug, Clone, Copy)]
pub struct RestartPolicyConfig {
    pub initial_backoff: Duration,
    pub max_backoff: Duration,
    pub stable_threshold: Duration,
    pub window: Duration,
    pub max_restarts_per_window: u32,
}

impl Default for RestartPolicyConfig {
    fn default() -> Self {
        Self {
            initial_backoff: Duration::from_secs(1),
            max_backoff: Duration::from_secs(30),
            stable_threshold: Duration::from_secs(60),
            window: Duration::from_secs(5 * 60),
            max_restarts_per_window: 10,
        }
    }
}

/// What the supervisor should do after a child exits.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RestartDecision {
    /// Exit code 0: quit, nothing to restart.
    CleanExit,
    /// Abnormal exit; restart after the given backoff.
    Restart { after: Duration },
    /// Too many restarts within the window: give up and let the caller
    /// invoke its crash-loop callback.
    CrashLoop,
}

/// Tracks restart count, sliding window, and current backoff across a
/// sequence of child exits.
pub struct RestartPolicy {
    config: RestartPolicyConfig,
    current_backoff: Duration,
    window_started_at: Option<Instant>,
    window_restart_count: u32,
}

impl RestartPolicy {
    pub fn new(config: RestartPolicyConfig) -> Self {
        Self {
            current_backoff: config.initial_backoff,
            config,
            window_started_at: None,
            window_restart_count: 0,
        }
    }

    pub fn current_backoff(&self) -> Duration {
        self.current_backoff
    }

    pub fn window_restart_count(&self) -> u32 {
        self.window_restart_count
    }

    /// Decide what to do given a child that ran for `uptime` and exited
    /// with `exit_code` (`None` if it was killed by a signal, treated as
    /// abnormal).
    pub fn on_child_exit(
        &mut self,
        exit_code: Option<i32>,
        uptime: Duration,
        clock: &impl Clock,
    ) -> RestartDecision {
        if exit_code == Some(0) {
            return RestartDecision::CleanExit;
        }

        let now = clock.now();
        if uptime >= self.config.stable_threshold {
            self.current_backoff = self.config.initial_backoff;
            self.window_started_at = None;
            self.window_restart_count = 0;
        }

        let window_expired = self
            .window_started_at
            .is_some_and(|started| now.duration_since(started) >= self.config.window);
        if self.window_started_at.is_none() || window_expired {
            self.window_started_at = Some(now);
            self.window_restart_count = 0;
        }

        self.window_restart_count += 1;
        if self.window_restart_count >= self.config.max_restarts_per_window {
            return RestartDecision::CrashLoop;
        }

        let after = self.current_backoff;
        self.current_backoff = (self.current_backoff * 2).min(self.config.max_backoff);
        RestartDecision::Restart { after }
    }
}

#[cfg(test)]
#[path = "restart_policy_tests.rs"]
mod tests;
