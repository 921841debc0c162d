// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! Per-source poll scheduling.
//!
//! A source is either polled on a fixed interval or on a cron expression.
//! Every newly registered source fires immediately on its first tick, then
//! settles into its configured cadence — so a module that just loaded
//! doesn't wait a full interval before its first poll.

use chrono::{DateTime, Utc};
use orgloop_core::CronSchedule;
use std::collections::HashMap;
use std::time::{Duration, Instant};

/// How a source's poll cadence is expressed.
#[derive(Debug, Clone)]
pub enum PollSchedule {
    Interval(Duration),
    Cron(CronSchedule),
}

struct SourceTimer {
    schedule: PollSchedule,
    fires_at: Instant,
}

/// Tracks the next poll time for every registered source.
#[derive(Default)]
pub struct Scheduler {
    timers: HashMap<String, SourceTimer>,
}

impl Scheduler {
    pub fn new() -> Self {
        Self::default()
    }

    /// Register a source's cadence. Fires immediately on the next call to
    /// [`Scheduler::due_sources`].
    pub fn register(&mut self, source_id: impl Into<String>, schedule: PollSchedule, now: Instant) {
        self.timers.insert(
            source_id.into(),
            SourceTimer {
                schedule,
                fires_at: now,
            },
        );
    }

    pub fn cancel(&mut self, source_id: &str) {
        self.timers.remove(source_id);
    }

    /// Source ids due to poll at `now`, each rescheduled for its next fire.
    pub fn due_sources(&mut self, now: Instant, utc_now: DateTime<Utc>) -> Vec<String> {
        let mut due = Vec::new();
        for (id, timer) in self.timers.iter_mut() {
            if timer.fires_at <= now {
                due.push(id.clone());
                timer.fires_at = Self::next_fire(&timer.schedule, now, utc_now);
            }
        }
        due
    }

    fn next_fire(schedule: &PollSchedule, now: Instant, utc_now: DateTime<Utc>) -> Instant {
        match schedule {
            PollSchedule::Interval(duration) => now + *duration,
            PollSchedule::Cron(cron) => match cron.next_fire_after(utc_now) {
                Some(next_utc) => {
                    let delta = next_utc - utc_now;
                    now + delta.to_std().unwrap_or(Duration::ZERO)
                }
                None => now + Duration::from_secs(60),
            },
        }
    }

    /// Earliest deadline across all registered sources, for driving the
    /// runtime's select loop sleep.
    pub fn next_deadline(&self) -> Option<Instant> {
        self.timers.values().map(|t| t.fires_at).min()
    }

    pub fn has_timers(&self) -> bool {
        !self.timers.is_empty()
    }
}

#[cfg(test)]
#[path = "scheduler_tests.rs"]
mod tests;
