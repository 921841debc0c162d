// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

// Allow panic!/unwrap/expect in test code
#![cfg_attr(test, allow(clippy::panic))]
#![cfg_attr(test, allow(clippy::unwrap_used))]
#![cfg_attr(test, allow(clippy::expect_used))]

//! orgloop-core: shared data model, error taxonomy, and small self-contained
//! utilities (clock, duration/cron parsing, dot-path lookup, prompt front
//! matter) used across the OrgLoop workspace.

pub mod clock;
pub mod config;
pub mod cron;
pub mod duration;
pub mod error;
pub mod event;
pub mod frontmatter;
pub mod health;
pub mod id;

pub use clock::{Clock, FakeClock, SystemClock};
pub use config::{
    ActorConfig, LoggerConfig, ModuleConfig, ModuleDefaults, OnError, PollConfig, RouteConfig,
    RouteThen, RouteWhen, RouteWith, SourceConfig, TransformConfig, TransformKind, TransformRef,
};
pub use cron::{CronParseError, CronSchedule};
pub use duration::{parse_duration, render_duration, DurationParseError};
pub use error::OrgLoopError;
pub use event::{dot_path_get, Event, EventType, Provenance, RawEvent};
pub use frontmatter::{metadata_to_hash_map, parse_front_matter, FrontMatter};
pub use health::{HealthRecord, HealthStatus};
pub use id::{EventId, TraceId};
