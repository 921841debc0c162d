// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

// Allow panic!/unwrap/expect in test code
#![cfg_attr(test, allow(clippy::panic))]
#![cfg_attr(test, allow(clippy::unwrap_used))]
#![cfg_attr(test, allow(clippy::expect_used))]

//! orgloop-plugin: async trait contracts for source, actor, and transform
//! plugins, plus the logger sink contract. Concrete built-in connectors and
//! loggers live in `orgloop-engine`; this crate only defines the seams and
//! the fakes used to test against them.

mod actor;
mod logger;
mod source;
mod transform;

pub use actor::{ActorConnector, ActorError, DeliveryReceipt};
pub use logger::{LogLevel, LogRecord, Logger, LoggerError, NoOpLogger};
pub use source::{PollResult, SourceConnector, SourceError};
pub use transform::{PackageTransform, TransformError};

#[cfg(any(test, feature = "test-support"))]
pub use actor::{ActorCall, FakeActorConnector};
#[cfg(any(test, feature = "test-support"))]
pub use logger::FakeLogger;
#[cfg(any(test, feature = "test-support"))]
pub use source::{FakeSourceConnector, SourceCall};
#[cfg(any(test, feature = "test-support"))]
pub use transform::FakePackageTransform;
