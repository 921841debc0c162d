// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

// Allow panic!/unwrap/expect in test code
#![cfg_attr(test, allow(clippy::panic))]
#![cfg_attr(test, allow(clippy::unwrap_used))]
#![cfg_attr(test, allow(clippy::expect_used))]

//! orgloop-bus: the event bus a module's ingest path publishes onto and the
//! router consumes from. Two backings: [`MemoryBus`] (no
//! durability, used by modules configured without a WAL) and [`WalBus`]
//! (durable, group-commit, backed by `orgloop-storage`).

mod memory;
mod wal_backed;

pub use memory::{MemoryBus, MemoryReader};
pub use wal_backed::{WalBus, WalReader};

use orgloop_storage::WalError;
use thiserror::Error;

#[derive(Debug, Error)]
pub enum BusError {
    #[error("bus is closed")]
    Closed,
    #[error(transparent)]
    Wal(#[from] WalError),
}
