// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

// Allow panic!/unwrap/expect in test code
#![cfg_attr(test, allow(clippy::panic))]
#![cfg_attr(test, allow(clippy::unwrap_used))]
#![cfg_attr(test, allow(clippy::expect_used))]

//! orgloop-storage: durable event WAL and per-source checkpoint persistence.

mod checkpoint;
mod wal;

pub use checkpoint::{
    file_store_at, CheckpointError, CheckpointStore, FileCheckpointStore, MemoryCheckpointStore,
};
pub use wal::{Wal, WalEntry, WalError};
