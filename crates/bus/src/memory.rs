// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! In-memory event bus for modules that don't need WAL
//! durability — tests, and any module configured without persistence.

use crate::BusError;
use orgloop_core::Event;
use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::Arc;
use tokio::sync::mpsc;

/// Sending half of an in-memory bus.
#[derive(Clone)]
pub struct MemoryBus {
    tx: mpsc::UnboundedSender<Event>,
    next_seq: Arc<AtomicU64>,
}

/// Receiving half of an in-memory bus.
pub struct MemoryReader {
    rx: mpsc::UnboundedReceiver<Event>,
}

impl MemoryBus {
    /// Create a connected bus/reader pair.
    pub fn new() -> (Self, MemoryReader) {
        let (tx, rx) = mpsc::unbounded_channel();
        (
            Self {
                tx,
                next_seq: Arc::new(AtomicU64::new(0)),
            },
            MemoryReader { rx },
        )
    }

    /// Publish `event`, returning a monotonically increasing sequence
    /// number scoped to this bus instance (not persisted).
    pub fn publish(&self, event: Event) -> Result<u64, BusError> {
        let seq = self.next_seq.fetch_add(1, Ordering::SeqCst) + 1;
        self.tx
            .send(event)
            .map_err(|_| BusError::Closed)?;
        Ok(seq)
    }
}

impl MemoryReader {
    /// Wait for the next event. Returns `None` once every [`MemoryBus`]
    /// sender has been dropped.
    pub async fn recv(&mut self) -> Option<Event> {
        self.rx.recv().await
    }
}

#[cfg(test)]
#[path = "memory_tests.rs"]
mod tests;
