// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! WAL-backed event bus.
//!
//! Events are durably appended to a module's WAL before the router is woken,
//! so a crash between ingest and delivery leaves a durable trail. Group
//! commit keeps the per-event fsync cost off the hot path.

use crate::BusError;
use orgloop_core::Event;
use orgloop_storage::Wal;
use parking_lot::Mutex;
use std::sync::Arc;
use tokio::sync::mpsc;

/// Sending half of a WAL-backed bus.
#[derive(Clone)]
pub struct WalBus {
    wal: Arc<Mutex<Wal>>,
    wake_tx: mpsc::Sender<()>,
}

/// Receiving half of a WAL-backed bus.
pub struct WalReader {
    wal: Arc<Mutex<Wal>>,
    wake_rx: mpsc::Receiver<()>,
}

impl WalBus {
    /// Wrap an already-open WAL in a bus/reader pair.
    pub fn new(wal: Wal) -> (Self, WalReader) {
        let wal = Arc::new(Mutex::new(wal));
        let (wake_tx, wake_rx) = mpsc::channel(1);
        (
            Self {
                wal: Arc::clone(&wal),
                wake_tx,
            },
            WalReader { wal, wake_rx },
        )
    }

    /// Append `event` to the WAL (buffered, not yet durable) and wake the
    /// reader if it's asleep.
    pub fn publish(&self, event: Event) -> Result<u64, BusError> {
        let seq = {
            let mut wal = self.wal.lock();
            wal.append(&event)?
        };
        let _ = self.wake_tx.try_send(());
        Ok(seq)
    }

    pub fn flush(&self) -> Result<(), BusError> {
        Ok(self.wal.lock().flush()?)
    }

    pub fn needs_flush(&self) -> bool {
        self.wal.lock().needs_flush()
    }

    /// Arc handle to the underlying WAL, for truncation on clean shutdown.
    pub fn wal(&self) -> Arc<Mutex<Wal>> {
        Arc::clone(&self.wal)
    }
}

impl WalReader {
    /// Wait for and return the next unacknowledged entry as `(seq, event)`.
    /// Returns `None` once every [`WalBus`] sender has been dropped. Callers
    /// must [`WalReader::ack`] the returned `seq` once the event has been
    /// fully routed and delivered.
    pub async fn recv(&mut self) -> Result<Option<(u64, Event)>, BusError> {
        loop {
            {
                let mut wal = self.wal.lock();
                if let Some(entry) = wal.next_unacked()? {
                    return Ok(Some((entry.seq, entry.event)));
                }
            }
            if self.wake_rx.recv().await.is_none() {
                return Ok(None);
            }
        }
    }

    pub fn ack(&self, seq: u64) {
        self.wal.lock().ack(seq);
    }

    pub fn wal(&self) -> Arc<Mutex<Wal>> {
        Arc::clone(&self.wal)
    }
}

#[cfg(test)]
#[path = "wal_backed_tests.rs"]
mod tests;
