// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! Shared monitor state: configuration plus the latest queue snapshot.

use std::sync::Arc;

use parking_lot::Mutex;

use crate::config::MonitorConfig;

/// Aggregate result of one completed poll cycle.
///
/// `total` is the sum of per-printer job counts from that cycle. Partial
/// sums are never published; the poller writes a snapshot only after the
/// whole cycle finished.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct QueueSnapshot {
    pub total: u64,
    /// Cycle completion time, epoch milliseconds.
    pub completed_at_ms: u64,
}

/// State shared between the poller and all connection handlers.
///
/// Guarded by one mutex so no reader ever observes a half-replaced printer
/// list or a sum from an unfinished cycle. Lock scopes stay brief: handlers
/// and the poller copy what they need out and release.
#[derive(Debug, Default)]
pub struct MonitorState {
    pub config: MonitorConfig,
    snapshot: Option<QueueSnapshot>,
}

/// Handle shared by the listener, the poller, and service callers.
pub type SharedState = Arc<Mutex<MonitorState>>;

impl MonitorState {
    pub fn new(config: MonitorConfig) -> Self {
        Self { config, snapshot: None }
    }

    pub fn shared(config: MonitorConfig) -> SharedState {
        Arc::new(Mutex::new(Self::new(config)))
    }

    /// Replace the snapshot with the result of a completed cycle.
    pub fn publish_snapshot(&mut self, snapshot: QueueSnapshot) {
        self.snapshot = Some(snapshot);
    }

    pub fn snapshot(&self) -> Option<QueueSnapshot> {
        self.snapshot
    }

    /// Latest aggregate queue length, or 0 before the first completed cycle.
    pub fn queue_length(&self) -> u64 {
        self.snapshot.map(|s| s.total).unwrap_or(0)
    }
}

#[cfg(test)]
#[path = "state_tests.rs"]
mod tests;
