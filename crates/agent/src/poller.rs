// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! Background poller recomputing the aggregate queue length.
//!
//! Every cycle: read the interval and printer list from the current
//! configuration, query the provider per printer, append one report
//! record per printer, then publish the summed total as the new snapshot
//! in one step. A provider failure counts as 0 for that printer only;
//! a failed cycle never stops the schedule — periodic re-execution is
//! the recovery mechanism.

use std::sync::Arc;

use tokio_util::sync::CancellationToken;
use tracing::{debug, info, warn};

use pqm_core::{Clock, PrintProvider, QueueSnapshot, ReportEntry, ReportSink, SharedState};

pub(crate) struct Poller {
    pub state: SharedState,
    pub provider: Arc<dyn PrintProvider>,
    pub report: Arc<dyn ReportSink>,
    pub clock: Arc<dyn Clock>,
    pub shutdown: CancellationToken,
}

impl Poller {
    /// Run scheduled cycles until shutdown.
    ///
    /// The interval is read at the top of each wait, so an accepted
    /// `SetInterval` takes effect at the next scheduling decision and
    /// never shortens or stretches the wait already in progress.
    pub async fn run(self) {
        loop {
            let interval = { self.state.lock().config.interval() };
            tokio::select! {
                _ = self.shutdown.cancelled() => {
                    info!("poller shutting down");
                    break;
                }
                _ = tokio::time::sleep(interval) => {}
            }
            self.poll_once().await;
        }
    }

    /// Run one complete cycle and publish its aggregate.
    pub async fn poll_once(&self) {
        // Brief lock: copy the printer list out for this cycle
        let printers = { self.state.lock().config.printers.clone() };

        let mut total: u64 = 0;
        for printer in &printers {
            let count = match self.provider.queue_length(printer).await {
                Ok(count) => count,
                Err(e) => {
                    warn!(printer = %printer, "provider query failed, counting 0: {e}");
                    0
                }
            };
            total += count;

            let entry = ReportEntry {
                timestamp_ms: self.clock.epoch_ms(),
                printer: printer.clone(),
                count,
            };
            if let Err(e) = self.report.append(&entry) {
                warn!(printer = %printer, "report append failed: {e}");
            }
        }

        let snapshot = QueueSnapshot { total, completed_at_ms: self.clock.epoch_ms() };
        self.state.lock().publish_snapshot(snapshot);
        debug!(printers = printers.len(), total, "poll cycle complete");
    }
}

#[cfg(test)]
#[path = "poller_tests.rs"]
mod tests;
