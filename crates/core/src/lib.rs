// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

// Allow panic!/unwrap/expect in test code
#![cfg_attr(test, allow(clippy::panic))]
#![cfg_attr(test, allow(clippy::unwrap_used))]
#![cfg_attr(test, allow(clippy::expect_used))]

//! pqm-core: domain types and collaborator traits for the print queue monitor.
//!
//! Holds the monitoring configuration and snapshot store shared by the
//! agent's poller and connection handlers, plus the seams to the outside
//! world: the print provider (per-printer job counts, installed printers)
//! and the append-only report sink.

pub mod clock;
pub mod config;
pub mod lpstat;
pub mod provider;
pub mod report;
pub mod state;

pub use clock::{Clock, FakeClock, SystemClock};
pub use config::{ConfigError, MonitorConfig, DEFAULT_INTERVAL};
pub use lpstat::LpstatProvider;
pub use provider::{JobRecord, JobTableProvider, PrintProvider, ProviderError};
pub use report::{FileReportSink, MemoryReportSink, ReportEntry, ReportError, ReportSink};
pub use state::{MonitorState, QueueSnapshot, SharedState};
