// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! Append-only report sink for per-printer poll results.
//!
//! One record per printer per cycle: timestamp, printer name, job count.
//! The sink is write-only here; downstream tooling parses the file into
//! time series.

use std::fs::OpenOptions;
use std::io::Write;
use std::path::{Path, PathBuf};

use chrono::{TimeZone, Utc};
use parking_lot::Mutex;
use thiserror::Error;

/// Errors from appending to a report sink.
#[derive(Debug, Error)]
pub enum ReportError {
    #[error("report write failed: {0}")]
    Io(#[from] std::io::Error),
}

/// One per-printer observation from a poll cycle.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ReportEntry {
    pub timestamp_ms: u64,
    pub printer: String,
    pub count: u64,
}

/// Write-only sink for poll observations.
pub trait ReportSink: Send + Sync {
    fn append(&self, entry: &ReportEntry) -> Result<(), ReportError>;
}

/// File-backed sink appending one line per entry.
pub struct FileReportSink {
    path: PathBuf,
}

impl FileReportSink {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }
}

impl ReportSink for FileReportSink {
    fn append(&self, entry: &ReportEntry) -> Result<(), ReportError> {
        let ts = Utc
            .timestamp_millis_opt(entry.timestamp_ms as i64)
            .single()
            .map(|t| t.format("%Y-%m-%d %H:%M:%S").to_string())
            .unwrap_or_else(|| entry.timestamp_ms.to_string());
        let mut file = OpenOptions::new().create(true).append(true).open(&self.path)?;
        writeln!(file, "{ts} printer='{}' jobs={}", entry.printer, entry.count)?;
        Ok(())
    }
}

/// In-memory sink for tests.
#[derive(Default)]
pub struct MemoryReportSink {
    entries: Mutex<Vec<ReportEntry>>,
}

impl MemoryReportSink {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn entries(&self) -> Vec<ReportEntry> {
        self.entries.lock().clone()
    }
}

impl ReportSink for MemoryReportSink {
    fn append(&self, entry: &ReportEntry) -> Result<(), ReportError> {
        self.entries.lock().push(entry.clone());
        Ok(())
    }
}

#[cfg(test)]
#[path = "report_tests.rs"]
mod tests;
