// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! Print provider seam: per-printer job counts and printer enumeration.
//!
//! The concrete job-count mechanism lives behind this trait so the agent
//! and gateway stay headless and testable. A provider failure is an error
//! per call; it never takes down the caller.

use std::sync::Arc;

use async_trait::async_trait;
use parking_lot::Mutex;
use thiserror::Error;

/// Errors from a provider call.
#[derive(Debug, Error)]
pub enum ProviderError {
    #[error("provider query failed: {0}")]
    Query(String),

    #[error("provider unavailable: {0}")]
    Unavailable(#[from] std::io::Error),
}

/// External capability answering queue lengths and the installed-printer list.
#[async_trait]
pub trait PrintProvider: Send + Sync {
    /// Number of jobs currently queued for `printer`. Non-negative.
    async fn queue_length(&self, printer: &str) -> Result<u64, ProviderError>;

    /// Names of installed printers, unfiltered.
    async fn installed_printers(&self) -> Result<Vec<String>, ProviderError>;
}

/// One queued job as seen by the provider.
#[derive(Debug, Clone)]
pub struct JobRecord {
    /// Name of the queue the job sits in.
    pub queue: String,
}

/// In-memory provider over a mutable job table.
///
/// Counts jobs whose queue name *contains* the requested printer name,
/// mirroring the substring match the production lookup performs. Known
/// limitation carried over deliberately: when one configured printer's
/// name is a substring of another's, jobs can be counted twice.
#[derive(Default)]
pub struct JobTableProvider {
    printers: Mutex<Vec<String>>,
    jobs: Mutex<Vec<JobRecord>>,
    fail_queries: Mutex<Vec<String>>,
    enumeration_down: Mutex<bool>,
}

impl JobTableProvider {
    pub fn new() -> Arc<Self> {
        Arc::new(Self::default())
    }

    pub fn set_printers(&self, printers: Vec<String>) {
        *self.printers.lock() = printers;
    }

    pub fn set_jobs(&self, jobs: Vec<JobRecord>) {
        *self.jobs.lock() = jobs;
    }

    /// Push one job onto the table.
    pub fn enqueue(&self, queue: &str) {
        self.jobs.lock().push(JobRecord { queue: queue.to_string() });
    }

    /// Make `queue_length` fail for the given printer name.
    pub fn fail_queries_for(&self, printer: &str) {
        self.fail_queries.lock().push(printer.to_string());
    }

    /// Make `installed_printers` fail.
    pub fn fail_enumeration(&self) {
        *self.enumeration_down.lock() = true;
    }
}

#[async_trait]
impl PrintProvider for JobTableProvider {
    async fn queue_length(&self, printer: &str) -> Result<u64, ProviderError> {
        if self.fail_queries.lock().iter().any(|p| p == printer) {
            return Err(ProviderError::Query(format!("injected failure for '{printer}'")));
        }
        let count = self.jobs.lock().iter().filter(|job| job.queue.contains(printer)).count();
        Ok(count as u64)
    }

    async fn installed_printers(&self) -> Result<Vec<String>, ProviderError> {
        if *self.enumeration_down.lock() {
            return Err(ProviderError::Query("injected enumeration failure".into()));
        }
        Ok(self.printers.lock().clone())
    }
}

#[cfg(test)]
#[path = "provider_tests.rs"]
mod tests;
