// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! CUPS-backed provider shelling out to `lpstat`.
//!
//! Used by the shipped binaries; tests use [`crate::JobTableProvider`].
//! Matching follows the same substring policy as the in-memory provider:
//! a job belongs to a printer when its queue name contains the configured
//! printer name.

use async_trait::async_trait;
use tokio::process::Command;

use crate::provider::{PrintProvider, ProviderError};

/// Provider reading queue state from the CUPS `lpstat` utility.
#[derive(Debug, Clone, Default)]
pub struct LpstatProvider;

impl LpstatProvider {
    pub fn new() -> Self {
        Self
    }

    async fn lpstat(&self, arg: &str) -> Result<String, ProviderError> {
        let output = Command::new("lpstat").arg(arg).output().await?;
        if !output.status.success() {
            let stderr = String::from_utf8_lossy(&output.stderr);
            return Err(ProviderError::Query(format!(
                "lpstat {arg} exited with {}: {}",
                output.status,
                stderr.trim()
            )));
        }
        Ok(String::from_utf8_lossy(&output.stdout).into_owned())
    }
}

/// Queue name of one `lpstat -o` job line.
///
/// Job lines start with `<queue>-<jobid>`, e.g. `Office_HP-17`.
fn job_queue_name(line: &str) -> Option<&str> {
    let token = line.split_whitespace().next()?;
    let (queue, _jobid) = token.rsplit_once('-')?;
    Some(queue)
}

/// Printer name of one `lpstat -p` status line (`printer <name> is ...`).
fn printer_name(line: &str) -> Option<&str> {
    let rest = line.strip_prefix("printer ")?;
    rest.split_whitespace().next()
}

#[async_trait]
impl PrintProvider for LpstatProvider {
    async fn queue_length(&self, printer: &str) -> Result<u64, ProviderError> {
        let listing = self.lpstat("-o").await?;
        let count = listing
            .lines()
            .filter_map(job_queue_name)
            .filter(|queue| queue.contains(printer))
            .count();
        Ok(count as u64)
    }

    async fn installed_printers(&self) -> Result<Vec<String>, ProviderError> {
        let listing = self.lpstat("-p").await?;
        Ok(listing.lines().filter_map(printer_name).map(str::to_string).collect())
    }
}

#[cfg(test)]
#[path = "lpstat_tests.rs"]
mod tests;
