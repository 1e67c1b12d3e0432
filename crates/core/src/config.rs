// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! Monitoring configuration owned by the agent.

use std::time::Duration;

use thiserror::Error;

/// Poll interval used until a client configures one.
pub const DEFAULT_INTERVAL: Duration = Duration::from_secs(60);

/// Errors from configuration updates.
#[derive(Debug, Error, PartialEq)]
pub enum ConfigError {
    #[error("interval must be greater than zero, got {0}")]
    NonPositiveInterval(f64),

    #[error("interval must be a finite number")]
    NonFiniteInterval,
}

/// The agent's monitoring configuration: which printers to poll and how often.
///
/// Owned exclusively by the agent behind the shared state lock. The printer
/// list is replaced wholesale on a valid `SetPrinters`; a rejected update
/// leaves the previous values in force.
#[derive(Debug, Clone, PartialEq)]
pub struct MonitorConfig {
    /// Printer names to poll, in configured order. May be empty.
    pub printers: Vec<String>,
    /// Time between poll cycles. Always strictly positive.
    interval: Duration,
}

impl Default for MonitorConfig {
    fn default() -> Self {
        Self { printers: Vec::new(), interval: DEFAULT_INTERVAL }
    }
}

impl MonitorConfig {
    pub fn new(printers: Vec<String>, interval: Duration) -> Self {
        Self { printers, interval }
    }

    pub fn interval(&self) -> Duration {
        self.interval
    }

    /// Replace the poll interval from a decimal seconds value.
    ///
    /// Non-finite and non-positive values are rejected without touching the
    /// current interval. The new value takes effect at the poller's next
    /// scheduling decision, never retroactively.
    pub fn set_interval_secs(&mut self, secs: f64) -> Result<(), ConfigError> {
        if !secs.is_finite() {
            return Err(ConfigError::NonFiniteInterval);
        }
        if secs <= 0.0 {
            return Err(ConfigError::NonPositiveInterval(secs));
        }
        self.interval = Duration::from_secs_f64(secs);
        Ok(())
    }

    /// Replace the printer list in one step.
    pub fn set_printers(&mut self, printers: Vec<String>) {
        self.printers = printers;
    }
}

#[cfg(test)]
#[path = "config_tests.rs"]
mod tests;
