// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

// Allow panic!/unwrap/expect in test code
#![cfg_attr(test, allow(clippy::panic))]
#![cfg_attr(test, allow(clippy::unwrap_used))]
#![cfg_attr(test, allow(clippy::expect_used))]

//! pqm-agent: the monitoring agent service.
//!
//! Owns the monitor configuration and the latest queue snapshot, runs the
//! background poller, and serves the line-based command protocol over TCP.

pub mod env;
mod lifecycle;
mod listener;
mod poller;

pub use lifecycle::{Agent, AgentHandle, AgentOptions, LifecycleError};
