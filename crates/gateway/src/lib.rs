// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

// Allow panic!/unwrap/expect in test code
#![cfg_attr(test, allow(clippy::panic))]
#![cfg_attr(test, allow(clippy::unwrap_used))]
#![cfg_attr(test, allow(clippy::expect_used))]

//! pqm-gateway: the client-facing gateway service.
//!
//! Serves the `;`-separated client protocol over TCP. Read-only commands
//! query the print provider directly; configuration changes are relayed
//! to the agent over a short-lived connection, two strictly ordered
//! sub-steps that must both acknowledge `OK:` before the client sees
//! success.

pub mod env;
mod lifecycle;
mod listener;
pub mod relay;

pub use lifecycle::{Gateway, GatewayHandle, GatewayOptions, LifecycleError};
pub use listener::SUPPRESSED_PRINTERS;
pub use relay::RelayError;
