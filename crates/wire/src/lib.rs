// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! Wire protocols for the print queue monitor.
//!
//! Both services speak newline-terminated UTF-8 text with no escaping and
//! no length prefix. The agent protocol is verb-prefixed
//! (`SetPrinters:…`); the gateway protocol is `;`-separated with the verb
//! first (`SET_SETTINGS;…`).

// Allow panic!/unwrap/expect in test code
#![cfg_attr(test, allow(clippy::panic))]
#![cfg_attr(test, allow(clippy::unwrap_used))]
#![cfg_attr(test, allow(clippy::expect_used))]

mod agent;
mod gateway;
mod line;

pub use agent::{AgentCommand, AgentReply, CommandError};
pub use gateway::{GatewayReply, GatewayRequest, Settings};
pub use line::{read_line, write_line, ProtocolError, MAX_LINE_BYTES};
