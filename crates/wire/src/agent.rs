// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! Agent command vocabulary.
//!
//! Requests are verb-prefixed lines: `SetPrinters:<json list>`,
//! `SetInterval:<decimal seconds>`, `GetCountQueue:`. Replies are
//! `OK:`/`ERROR:` lines, or `QUEUE_LENGTH:<n>` for queue queries.

use thiserror::Error;

/// A command line that failed to parse.
///
/// `BadPrinters`/`BadInterval` carry the reason so the handler can answer
/// the verb-specific `ERROR:` reply instead of `ERROR:UnknownCommand`.
#[derive(Debug, Error, PartialEq)]
pub enum CommandError {
    #[error("unknown command")]
    UnknownCommand,

    #[error("printer list payload: {0}")]
    BadPrinters(String),

    #[error("interval payload: {0}")]
    BadInterval(String),
}

/// Command from a client (or the gateway relay) to the agent.
#[derive(Debug, Clone, PartialEq)]
pub enum AgentCommand {
    /// Replace the configured printer list.
    SetPrinters(Vec<String>),
    /// Replace the poll interval, in seconds.
    SetInterval(f64),
    /// Read the latest aggregate queue length.
    GetQueueLength,
}

impl AgentCommand {
    /// Parse one protocol line.
    pub fn parse(line: &str) -> Result<Self, CommandError> {
        if let Some(payload) = line.strip_prefix("SetPrinters:") {
            let printers: Vec<String> = serde_json::from_str(payload)
                .map_err(|e| CommandError::BadPrinters(e.to_string()))?;
            return Ok(AgentCommand::SetPrinters(printers));
        }
        if let Some(payload) = line.strip_prefix("SetInterval:") {
            let secs: f64 = payload
                .trim()
                .parse()
                .map_err(|_| CommandError::BadInterval(format!("not a number: '{payload}'")))?;
            return Ok(AgentCommand::SetInterval(secs));
        }
        if line.starts_with("GetCountQueue:") {
            return Ok(AgentCommand::GetQueueLength);
        }
        Err(CommandError::UnknownCommand)
    }

    /// Encode as one protocol line (client side).
    pub fn encode(&self) -> String {
        match self {
            AgentCommand::SetPrinters(printers) => {
                // Vec<String> serialization cannot fail
                let payload = serde_json::to_string(printers).unwrap_or_default();
                format!("SetPrinters:{payload}")
            }
            AgentCommand::SetInterval(secs) => format!("SetInterval:{secs}"),
            AgentCommand::GetQueueLength => "GetCountQueue:".to_string(),
        }
    }
}

/// Reply from the agent, one line per command.
#[derive(Debug, Clone, PartialEq)]
pub enum AgentReply {
    PrintersSet,
    IntervalSet,
    QueueLength(u64),
    PrintersNotSet(String),
    IntervalNotSet(String),
    UnknownCommand,
}

impl AgentReply {
    /// Encode as one protocol line.
    pub fn encode(&self) -> String {
        match self {
            AgentReply::PrintersSet => "OK:PrintersSet".to_string(),
            AgentReply::IntervalSet => "OK:IntervalSet".to_string(),
            AgentReply::QueueLength(n) => format!("QUEUE_LENGTH:{n}"),
            AgentReply::PrintersNotSet(reason) => format!("ERROR:PrintersNotSet - {reason}"),
            AgentReply::IntervalNotSet(reason) => format!("ERROR:IntervalNotSet - {reason}"),
            AgentReply::UnknownCommand => "ERROR:UnknownCommand".to_string(),
        }
    }

    /// Whether the line acknowledges success. The relay gates each
    /// sub-step of a settings update on this prefix.
    pub fn line_is_ok(line: &str) -> bool {
        line.starts_with("OK:")
    }
}

#[cfg(test)]
#[path = "agent_tests.rs"]
mod tests;
