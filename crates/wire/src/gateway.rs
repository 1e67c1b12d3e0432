// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! Gateway command vocabulary: `;`-separated fields, verb first.

use serde::{Deserialize, Serialize};

use crate::agent::CommandError;

/// Settings document carried by `SET_SETTINGS`.
///
/// Field names are PascalCase on the wire:
/// `{"Printers":["A","B"],"Interval":30}`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "PascalCase")]
pub struct Settings {
    pub printers: Vec<String>,
    pub interval: f64,
}

/// Request from a client to the gateway.
#[derive(Debug, Clone, PartialEq)]
pub enum GatewayRequest {
    /// Enumerate installed printers (minus suppressed virtual ones).
    GetPrinters,
    /// Apply new monitor settings; payload is the raw JSON document.
    SetSettings(String),
    /// Pass-through queue length query.
    GetQueueLength,
}

impl GatewayRequest {
    /// Parse one request line.
    ///
    /// The payload is split off at the first `;` only, so a JSON document
    /// containing `;` inside a printer name survives intact.
    pub fn parse(line: &str) -> Result<Self, CommandError> {
        let (verb, payload) = match line.split_once(';') {
            Some((verb, rest)) => (verb, Some(rest)),
            None => (line, None),
        };
        match verb {
            "GET_PRINTERS" => Ok(GatewayRequest::GetPrinters),
            "SET_SETTINGS" => {
                Ok(GatewayRequest::SetSettings(payload.unwrap_or_default().to_string()))
            }
            "GetQueueLength" => Ok(GatewayRequest::GetQueueLength),
            _ => Err(CommandError::UnknownCommand),
        }
    }

    /// Encode as one request line (client side).
    pub fn encode(&self) -> String {
        match self {
            GatewayRequest::GetPrinters => "GET_PRINTERS".to_string(),
            GatewayRequest::SetSettings(payload) => format!("SET_SETTINGS;{payload}"),
            GatewayRequest::GetQueueLength => "GetQueueLength".to_string(),
        }
    }
}

/// Reply from the gateway, one line per request.
#[derive(Debug, Clone, PartialEq)]
pub enum GatewayReply {
    /// Printer names joined by `;`.
    Printers(Vec<String>),
    /// Success with a free-text message.
    Ok(String),
    /// Failure with a free-text message.
    Error(String),
    /// Exact `ERROR:UnknownCommand` line for unrecognized verbs.
    UnknownCommand,
    /// A line forwarded verbatim from the agent (e.g. `QUEUE_LENGTH:3`).
    Forwarded(String),
}

impl GatewayReply {
    pub fn encode(&self) -> String {
        match self {
            GatewayReply::Printers(names) => names.join(";"),
            GatewayReply::Ok(message) => format!("OK: {message}"),
            GatewayReply::Error(message) => format!("ERROR: {message}"),
            GatewayReply::UnknownCommand => "ERROR:UnknownCommand".to_string(),
            GatewayReply::Forwarded(line) => line.clone(),
        }
    }
}

#[cfg(test)]
#[path = "gateway_tests.rs"]
mod tests;
