// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! Short-lived relay connections from the gateway to the agent.
//!
//! The gateway never holds a standing agent connection: each settings
//! update or query opens a fresh connection, uses it, and drops it. Every
//! connect, read, and write is bounded by the relay timeout, and any
//! failure surfaces as an error the dispatcher turns into an `ERROR:`
//! reply — never a hang, never a silently half-applied update.

use std::net::SocketAddr;
use std::time::Duration;

use thiserror::Error;
use tokio::io::BufReader;
use tokio::net::TcpStream;

use pqm_wire::{read_line, write_line, AgentCommand, AgentReply, ProtocolError, Settings};

/// Errors from relaying to the agent.
#[derive(Debug, Error)]
pub enum RelayError {
    #[error("agent unreachable at {0}: {1}")]
    Unreachable(SocketAddr, #[source] std::io::Error),

    #[error("timed out connecting to agent at {0}")]
    ConnectTimeout(SocketAddr),

    #[error("{step} failed: {source}")]
    Protocol {
        step: &'static str,
        #[source]
        source: ProtocolError,
    },

    #[error("{step} rejected by agent: {reply}")]
    Refused { step: &'static str, reply: String },

    #[error("agent closed the connection during {step}")]
    ClosedEarly { step: &'static str },
}

struct RelayConn {
    reader: BufReader<tokio::net::tcp::OwnedReadHalf>,
    writer: tokio::net::tcp::OwnedWriteHalf,
    timeout: Duration,
}

impl RelayConn {
    async fn open(agent_addr: SocketAddr, timeout: Duration) -> Result<Self, RelayError> {
        let connect = TcpStream::connect(agent_addr);
        let stream = tokio::time::timeout(timeout, connect)
            .await
            .map_err(|_| RelayError::ConnectTimeout(agent_addr))?
            .map_err(|e| RelayError::Unreachable(agent_addr, e))?;
        let (read_half, write_half) = stream.into_split();
        Ok(Self { reader: BufReader::new(read_half), writer: write_half, timeout })
    }

    /// Send one command line and read the one reply line for it.
    async fn exchange(&mut self, step: &'static str, line: &str) -> Result<String, RelayError> {
        write_line(&mut self.writer, line, Some(self.timeout))
            .await
            .map_err(|source| RelayError::Protocol { step, source })?;
        match read_line(&mut self.reader, Some(self.timeout)).await {
            Ok(Some(reply)) => Ok(reply),
            Ok(None) => Err(RelayError::ClosedEarly { step }),
            Err(source) => Err(RelayError::Protocol { step, source }),
        }
    }
}

/// Apply a settings document to the agent, strictly in order:
/// `SetPrinters` first, and only after its `OK:` ack, `SetInterval`.
///
/// If either step's reply does not begin with `OK:` the whole operation
/// aborts and no further sub-step is attempted. The two steps are not
/// atomic on the agent side: a failure after a successful `SetPrinters`
/// leaves the new printer list with the old interval. Known limitation,
/// kept as-is.
pub async fn apply_settings(
    agent_addr: SocketAddr,
    settings: &Settings,
    timeout: Duration,
) -> Result<(), RelayError> {
    let mut conn = RelayConn::open(agent_addr, timeout).await?;

    let step = "SetPrinters";
    let line = AgentCommand::SetPrinters(settings.printers.clone()).encode();
    let reply = conn.exchange(step, &line).await?;
    if !AgentReply::line_is_ok(&reply) {
        return Err(RelayError::Refused { step, reply });
    }

    let step = "SetInterval";
    let line = AgentCommand::SetInterval(settings.interval).encode();
    let reply = conn.exchange(step, &line).await?;
    if !AgentReply::line_is_ok(&reply) {
        return Err(RelayError::Refused { step, reply });
    }

    Ok(())
}

/// Forward a queue-length query to the agent and return its reply line
/// verbatim (`QUEUE_LENGTH:<n>`).
pub async fn query_queue_length(
    agent_addr: SocketAddr,
    timeout: Duration,
) -> Result<String, RelayError> {
    let mut conn = RelayConn::open(agent_addr, timeout).await?;
    conn.exchange("GetCountQueue", &AgentCommand::GetQueueLength.encode()).await
}

#[cfg(test)]
#[path = "relay_tests.rs"]
mod tests;
