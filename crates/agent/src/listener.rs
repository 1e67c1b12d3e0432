// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! Listener task for the agent command protocol.
//!
//! Accepts connections until shutdown and handles each in its own spawned
//! task. Connections carry many request/reply pairs sequentially; a bad
//! command gets an inline `ERROR:` reply and the connection stays open.
//! Connection tasks are unbounded in count — there is no backpressure or
//! connection limit (known design risk, kept as-is).

use std::sync::Arc;
use std::time::Duration;

use tokio::io::{AsyncRead, AsyncWrite, BufReader};
use tokio::net::TcpListener;
use tokio_util::sync::CancellationToken;
use tokio_util::task::TaskTracker;
use tracing::{debug, error, info, warn};

use pqm_core::SharedState;
use pqm_wire::{read_line, write_line, AgentCommand, AgentReply, CommandError, ProtocolError};

/// Shared context for all agent connection handlers.
pub(crate) struct ListenCtx {
    pub state: SharedState,
    /// Bound on reply writes; reads wait indefinitely between commands.
    pub write_timeout: Duration,
    /// Observed by the accept loop and every open connection.
    pub shutdown: CancellationToken,
    /// Tracks connection tasks so shutdown can wait for them.
    pub tracker: TaskTracker,
}

/// Listener task accepting agent protocol connections.
pub(crate) struct Listener {
    tcp: TcpListener,
    ctx: Arc<ListenCtx>,
}

impl Listener {
    pub fn new(tcp: TcpListener, ctx: Arc<ListenCtx>) -> Self {
        Self { tcp, ctx }
    }

    /// Run the accept loop until shutdown, spawning a task per connection.
    pub async fn run(self) {
        loop {
            tokio::select! {
                _ = self.ctx.shutdown.cancelled() => {
                    info!("agent listener shutting down");
                    break;
                }
                result = self.tcp.accept() => {
                    match result {
                        Ok((stream, addr)) => {
                            debug!("connection from {addr}");
                            let ctx = Arc::clone(&self.ctx);
                            self.ctx.tracker.spawn(async move {
                                let (reader, writer) = stream.into_split();
                                if let Err(e) = handle_connection(reader, writer, &ctx).await {
                                    log_connection_error(e);
                                }
                            });
                        }
                        Err(e) => error!("accept error: {e}"),
                    }
                }
            }
        }
    }
}

fn log_connection_error(e: ProtocolError) {
    match e {
        ProtocolError::Truncated => debug!("client disconnected mid-line"),
        ProtocolError::Timeout => warn!("connection timeout"),
        _ => error!("connection error: {e}"),
    }
}

/// Handle one client connection: read a command line, answer, repeat.
///
/// Ends on orderly EOF (`Ok`), shutdown, or an I/O error, none of which
/// affects other connections or the listener. A command already being
/// answered when shutdown fires still gets its reply.
async fn handle_connection<R, W>(
    reader: R,
    mut writer: W,
    ctx: &ListenCtx,
) -> Result<(), ProtocolError>
where
    R: AsyncRead + Unpin,
    W: AsyncWrite + Unpin,
{
    let mut reader = BufReader::new(reader);
    loop {
        let line = tokio::select! {
            _ = ctx.shutdown.cancelled() => {
                debug!("closing connection on shutdown");
                return Ok(());
            }
            line = read_line(&mut reader, None) => line?,
        };
        let Some(line) = line else {
            debug!("client closed connection");
            return Ok(());
        };
        debug!(command = %line, "received command");
        let reply = dispatch(&line, ctx);
        write_line(&mut writer, &reply.encode(), Some(ctx.write_timeout)).await?;
    }
}

/// Process one command against the shared state.
///
/// Every failure maps to an `ERROR:` reply; nothing here can take down
/// the connection loop. Rejected updates leave the previous configuration
/// in force.
pub(crate) fn dispatch(line: &str, ctx: &ListenCtx) -> AgentReply {
    match AgentCommand::parse(line) {
        Ok(AgentCommand::SetPrinters(printers)) => {
            let mut state = ctx.state.lock();
            state.config.set_printers(printers);
            info!(printers = ?state.config.printers, "printer list updated");
            AgentReply::PrintersSet
        }
        Ok(AgentCommand::SetInterval(secs)) => {
            let mut state = ctx.state.lock();
            match state.config.set_interval_secs(secs) {
                Ok(()) => {
                    info!(interval_secs = secs, "poll interval updated");
                    AgentReply::IntervalSet
                }
                Err(e) => {
                    warn!("interval rejected: {e}");
                    AgentReply::IntervalNotSet(e.to_string())
                }
            }
        }
        Ok(AgentCommand::GetQueueLength) => {
            let total = ctx.state.lock().queue_length();
            AgentReply::QueueLength(total)
        }
        Err(CommandError::BadPrinters(reason)) => {
            warn!("printer list rejected: {reason}");
            AgentReply::PrintersNotSet(reason)
        }
        Err(CommandError::BadInterval(reason)) => {
            warn!("interval rejected: {reason}");
            AgentReply::IntervalNotSet(reason)
        }
        Err(CommandError::UnknownCommand) => {
            warn!(command = %line, "unknown command");
            AgentReply::UnknownCommand
        }
    }
}

#[cfg(test)]
#[path = "listener_tests.rs"]
mod tests;
