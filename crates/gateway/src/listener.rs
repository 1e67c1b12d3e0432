// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! Listener and dispatcher for the client-facing gateway protocol.
//!
//! One spawned task per accepted connection, unbounded in count (known
//! design risk, kept as-is). Each request line gets exactly one reply
//! line, including failures: a relay error becomes an `ERROR:` reply,
//! never a dropped connection with no answer.

use std::net::SocketAddr;
use std::sync::Arc;
use std::time::Duration;

use tokio::io::{AsyncRead, AsyncWrite, BufReader};
use tokio::net::TcpListener;
use tokio_util::sync::CancellationToken;
use tokio_util::task::TaskTracker;
use tracing::{debug, error, info, warn};

use pqm_core::PrintProvider;
use pqm_wire::{
    read_line, write_line, GatewayReply, GatewayRequest, ProtocolError, Settings,
};

use crate::relay;

/// Virtual printers hidden from `GET_PRINTERS`, matched by substring.
pub const SUPPRESSED_PRINTERS: [&str; 3] =
    ["Microsoft Print to PDF", "Microsoft XPS Document Writer", "Send To OneNote"];

/// Shared context for all gateway connection handlers.
pub(crate) struct GatewayCtx {
    pub provider: Arc<dyn PrintProvider>,
    pub agent_addr: SocketAddr,
    pub relay_timeout: Duration,
    /// Bound on reply writes to gateway clients.
    pub write_timeout: Duration,
    /// Observed by the accept loop and every open connection.
    pub shutdown: CancellationToken,
    /// Tracks connection tasks so shutdown can wait for them.
    pub tracker: TaskTracker,
}

/// Listener task accepting gateway protocol connections.
pub(crate) struct Listener {
    tcp: TcpListener,
    ctx: Arc<GatewayCtx>,
}

impl Listener {
    pub fn new(tcp: TcpListener, ctx: Arc<GatewayCtx>) -> Self {
        Self { tcp, ctx }
    }

    pub async fn run(self) {
        loop {
            tokio::select! {
                _ = self.ctx.shutdown.cancelled() => {
                    info!("gateway listener shutting down");
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

/// Handle one client connection: read a request line, answer, repeat.
async fn handle_connection<R, W>(
    reader: R,
    mut writer: W,
    ctx: &GatewayCtx,
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
        debug!(request = %line, "received request");
        let reply = dispatch(&line, ctx).await;
        write_line(&mut writer, &reply.encode(), Some(ctx.write_timeout)).await?;
    }
}

/// Process one request line into exactly one reply.
pub(crate) async fn dispatch(line: &str, ctx: &GatewayCtx) -> GatewayReply {
    match GatewayRequest::parse(line) {
        Ok(GatewayRequest::GetPrinters) => handle_get_printers(ctx).await,
        Ok(GatewayRequest::SetSettings(payload)) => handle_set_settings(&payload, ctx).await,
        Ok(GatewayRequest::GetQueueLength) => {
            match relay::query_queue_length(ctx.agent_addr, ctx.relay_timeout).await {
                Ok(reply) => GatewayReply::Forwarded(reply),
                Err(e) => {
                    warn!("queue length relay failed: {e}");
                    GatewayReply::Error(e.to_string())
                }
            }
        }
        Err(_) => {
            warn!(request = %line, "unknown command");
            GatewayReply::UnknownCommand
        }
    }
}

/// Enumerate installed printers, minus the suppressed virtual ones.
async fn handle_get_printers(ctx: &GatewayCtx) -> GatewayReply {
    match ctx.provider.installed_printers().await {
        Ok(names) => {
            let physical = names
                .into_iter()
                .filter(|name| !SUPPRESSED_PRINTERS.iter().any(|veto| name.contains(veto)))
                .collect();
            GatewayReply::Printers(physical)
        }
        Err(e) => {
            warn!("printer enumeration failed: {e}");
            GatewayReply::Error(format!("cannot list printers: {e}"))
        }
    }
}

/// Decode a settings document and relay it to the agent.
async fn handle_set_settings(payload: &str, ctx: &GatewayCtx) -> GatewayReply {
    let settings: Settings = match serde_json::from_str(payload) {
        Ok(settings) => settings,
        Err(e) => {
            warn!("settings payload rejected: {e}");
            return GatewayReply::Error(format!("invalid settings: {e}"));
        }
    };
    match relay::apply_settings(ctx.agent_addr, &settings, ctx.relay_timeout).await {
        Ok(()) => GatewayReply::Ok("settings applied".to_string()),
        Err(e) => {
            warn!("settings relay failed: {e}");
            GatewayReply::Error(e.to_string())
        }
    }
}

#[cfg(test)]
#[path = "listener_tests.rs"]
mod tests;
