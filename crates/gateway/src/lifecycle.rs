// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! Gateway assembly: bind, spawn the listener, cooperative shutdown.

use std::net::SocketAddr;
use std::sync::Arc;
use std::time::Duration;

use thiserror::Error;
use tokio::net::TcpListener;
use tokio::task::JoinHandle;
use tokio_util::sync::CancellationToken;
use tokio_util::task::TaskTracker;
use tracing::info;

use pqm_core::PrintProvider;

use crate::listener::{GatewayCtx, Listener};

/// Errors from gateway startup.
#[derive(Debug, Error)]
pub enum LifecycleError {
    #[error("failed to bind {0}: {1}")]
    BindFailed(SocketAddr, #[source] std::io::Error),
}

/// Everything needed to assemble a gateway.
pub struct GatewayOptions {
    /// Address to listen on; port 0 picks an ephemeral port (tests).
    pub bind_addr: SocketAddr,
    /// The agent's command endpoint.
    pub agent_addr: SocketAddr,
    pub provider: Arc<dyn PrintProvider>,
    /// Bound on each relay connect/read/write.
    pub relay_timeout: Duration,
    /// Bound on reply writes to gateway clients.
    pub write_timeout: Duration,
}

/// The gateway service.
pub struct Gateway;

/// Handle to a running gateway.
pub struct GatewayHandle {
    local_addr: SocketAddr,
    shutdown: CancellationToken,
    task: JoinHandle<()>,
    connections: TaskTracker,
}

impl Gateway {
    /// Bind the listener and spawn the accept loop.
    pub async fn spawn(opts: GatewayOptions) -> Result<GatewayHandle, LifecycleError> {
        let tcp = TcpListener::bind(opts.bind_addr)
            .await
            .map_err(|e| LifecycleError::BindFailed(opts.bind_addr, e))?;
        let local_addr =
            tcp.local_addr().map_err(|e| LifecycleError::BindFailed(opts.bind_addr, e))?;

        let shutdown = CancellationToken::new();
        let connections = TaskTracker::new();
        let ctx = Arc::new(GatewayCtx {
            provider: opts.provider,
            agent_addr: opts.agent_addr,
            relay_timeout: opts.relay_timeout,
            write_timeout: opts.write_timeout,
            shutdown: shutdown.clone(),
            tracker: connections.clone(),
        });
        let listener = Listener::new(tcp, ctx);
        let task = tokio::spawn(listener.run());
        info!(%local_addr, agent = %opts.agent_addr, "gateway listening");

        Ok(GatewayHandle { local_addr, shutdown, task, connections })
    }
}

impl GatewayHandle {
    pub fn local_addr(&self) -> SocketAddr {
        self.local_addr
    }

    /// Stop accepting connections and wait for the listener task and
    /// every connection task. Open connections close after at most one
    /// in-flight request completes; none outlives this call.
    pub async fn shutdown(self) {
        self.shutdown.cancel();
        let _ = self.task.await;
        // The listener is gone, so no further tasks can be spawned
        self.connections.close();
        self.connections.wait().await;
    }
}
