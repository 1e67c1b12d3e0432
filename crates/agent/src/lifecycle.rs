// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! Agent assembly: bind, spawn listener and poller, cooperative shutdown.

use std::net::SocketAddr;
use std::sync::Arc;
use std::time::Duration;

use thiserror::Error;
use tokio::net::TcpListener;
use tokio::task::JoinHandle;
use tokio_util::sync::CancellationToken;
use tokio_util::task::TaskTracker;
use tracing::info;

use pqm_core::{Clock, MonitorConfig, MonitorState, PrintProvider, ReportSink, SharedState, SystemClock};

use crate::listener::{ListenCtx, Listener};
use crate::poller::Poller;

/// Errors from agent startup.
#[derive(Debug, Error)]
pub enum LifecycleError {
    #[error("failed to bind {0}: {1}")]
    BindFailed(SocketAddr, #[source] std::io::Error),
}

/// Everything needed to assemble an agent.
pub struct AgentOptions {
    /// Address to listen on; port 0 picks an ephemeral port (tests).
    pub bind_addr: SocketAddr,
    pub provider: Arc<dyn PrintProvider>,
    pub report: Arc<dyn ReportSink>,
    pub config: MonitorConfig,
    /// Bound on reply writes.
    pub write_timeout: Duration,
}

/// The agent service.
pub struct Agent;

/// Handle to a running agent: address, shared state, shutdown.
pub struct AgentHandle {
    local_addr: SocketAddr,
    state: SharedState,
    shutdown: CancellationToken,
    tasks: Vec<JoinHandle<()>>,
    connections: TaskTracker,
}

impl Agent {
    /// Bind the listener, spawn the accept loop and the poller.
    pub async fn spawn(opts: AgentOptions) -> Result<AgentHandle, LifecycleError> {
        Self::spawn_with_clock(opts, Arc::new(SystemClock)).await
    }

    pub async fn spawn_with_clock(
        opts: AgentOptions,
        clock: Arc<dyn Clock>,
    ) -> Result<AgentHandle, LifecycleError> {
        let tcp = TcpListener::bind(opts.bind_addr)
            .await
            .map_err(|e| LifecycleError::BindFailed(opts.bind_addr, e))?;
        let local_addr = tcp.local_addr().map_err(|e| LifecycleError::BindFailed(opts.bind_addr, e))?;

        let state = MonitorState::shared(opts.config);
        let shutdown = CancellationToken::new();
        let connections = TaskTracker::new();

        let listener = Listener::new(
            tcp,
            Arc::new(ListenCtx {
                state: Arc::clone(&state),
                write_timeout: opts.write_timeout,
                shutdown: shutdown.clone(),
                tracker: connections.clone(),
            }),
        );
        let poller = Poller {
            state: Arc::clone(&state),
            provider: opts.provider,
            report: opts.report,
            clock,
            shutdown: shutdown.clone(),
        };

        let tasks = vec![tokio::spawn(listener.run()), tokio::spawn(poller.run())];
        info!(%local_addr, "agent listening");

        Ok(AgentHandle { local_addr, state, shutdown, tasks, connections })
    }
}

impl AgentHandle {
    pub fn local_addr(&self) -> SocketAddr {
        self.local_addr
    }

    /// Shared config/snapshot store (read-only inspection in tests).
    pub fn state(&self) -> &SharedState {
        &self.state
    }

    /// Stop accepting connections and scheduling cycles, then wait for
    /// the listener, the poller, and every connection task to finish.
    /// Open connections close after at most one in-flight command
    /// completes; none outlives this call.
    pub async fn shutdown(self) {
        self.shutdown.cancel();
        for task in self.tasks {
            let _ = task.await;
        }
        // The listener is gone, so no further tasks can be spawned
        self.connections.close();
        self.connections.wait().await;
    }
}

#[cfg(test)]
#[path = "lifecycle_tests.rs"]
mod tests;
