// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! Centralized environment variable access for the agent binary.

use std::net::{IpAddr, Ipv4Addr, SocketAddr};
use std::path::PathBuf;
use std::time::Duration;

/// Loopback-only by default; `PQM_AGENT_PORT` overrides the port.
pub fn bind_addr() -> SocketAddr {
    let port = std::env::var("PQM_AGENT_PORT")
        .ok()
        .and_then(|s| s.parse::<u16>().ok())
        .unwrap_or(13000);
    SocketAddr::new(IpAddr::V4(Ipv4Addr::LOCALHOST), port)
}

/// Write timeout for replies on agent connections.
pub fn ipc_timeout() -> Duration {
    std::env::var("PQM_IPC_TIMEOUT_MS")
        .ok()
        .and_then(|s| s.parse::<u64>().ok())
        .map(Duration::from_millis)
        .unwrap_or(Duration::from_secs(5))
}

/// Initial poll interval before any client configures one.
pub fn poll_interval() -> Duration {
    std::env::var("PQM_POLL_INTERVAL_SECS")
        .ok()
        .and_then(|s| s.parse::<u64>().ok())
        .filter(|secs| *secs > 0)
        .map(Duration::from_secs)
        .unwrap_or(pqm_core::DEFAULT_INTERVAL)
}

/// Resolve state directory: PQM_STATE_DIR > XDG_STATE_HOME/pqm > ~/.local/state/pqm
pub fn state_dir() -> Option<PathBuf> {
    if let Ok(dir) = std::env::var("PQM_STATE_DIR") {
        return Some(PathBuf::from(dir));
    }
    if let Ok(xdg) = std::env::var("XDG_STATE_HOME") {
        return Some(PathBuf::from(xdg).join("pqm"));
    }
    let home = std::env::var("HOME").ok()?;
    Some(PathBuf::from(home).join(".local/state/pqm"))
}

/// Path of the append-only report file.
pub fn report_path() -> Option<PathBuf> {
    Some(state_dir()?.join("report.txt"))
}
