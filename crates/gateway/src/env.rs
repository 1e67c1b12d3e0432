// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! Centralized environment variable access for the gateway binary.

use std::net::{IpAddr, Ipv4Addr, SocketAddr};
use std::time::Duration;

/// Loopback-only by default; `PQM_GATEWAY_PORT` overrides the port.
pub fn bind_addr() -> SocketAddr {
    let port = std::env::var("PQM_GATEWAY_PORT")
        .ok()
        .and_then(|s| s.parse::<u16>().ok())
        .unwrap_or(8005);
    SocketAddr::new(IpAddr::V4(Ipv4Addr::LOCALHOST), port)
}

/// Where the agent's command endpoint lives.
pub fn agent_addr() -> SocketAddr {
    std::env::var("PQM_AGENT_ADDR")
        .ok()
        .and_then(|s| s.parse().ok())
        .unwrap_or_else(|| SocketAddr::new(IpAddr::V4(Ipv4Addr::LOCALHOST), 13000))
}

/// Bound on each relay connect/read/write so a stalled agent cannot
/// block a gateway connection handler indefinitely.
pub fn relay_timeout() -> Duration {
    std::env::var("PQM_RELAY_TIMEOUT_MS")
        .ok()
        .and_then(|s| s.parse::<u64>().ok())
        .map(Duration::from_millis)
        .unwrap_or(Duration::from_secs(10))
}

/// Write timeout for replies on gateway connections.
pub fn ipc_timeout() -> Duration {
    std::env::var("PQM_IPC_TIMEOUT_MS")
        .ok()
        .and_then(|s| s.parse::<u64>().ok())
        .map(Duration::from_millis)
        .unwrap_or(Duration::from_secs(5))
}
