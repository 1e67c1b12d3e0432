// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! pqm-gatewayd: the client-facing gateway daemon.

use std::sync::Arc;

use tracing::{error, info};
use tracing_subscriber::EnvFilter;

use pqm_core::LpstatProvider;
use pqm_gateway::{env, Gateway, GatewayOptions};

#[tokio::main]
async fn main() -> std::process::ExitCode {
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::try_from_default_env().unwrap_or_else(|_| "info".into()))
        .init();

    let opts = GatewayOptions {
        bind_addr: env::bind_addr(),
        agent_addr: env::agent_addr(),
        provider: Arc::new(LpstatProvider::new()),
        relay_timeout: env::relay_timeout(),
        write_timeout: env::ipc_timeout(),
    };

    let handle = match Gateway::spawn(opts).await {
        Ok(handle) => handle,
        Err(e) => {
            error!("gateway startup failed: {e}");
            return std::process::ExitCode::FAILURE;
        }
    };
    info!("gateway ready");

    if let Err(e) = tokio::signal::ctrl_c().await {
        error!("signal handler failed: {e}");
    }
    info!("shutdown requested");
    handle.shutdown().await;
    std::process::ExitCode::SUCCESS
}
