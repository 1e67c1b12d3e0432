// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! pqm-agentd: the monitoring agent daemon.

use std::sync::Arc;

use tracing::{error, info};
use tracing_subscriber::EnvFilter;

use pqm_agent::{env, Agent, AgentOptions};
use pqm_core::{FileReportSink, LpstatProvider, MonitorConfig};

#[tokio::main]
async fn main() -> std::process::ExitCode {
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::try_from_default_env().unwrap_or_else(|_| "info".into()))
        .init();

    let Some(report_path) = env::report_path() else {
        error!("cannot resolve a state directory (set PQM_STATE_DIR or HOME)");
        return std::process::ExitCode::FAILURE;
    };
    if let Some(parent) = report_path.parent() {
        if let Err(e) = std::fs::create_dir_all(parent) {
            error!("cannot create state directory {}: {e}", parent.display());
            return std::process::ExitCode::FAILURE;
        }
    }

    let mut config = MonitorConfig::default();
    // Invariant of poll_interval(): always positive
    let _ = config.set_interval_secs(env::poll_interval().as_secs_f64());

    let opts = AgentOptions {
        bind_addr: env::bind_addr(),
        provider: Arc::new(LpstatProvider::new()),
        report: Arc::new(FileReportSink::new(&report_path)),
        config,
        write_timeout: env::ipc_timeout(),
    };

    let handle = match Agent::spawn(opts).await {
        Ok(handle) => handle,
        Err(e) => {
            error!("agent startup failed: {e}");
            return std::process::ExitCode::FAILURE;
        }
    };
    info!(report = %report_path.display(), "agent ready");

    if let Err(e) = tokio::signal::ctrl_c().await {
        error!("signal handler failed: {e}");
    }
    info!("shutdown requested");
    handle.shutdown().await;
    std::process::ExitCode::SUCCESS
}
