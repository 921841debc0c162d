// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! orgloopd: the OrgLoop daemon binary.
//!
//! Loads its environment-derived configuration, sets up logging, opens the
//! durable event bus, and runs the runtime's main loop until a shutdown
//! signal arrives. The HTTP surface (webhook ingestion + control API) is
//! served alongside it, bound to loopback only.

use orgloop_runtime::{http, Runtime, RuntimeConfig, RuntimeError};
use std::net::{IpAddr, Ipv4Addr, SocketAddr};
use tracing::{error, info};
use tracing_subscriber::{fmt, prelude::*, EnvFilter};

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    if let Some(arg) = std::env::args().nth(1) {
        match arg.as_str() {
            "--version" | "-V" => {
                println!("orgloopd {}", env!("CARGO_PKG_VERSION"));
                return Ok(());
            }
            "--help" | "-h" => {
                println!("orgloopd {}", env!("CARGO_PKG_VERSION"));
                println!("OrgLoop runtime daemon.");
                println!();
                println!("USAGE:");
                println!("    orgloopd");
                println!();
                println!("Configured entirely through the environment: ORGLOOP_STATE_DIR,");
                println!("ORGLOOP_PORT, ORGLOOP_METRICS_PORT, ORGLOOP_DAEMON, ORGLOOP_SUPERVISED,");
                println!("ORGLOOP_HEARTBEAT_MS. See the crate docs for details.");
                return Ok(());
            }
            other => {
                eprintln!("error: unexpected argument '{other}'");
                eprintln!("usage: orgloopd [--help | --version]");
                std::process::exit(1);
            }
        }
    }

    let config = RuntimeConfig::from_env()?;
    let _log_guard = setup_logging(&config)?;

    info!(data_root = %config.data_root.display(), port = config.port, "starting orgloopd");

    let runtime = match Runtime::new(config.clone()) {
        Ok(runtime) => runtime,
        Err(e) => {
            error!(error = %e, "failed to start runtime");
            std::process::exit(1);
        }
    };

    let addr = SocketAddr::new(IpAddr::V4(Ipv4Addr::LOCALHOST), config.port);
    let listener = tokio::net::TcpListener::bind(addr).await?;
    let router = http::router(runtime.clone());
    let http_runtime = runtime.clone();
    tokio::spawn(async move {
        if let Err(e) = axum::serve(listener, router).await {
            error!(error = %e, "http server exited");
            http_runtime.request_stop();
        }
    });

    if let Some(metrics_port) = config.metrics_port {
        let metrics_addr = SocketAddr::new(IpAddr::V4(Ipv4Addr::LOCALHOST), metrics_port);
        let metrics_listener = tokio::net::TcpListener::bind(metrics_addr).await?;
        let metrics_router = http::metrics_router(runtime.metrics());
        tokio::spawn(async move {
            if let Err(e) = axum::serve(metrics_listener, metrics_router).await {
                error!(error = %e, "metrics server exited");
            }
        });
        info!(metrics_port, "metrics endpoint listening");
    }

    println!("READY");
    runtime.run().await?;

    info!("orgloopd stopped");
    Ok(())
}

fn setup_logging(
    config: &RuntimeConfig,
) -> Result<tracing_appender::non_blocking::WorkerGuard, RuntimeError> {
    std::fs::create_dir_all(config.logs_dir())?;
    let file_appender = tracing_appender::rolling::never(config.logs_dir(), "orgloopd.log");
    let (non_blocking, guard) = tracing_appender::non_blocking(file_appender);

    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"));
    tracing_subscriber::registry()
        .with(filter)
        .with(fmt::layer().with_writer(non_blocking))
        .with(fmt::layer().with_writer(std::io::stderr))
        .init();

    Ok(guard)
}
