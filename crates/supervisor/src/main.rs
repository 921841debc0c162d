// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! orgloop-supervisor: forks `orgloopd` and restarts it on abnormal exit.

use std::path::PathBuf;

use orgloop_supervisor::{ChildSpec, Supervisor};
use tracing::error;
use tracing_subscriber::{fmt, prelude::*, EnvFilter};

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    if let Some(arg) = std::env::args().nth(1) {
        match arg.as_str() {
            "--version" | "-V" => {
                println!("orgloop-supervisor {}", env!("CARGO_PKG_VERSION"));
                return Ok(());
            }
            "--help" | "-h" => {
                println!("orgloop-supervisor {}", env!("CARGO_PKG_VERSION"));
                println!("Forks orgloopd and restarts it on abnormal exit.");
                println!();
                println!("USAGE:");
                println!("    orgloop-supervisor");
                println!();
                println!("ORGLOOP_DAEMON_BIN overrides the orgloopd binary path.");
                println!("ORGLOOP_SUPERVISOR_PID_FILE overrides ~/.orgloop/supervisor.pid.");
                return Ok(());
            }
            other => {
                eprintln!("error: unexpected argument '{other}'");
                eprintln!("usage: orgloop-supervisor [--help | --version]");
                std::process::exit(1);
            }
        }
    }

    setup_logging();

    let pid_file = match std::env::var("ORGLOOP_SUPERVISOR_PID_FILE") {
        Ok(path) => PathBuf::from(path),
        Err(_) => orgloop_supervisor::pidfile::default_path()?,
    };

    let child_spec = ChildSpec::new(find_orgloopd_binary());
    let mut supervisor = Supervisor::new(child_spec, pid_file);

    if let Err(e) = supervisor.run().await {
        error!(error = %e, "supervisor exiting with an error");
        return Err(Box::new(e));
    }
    Ok(())
}

fn find_orgloopd_binary() -> PathBuf {
    if let Ok(path) = std::env::var("ORGLOOP_DAEMON_BIN") {
        return PathBuf::from(path);
    }

    if let Ok(current_exe) = std::env::current_exe() {
        if let Some(dir) = current_exe.parent() {
            let sibling = dir.join("orgloopd");
            if sibling.exists() {
                return sibling;
            }
        }
    }

    PathBuf::from("orgloopd")
}

fn setup_logging() {
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"));
    tracing_subscriber::registry()
        .with(filter)
        .with(fmt::layer().with_writer(std::io::stderr))
        .init();
}
