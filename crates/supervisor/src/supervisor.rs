// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! The supervisor loop itself: fork the runtime as a child,
//! restart it on abnormal exit per [`RestartPolicy`], and tear it down
//! cleanly (SIGTERM, then SIGKILL after a grace period) on its own stop
//! signal.

use std::path::{Path, PathBuf};
use std::process::Stdio;
use std::time::Duration;

use orgloop_core::{Clock, SystemClock};
use tokio::process::{Child, Command};
use tokio::signal::unix::{signal, SignalKind};
use tokio::time::Instant as TokioInstant;
use tracing::{error, info, warn};

use crate::error::SupervisorError;
use crate::pidfile;
use crate::restart_policy::{RestartDecision, RestartPolicy, RestartPolicyConfig};

const SHUTDOWN_GRACE: Duration = Duration::from_secs(5);

/// What to run as the supervised child.
#[derive(Debug, Clone)]
pub struct ChildSpec {
    pub program: PathBuf,
    pub args: Vec<String>,
}

impl ChildSpec {
    pub fn new(program: impl Into<PathBuf>) -> Self {
        Self { program: program.into(), args: Vec::new() }
    }
}

pub struct Supervisor {
    child_spec: ChildSpec,
    restart_policy: RestartPolicy,
    pid_file: PathBuf,
    clock: SystemClock,
}

impl Supervisor {
    pub fn new(child_spec: ChildSpec, pid_file: PathBuf) -> Self {
        Self::with_policy(child_spec, pid_file, RestartPolicyConfig::default())
    }

    pub fn with_policy(child_spec: ChildSpec, pid_file: PathBuf, policy: RestartPolicyConfig) -> Self {
        Self {
            child_spec,
            restart_policy: RestartPolicy::new(policy),
            pid_file,
            clock: SystemClock,
        }
    }

    fn spawn_child(&self) -> Result<Child, SupervisorError> {
        Command::new(&self.child_spec.program)
            .args(&self.child_spec.args)
            .stdin(Stdio::null())
            .kill_on_drop(true)
            .spawn()
            .map_err(SupervisorError::Io)
    }

    /// Run until the child exits cleanly, a shutdown signal is received, or
    /// a crash loop is declared. Returns `Ok(())` on clean shutdown.
    pub async fn run(&mut self) -> Result<(), SupervisorError> {
        pidfile::write(&self.pid_file, std::process::id())?;
        let result = self.run_inner().await;
        pidfile::remove(&self.pid_file);
        result
    }

    async fn run_inner(&mut self) -> Result<(), SupervisorError> {
        let mut sigterm = signal(SignalKind::terminate()).map_err(SupervisorError::Io)?;
        let mut sigint = signal(SignalKind::interrupt()).map_err(SupervisorError::Io)?;

        loop {
            let mut child = self.spawn_child()?;
            let pid = child.id();
            info!(?pid, program = %self.child_spec.program.display(), "supervised process started");
            let started_at = self.clock.now();

            tokio::select! {
                status = child.wait() => {
                    let status = status.map_err(SupervisorError::Io)?;
                    let uptime = self.clock.now().duration_since(started_at);
                    info!(?status, uptime_secs = uptime.as_secs(), "supervised process exited");

                    match self.restart_policy.on_child_exit(status.code(), uptime, &self.clock) {
                        RestartDecision::CleanExit => return Ok(()),
                        RestartDecision::Restart { after } => {
                            warn!(backoff_secs = after.as_secs(), "restarting supervised process");
                            tokio::time::sleep_until(TokioInstant::now() + after).await;
                        }
                        RestartDecision::CrashLoop => {
                            error!(
                                restarts = self.restart_policy.window_restart_count(),
                                "crash loop detected, giving up"
                            );
                            return self.on_crash_loop();
                        }
                    }
                }
                _ = sigterm.recv() => {
                    info!("supervisor received SIGTERM, stopping child");
                    self.shutdown_child(&mut child).await;
                    return Ok(());
                }
                _ = sigint.recv() => {
                    info!("supervisor received SIGINT, stopping child");
                    self.shutdown_child(&mut child).await;
                    return Ok(());
                }
            }
        }
    }

    /// Hook invoked once a crash loop is declared. Separated out so a
    /// caller embedding `Supervisor` as a library can override behavior;
    /// the CLI binary just logs and returns an error.
    fn on_crash_loop(&self) -> Result<(), SupervisorError> {
        Err(SupervisorError::Io(std::io::Error::other("crash loop detected")))
    }

    async fn shutdown_child(&self, child: &mut Child) {
        let Some(pid) = child.id() else { return };
        send_signal(pid, "-15");

        let deadline = TokioInstant::now() + SHUTDOWN_GRACE;
        let waited = tokio::time::timeout_at(deadline, child.wait()).await;
        if waited.is_err() {
            warn!(pid, "child did not exit within the grace period, sending SIGKILL");
            let _ = child.kill().await;
        }
    }
}

fn send_signal(pid: u32, signal: &str) {
    let _ = std::process::Command::new("kill")
        .args([signal, &pid.to_string()])
        .stdin(Stdio::null())
        .stdout(Stdio::null())
        .stderr(Stdio::null())
        .status();
}

/// Whether a process with the given PID is still alive.
pub fn process_exists(pid: u32) -> bool {
    std::process::Command::new("kill")
        .args(["-0", &pid.to_string()])
        .stdin(Stdio::null())
        .stdout(Stdio::null())
        .stderr(Stdio::null())
        .status()
        .map(|s| s.success())
        .unwrap_or(false)
}

pub fn read_pid(path: &Path) -> Option<u32> {
    pidfile::read(path)
}

#[cfg(test)]
#[path = "supervisor_tests.rs"]
mod tests;
