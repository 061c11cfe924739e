// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! Daemon lifecycle: startup, signal handling, shutdown.

use crate::config::{Config, ConfigError};
use fs2::FileExt;
use herd_adapters::{MemCluster, MemController, MemVolumes};
use herd_core::SystemClock;
use herd_scheduler::{Scheduler, SchedulerDeps, SchedulerError};
use std::fs::File;
use std::io::Write;
use std::sync::Arc;
use thiserror::Error;
use tokio::signal::unix::{signal, SignalKind};
use tracing::{info, warn};

/// Lifecycle errors
#[derive(Debug, Error)]
pub enum DaemonError {
    #[error(transparent)]
    Config(#[from] ConfigError),

    #[error("failed to acquire pidfile lock: daemon already running?")]
    LockFailed(#[source] std::io::Error),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error(transparent)]
    Scheduler(#[from] SchedulerError),

    #[error("scheduler task failed: {0}")]
    Join(String),
}

/// Run the daemon until SIGINT/SIGTERM.
pub async fn run(config: Config) -> Result<(), DaemonError> {
    // NOTE(lifetime): held to keep the exclusive pidfile lock; released on drop
    let _lock = acquire_pidfile(&config)?;

    let controller = MemController::new();
    let cluster = MemCluster::new();
    for n in 1..=config.standalone.hosts.max(1) {
        cluster.add_host(format!("host-{n}"));
    }
    let volumes = MemVolumes::new();

    let (scheduler, handle) = Scheduler::new(
        SchedulerDeps { controller: Arc::new(controller), cluster, volumes },
        SystemClock,
        config.scheduler.clone(),
    );

    // Mirror the event stream into the log.
    let mut events = handle.subscribe();
    tokio::spawn(async move {
        while let Some(event) = events.recv().await {
            match event.error() {
                Some(err) => warn!(event = %event.kind(), err, "scheduler event"),
                None => info!(event = %event.log_summary(), "scheduler event"),
            }
        }
    });

    let task = tokio::spawn(scheduler.run());
    if config.standalone.lead {
        handle.change_leader(true);
    }
    info!(
        hosts = config.standalone.hosts,
        leader = config.standalone.lead,
        "herdd running"
    );

    // SIGUSR1/SIGUSR2 feed the leadership flag; SIGINT/SIGTERM stop.
    let mut gain = signal(SignalKind::user_defined1())?;
    let mut lose = signal(SignalKind::user_defined2())?;
    let mut term = signal(SignalKind::terminate())?;
    let mut int = signal(SignalKind::interrupt())?;
    loop {
        tokio::select! {
            _ = gain.recv() => {
                info!("SIGUSR1: taking leadership");
                handle.change_leader(true);
            }
            _ = lose.recv() => {
                info!("SIGUSR2: dropping leadership");
                handle.change_leader(false);
            }
            _ = term.recv() => break,
            _ = int.recv() => break,
        }
    }

    info!("shutting down");
    handle.stop();
    task.await.map_err(|err| DaemonError::Join(err.to_string()))??;

    if config.pid_path.exists() {
        if let Err(err) = std::fs::remove_file(&config.pid_path) {
            warn!(err = %err, "failed to remove pidfile");
        }
    }
    info!("shutdown complete");
    Ok(())
}

/// Create the state directory, take the exclusive pidfile lock, and
/// write our pid into it.
pub(crate) fn acquire_pidfile(config: &Config) -> Result<File, DaemonError> {
    std::fs::create_dir_all(&config.state_dir)?;
    let mut file = File::options()
        .create(true)
        .write(true)
        .truncate(false)
        .open(&config.pid_path)?;
    file.try_lock_exclusive().map_err(DaemonError::LockFailed)?;
    file.set_len(0)?;
    file.write_all(std::process::id().to_string().as_bytes())?;
    Ok(file)
}

#[cfg(test)]
#[path = "lifecycle_tests.rs"]
mod tests;
