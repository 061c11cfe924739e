// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! Daemon configuration.

use herd_scheduler::SchedulerConfig;
use serde::Deserialize;
use std::path::PathBuf;
use thiserror::Error;

/// Configuration errors
#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("could not determine state directory")]
    NoStateDir,

    #[error("failed to read config: {0}")]
    Io(#[from] std::io::Error),

    #[error("failed to parse config: {0}")]
    Parse(#[from] toml::de::Error),
}

/// Standalone-mode settings: the in-memory cluster the daemon drives
/// when it is not attached to a real fleet.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
#[serde(default)]
pub struct StandaloneConfig {
    /// Hosts the in-memory cluster starts with.
    pub hosts: usize,
    /// Whether this daemon assumes leadership at startup.
    pub lead: bool,
}

impl Default for StandaloneConfig {
    fn default() -> Self {
        Self { hosts: 1, lead: true }
    }
}

/// On-disk config file shape (`herd.toml`).
#[derive(Debug, Default, Deserialize)]
#[serde(default)]
struct FileConfig {
    scheduler: SchedulerConfig,
    standalone: StandaloneConfig,
}

/// Daemon configuration
#[derive(Debug, Clone)]
pub struct Config {
    /// Root state directory (e.g. `~/.local/state/herd`)
    pub state_dir: PathBuf,
    /// Path to the pidfile lock
    pub pid_path: PathBuf,
    pub scheduler: SchedulerConfig,
    pub standalone: StandaloneConfig,
}

impl Config {
    /// Load configuration: resolve the state directory, then apply
    /// `herd.toml` overrides when the file exists.
    pub fn load() -> Result<Self, ConfigError> {
        let state_dir = crate::env::state_dir()?;
        let path = crate::env::config_path(&state_dir);
        let file = if path.exists() {
            toml::from_str(&std::fs::read_to_string(&path)?)?
        } else {
            FileConfig::default()
        };

        Ok(Self {
            pid_path: state_dir.join("herdd.pid"),
            state_dir,
            scheduler: file.scheduler,
            standalone: file.standalone,
        })
    }
}

#[cfg(test)]
#[path = "config_tests.rs"]
mod tests;
