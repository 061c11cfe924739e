// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! Centralized environment variable access for the daemon crate.

use crate::config::ConfigError;
use std::path::PathBuf;

/// Resolve the state directory:
/// `HERD_STATE_DIR` > platform state dir (`$XDG_STATE_HOME/herd`) >
/// `~/.local/state/herd`.
pub fn state_dir() -> Result<PathBuf, ConfigError> {
    if let Ok(dir) = std::env::var("HERD_STATE_DIR") {
        return Ok(PathBuf::from(dir));
    }
    if let Some(state) = dirs::state_dir() {
        return Ok(state.join("herd"));
    }
    let home = dirs::home_dir().ok_or(ConfigError::NoStateDir)?;
    Ok(home.join(".local/state/herd"))
}

/// Config file override (`HERD_CONFIG`); defaults to `herd.toml` in the
/// state directory.
pub fn config_path(state_dir: &std::path::Path) -> PathBuf {
    std::env::var("HERD_CONFIG")
        .map(PathBuf::from)
        .unwrap_or_else(|_| state_dir.join("herd.toml"))
}

/// Log filter (`HERD_LOG`), defaulting to `info`.
pub fn log_filter() -> String {
    std::env::var("HERD_LOG").unwrap_or_else(|_| "info".to_string())
}
