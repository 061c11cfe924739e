// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

use super::*;
use herd_scheduler::SchedulerConfig;
use tempfile::tempdir;

fn test_config(dir: &std::path::Path) -> Config {
    Config {
        state_dir: dir.to_path_buf(),
        pid_path: dir.join("herdd.pid"),
        scheduler: SchedulerConfig::default(),
        standalone: Default::default(),
    }
}

#[test]
fn pidfile_lock_is_exclusive() {
    let dir = tempdir().unwrap();
    let config = test_config(dir.path());

    let held = acquire_pidfile(&config).unwrap();
    let err = acquire_pidfile(&config).unwrap_err();
    assert!(matches!(err, DaemonError::LockFailed(_)));

    // The pid landed in the file.
    let written = std::fs::read_to_string(&config.pid_path).unwrap();
    assert_eq!(written, std::process::id().to_string());

    // Releasing the lock frees the slot.
    drop(held);
    acquire_pidfile(&config).unwrap();
}
