// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

use super::*;
use serial_test::serial;
use std::time::Duration;
use tempfile::tempdir;

fn with_state_dir<T>(dir: &std::path::Path, f: impl FnOnce() -> T) -> T {
    std::env::set_var("HERD_STATE_DIR", dir);
    let out = f();
    std::env::remove_var("HERD_STATE_DIR");
    std::env::remove_var("HERD_CONFIG");
    out
}

#[test]
#[serial]
fn load_without_file_uses_defaults() {
    let dir = tempdir().unwrap();
    let config = with_state_dir(dir.path(), Config::load).unwrap();

    assert_eq!(config.state_dir, dir.path());
    assert_eq!(config.pid_path, dir.path().join("herdd.pid"));
    assert_eq!(config.scheduler, SchedulerConfig::default());
    assert_eq!(config.standalone, StandaloneConfig::default());
    assert_eq!(config.standalone.hosts, 1);
    assert!(config.standalone.lead);
}

#[test]
#[serial]
fn load_applies_toml_overrides() {
    let dir = tempdir().unwrap();
    std::fs::write(
        dir.path().join("herd.toml"),
        "[scheduler]\njob_sync_interval = 5000\n\n[standalone]\nhosts = 3\nlead = false\n",
    )
    .unwrap();

    let config = with_state_dir(dir.path(), Config::load).unwrap();
    assert_eq!(config.scheduler.job_sync_interval, Duration::from_millis(5000));
    // Unset scheduler fields keep their defaults.
    assert_eq!(config.scheduler.queue_capacity, 1000);
    assert_eq!(config.standalone.hosts, 3);
    assert!(!config.standalone.lead);
}

#[test]
#[serial]
fn herd_config_overrides_the_file_location() {
    let dir = tempdir().unwrap();
    let other = dir.path().join("elsewhere.toml");
    std::fs::write(&other, "[standalone]\nhosts = 7\n").unwrap();

    let config = with_state_dir(dir.path(), || {
        std::env::set_var("HERD_CONFIG", &other);
        Config::load()
    })
    .unwrap();
    assert_eq!(config.standalone.hosts, 7);
}

#[test]
#[serial]
fn invalid_toml_is_a_parse_error() {
    let dir = tempdir().unwrap();
    std::fs::write(dir.path().join("herd.toml"), "standalone = \"nope\"").unwrap();

    let err = with_state_dir(dir.path(), Config::load).unwrap_err();
    assert!(matches!(err, ConfigError::Parse(_)));
}
