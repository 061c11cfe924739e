// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

use super::*;

#[test]
fn defaults_match_loop_contract() {
    let config = SchedulerConfig::default();
    assert_eq!(config.job_sync_interval, Duration::from_secs(30));
    assert_eq!(config.formation_sync_interval, Duration::from_secs(60));
    assert_eq!(config.idle_wait, Duration::from_secs(1));
    assert_eq!(config.queue_capacity, 1000);
    assert_eq!(config.bus_capacity, 1024);
}

#[test]
fn parses_from_toml_with_partial_overrides() {
    let config: SchedulerConfig = toml::from_str(
        "job_sync_interval = 500\nqueue_capacity = 64\n",
    )
    .unwrap();
    assert_eq!(config.job_sync_interval, Duration::from_millis(500));
    assert_eq!(config.queue_capacity, 64);
    // Unspecified fields keep their defaults.
    assert_eq!(config.formation_sync_interval, Duration::from_secs(60));
}

#[test]
fn setters_override_fields() {
    let config = SchedulerConfig::new()
        .job_sync_interval(Duration::from_millis(20))
        .idle_wait(Duration::from_millis(5));
    assert_eq!(config.job_sync_interval, Duration::from_millis(20));
    assert_eq!(config.idle_wait, Duration::from_millis(5));
}

#[test]
fn round_trips_through_serde() {
    let config = SchedulerConfig::new().formation_sync_interval(Duration::from_secs(5));
    let text = toml::to_string(&config).unwrap();
    let parsed: SchedulerConfig = toml::from_str(&text).unwrap();
    assert_eq!(parsed, config);
}
