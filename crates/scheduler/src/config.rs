// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! Scheduler loop tunables.

use serde::{Deserialize, Serialize};
use std::time::Duration;

/// Tunables for the reconciliation loop.
///
/// Durations (de)serialize as integer milliseconds
/// (`job_sync_interval = 30000`).
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct SchedulerConfig {
    /// Period between pulls of live jobs from all hosts.
    #[serde(with = "duration_ms")]
    pub job_sync_interval: Duration,
    /// Period between pulls of declared formations from the controller.
    #[serde(with = "duration_ms")]
    pub formation_sync_interval: Duration,
    /// Upper bound on how long an idle loop iteration blocks.
    #[serde(with = "duration_ms")]
    pub idle_wait: Duration,
    /// Slots per queue. Must exceed the worst-case fan-out of a single
    /// sync (known jobs + known formations).
    pub queue_capacity: usize,
    /// Events buffered per lagging subscriber before it starts skipping.
    pub bus_capacity: usize,
}

impl Default for SchedulerConfig {
    fn default() -> Self {
        Self {
            job_sync_interval: Duration::from_secs(30),
            formation_sync_interval: Duration::from_secs(60),
            idle_wait: Duration::from_secs(1),
            queue_capacity: 1000,
            bus_capacity: 1024,
        }
    }
}

impl SchedulerConfig {
    pub fn new() -> Self {
        Self::default()
    }

    herd_core::setters! {
        set {
            job_sync_interval: Duration,
            formation_sync_interval: Duration,
            idle_wait: Duration,
            queue_capacity: usize,
            bus_capacity: usize,
        }
    }
}

mod duration_ms {
    use serde::{Deserialize, Deserializer, Serialize, Serializer};
    use std::time::Duration;

    pub fn serialize<S: Serializer>(duration: &Duration, s: S) -> Result<S::Ok, S::Error> {
        (duration.as_millis() as u64).serialize(s)
    }

    pub fn deserialize<'de, D: Deserializer<'de>>(d: D) -> Result<Duration, D::Error> {
        let millis = u64::deserialize(d)?;
        Ok(Duration::from_millis(millis))
    }
}

#[cfg(test)]
#[path = "config_tests.rs"]
mod tests;
