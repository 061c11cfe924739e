// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! Running job instances and their host-reported status.

use crate::clock::Clock;
use crate::formation::{Formation, FormationKey};
use crate::records::{AppId, ReleaseId};
use serde::{Deserialize, Serialize};
use std::time::Instant;

crate::define_id! {
    /// Identifier a host assigns to a running job.
    ///
    /// Unique across the cluster; the scheduler never mints these itself,
    /// it only learns them from `AddJob` responses and host listings.
    pub struct JobId("job-");
}

crate::define_id! {
    /// Identifier of a worker node.
    pub struct HostId("host-");
}

/// Host-reported status of a job instance.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum JobStatus {
    /// Accepted by the host, not yet running.
    Starting,
    Running,
    Stopped,
    /// Exited on its own with a failure.
    Crashed,
}

impl JobStatus {
    /// Statuses that count toward a formation's running total.
    pub fn is_active(&self) -> bool {
        matches!(self, JobStatus::Starting | JobStatus::Running)
    }
}

crate::simple_display! {
    JobStatus {
        Starting => "starting",
        Running => "running",
        Stopped => "stopped",
        Crashed => "crashed",
    }
}

/// One running process instance on a host.
///
/// Immutable once created: jobs are only ever inserted into and removed
/// from the scheduler's job map, never updated in place.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Job {
    pub id: JobId,
    pub host_id: HostId,
    pub app_id: AppId,
    pub app_name: String,
    pub release_id: ReleaseId,
    /// Process type name within the release.
    #[serde(rename = "type")]
    pub kind: String,
    /// When the scheduler first learned about this job. Feeds victim
    /// ordering when scaling down.
    #[serde(skip, default = "Instant::now")]
    pub created_at: Instant,
}

impl Job {
    /// Create a job record for an instance of `kind` running under
    /// `formation` on the given host.
    pub fn new(
        id: JobId,
        host_id: HostId,
        formation: &Formation,
        kind: impl Into<String>,
        clock: &impl Clock,
    ) -> Self {
        Self {
            id,
            host_id,
            app_id: formation.app.id.clone(),
            app_name: formation.app.name.clone(),
            release_id: formation.release.id.clone(),
            kind: kind.into(),
            created_at: clock.now(),
        }
    }

    /// Key of the formation this job belongs to.
    pub fn formation_key(&self) -> FormationKey {
        FormationKey::new(self.app_id.clone(), self.release_id.clone())
    }
}

crate::builder! {
    pub struct JobBuilder => Job {
        into {
            id: JobId = "job-1",
            host_id: HostId = "host-1",
            app_id: AppId = "app-1",
            app_name: String = "test-app",
            release_id: ReleaseId = "rel-1",
            kind: String = "web",
        }
        computed {
            created_at: Instant = Instant::now(),
        }
    }
}

#[cfg(test)]
#[path = "job_tests.rs"]
mod tests;
