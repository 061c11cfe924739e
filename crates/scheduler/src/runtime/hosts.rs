// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! Host selection policy.
//!
//! Load is counted from the scheduler's own job map rather than per-host
//! RPCs; the converged result is identical and selection stays
//! synchronous.

use crate::error::SchedulerError;
use crate::runtime::Scheduler;
use herd_adapters::{ClusterClient, ControllerClient, HostClient, VolumeProvisioner};
use herd_core::{Clock, FormationKey, HostId, JobId};
use std::sync::Arc;

impl<C, X, V, K> Scheduler<C, X, V, K>
where
    C: ControllerClient,
    X: ClusterClient,
    V: VolumeProvisioner,
    K: Clock,
{
    /// Host for a new job: the caller's choice when named, otherwise the
    /// host running the fewest jobs of this type. Ties break by fleet
    /// order.
    pub(crate) async fn find_best_host(
        &self,
        kind: &str,
        host_id: Option<&HostId>,
    ) -> Result<Arc<X::Host>, SchedulerError> {
        if let Some(id) = host_id {
            return Ok(self.cluster.host(id).await?);
        }
        let hosts = self.cluster.hosts().await?;
        hosts
            .into_iter()
            .min_by_key(|host| self.host_load(&host.id(), kind))
            .ok_or(SchedulerError::NoHosts)
    }

    /// Victim for an anonymous scale-down: a job of the requested type
    /// in the scaling-down formation, taken from the most-loaded host,
    /// youngest job first.
    pub(crate) fn find_victim(
        &self,
        formation: &FormationKey,
        kind: &str,
    ) -> Result<(JobId, HostId), SchedulerError> {
        self.jobs
            .values()
            .filter(|job| job.kind == kind && &job.formation_key() == formation)
            .max_by_key(|job| (self.host_load(&job.host_id, kind), job.created_at))
            .map(|job| (job.id.clone(), job.host_id.clone()))
            .ok_or_else(|| SchedulerError::NoVictim {
                formation: formation.clone(),
                kind: kind.to_string(),
            })
    }

    /// Jobs of `kind` currently tracked on `host`.
    fn host_load(&self, host: &HostId, kind: &str) -> usize {
        self.jobs
            .values()
            .filter(|job| &job.host_id == host && job.kind == kind)
            .count()
    }
}
