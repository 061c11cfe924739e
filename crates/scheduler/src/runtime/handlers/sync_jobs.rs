// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! Observed → scheduler: fold live host jobs into the job map.

use crate::error::SchedulerError;
use crate::runtime::Scheduler;
use herd_adapters::{ClusterClient, ControllerClient, HostClient, VolumeProvisioner};
use herd_core::{Clock, Event, FormationKey, Job, JobId, JobMeta};
use std::collections::HashSet;
use tracing::{debug, info, warn};

impl<C, X, V, K> Scheduler<C, X, V, K>
where
    C: ControllerClient,
    X: ClusterClient,
    V: VolumeProvisioner,
    K: Clock,
{
    /// Pull live jobs from every host.
    ///
    /// Discovered jobs with a known formation are adopted (and reported
    /// "up" to the controller); jobs without one are refused. Jobs that
    /// no longer appear on any reachable listing are dropped from the
    /// map. Finishes by queueing a rectify so drift gets repaired on the
    /// next turn.
    pub(crate) async fn sync_jobs(&mut self) {
        let result = self.sync_hosts().await;
        if let Err(err) = &result {
            warn!(err = %err, "cluster sync incomplete");
        }
        self.publish(Event::ClusterSync { error: result.err().map(|e| e.to_string()) });
    }

    async fn sync_hosts(&mut self) -> Result<(), SchedulerError> {
        let hosts = self.cluster.hosts().await?;

        // Everything we currently know but don't see again has vanished.
        let mut inactive: HashSet<JobId> = self.jobs.keys().cloned().collect();
        let mut first_err: Option<SchedulerError> = None;

        for host in hosts {
            let host_id = host.id();
            let active = match host.list_jobs().await {
                Ok(jobs) => jobs,
                Err(err) => {
                    warn!(host.id = %host_id, err = %err, "skipping unreachable host");
                    continue;
                }
            };
            for (job_id, active_job) in active {
                if !active_job.status.is_active() {
                    continue;
                }
                let meta = JobMeta::from_map(&active_job.job.metadata);
                if !meta.is_complete() {
                    continue;
                }
                if self.jobs.contains_key(&job_id) {
                    inactive.remove(&job_id);
                    continue;
                }

                let key = FormationKey::new(meta.app_id.clone(), meta.release_id.clone());
                let job = match self.formations.get(&key) {
                    Some(formation) => Job::new(
                        job_id.clone(),
                        host_id.clone(),
                        formation,
                        meta.kind.clone(),
                        &self.clock,
                    ),
                    None => {
                        // Orphan adoption is refused: every tracked job
                        // must reference a known formation.
                        let err = SchedulerError::UnknownFormation(key);
                        warn!(
                            job.id = %job_id,
                            app.id = %meta.app_id,
                            release.id = %meta.release_id,
                            host.id = %host_id,
                            "refusing job without formation"
                        );
                        self.publish(Event::JobStart {
                            job: None,
                            error: Some(err.to_string()),
                        });
                        first_err.get_or_insert(err);
                        continue;
                    }
                };
                match self.add_job(job).await {
                    Ok(job) => {
                        info!(
                            job.id = %job.id,
                            host.id = %job.host_id,
                            app.id = %job.app_id,
                            "adopted running job"
                        );
                        self.publish(Event::JobStart { job: Some(job), error: None });
                    }
                    Err(err) => {
                        warn!(job.id = %job_id, err = %err, "failed to adopt job");
                        first_err.get_or_insert(err);
                    }
                }
            }
        }

        for job_id in inactive {
            debug!(job.id = %job_id, "dropping job that left the cluster");
            self.jobs.remove(&job_id);
        }

        self.enqueue_rectify();
        match first_err {
            None => Ok(()),
            Some(err) => Err(err),
        }
    }
}
