// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! Dispatch a scale request: start or stop one job.

use crate::error::SchedulerError;
use crate::runtime::Scheduler;
use herd_adapters::{ClusterClient, ControllerClient, HostClient, HostJob, VolumeProvisioner};
use herd_core::{Clock, Event, Formation, Job, JobId, JobMeta, JobRequest, RequestType};
use tracing::{debug, info, warn};

impl<C, X, V, K> Scheduler<C, X, V, K>
where
    C: ControllerClient,
    X: ClusterClient,
    V: VolumeProvisioner,
    K: Clock,
{
    /// Dispatch one unit of scale work. Only a leader mutates the
    /// cluster; requests reaching a non-leader are dropped (they will be
    /// rebuilt by rectify on the next leader).
    pub(crate) async fn handle_job_request(&mut self, request: JobRequest) {
        if !self.leader {
            debug!(
                formation = %request.formation,
                kind = %request.kind,
                "not leader, dropping job request"
            );
            return;
        }
        match request.request_type {
            RequestType::Up => self.start_job(request).await,
            RequestType::Down => self.stop_job(request).await,
        }
    }

    /// Place and start one job of the requested process type.
    async fn start_job(&mut self, request: JobRequest) {
        let result = self.start_job_inner(&request).await;
        let (job, error) = match result {
            Ok(job) => {
                info!(
                    job.id = %job.id,
                    host.id = %job.host_id,
                    app.id = %job.app_id,
                    kind = %job.kind,
                    "started job"
                );
                (Some(job), None)
            }
            Err(err) => {
                warn!(
                    formation = %request.formation,
                    kind = %request.kind,
                    err = %err,
                    "failed to start job"
                );
                (None, Some(err.to_string()))
            }
        };
        self.publish(Event::JobStart { job, error });
    }

    async fn start_job_inner(&mut self, request: &JobRequest) -> Result<Job, SchedulerError> {
        let formation = self
            .formations
            .get(&request.formation)
            .ok_or_else(|| SchedulerError::UnknownFormation(request.formation.clone()))?
            .clone();

        let host = self.find_best_host(&request.kind, request.host_id.as_ref()).await?;
        let host_id = host.id();

        let (mut config, needs_volume) = host_job(&formation, &request.kind)?;
        if needs_volume {
            config.volume = Some(self.volumes.provision(&host_id).await?);
        }

        let started = host.add_job(config).await?;
        let job = Job::new(started.job.id, host_id, &formation, request.kind.clone(), &self.clock);
        self.add_job(job).await
    }

    /// Stop one job of the requested process type, resolving a victim
    /// when the request does not name one.
    async fn stop_job(&mut self, request: JobRequest) {
        let result = self.stop_job_inner(&request).await;
        let (job_id, error) = match result {
            Ok(job_id) => {
                info!(job.id = %job_id, kind = %request.kind, "stopped job");
                (Some(job_id), None)
            }
            Err(err) => {
                warn!(
                    formation = %request.formation,
                    kind = %request.kind,
                    err = %err,
                    "failed to stop job"
                );
                (None, Some(err.to_string()))
            }
        };
        self.publish(Event::JobStop { job_id, error });
    }

    async fn stop_job_inner(&mut self, request: &JobRequest) -> Result<JobId, SchedulerError> {
        let (job_id, host_id) = match (&request.job_id, &request.host_id) {
            (Some(job_id), Some(host_id)) => (job_id.clone(), host_id.clone()),
            _ => self.find_victim(&request.formation, &request.kind)?,
        };
        let host = self.cluster.host(&host_id).await?;
        host.stop_job(&job_id).await?;
        self.remove_job(&job_id).await?;
        Ok(job_id)
    }
}

/// Build the host-job config for one process type of a formation.
/// Returns the config and whether the type asks for a data volume.
fn host_job(formation: &Formation, kind: &str) -> Result<(HostJob, bool), SchedulerError> {
    let spec = formation.release.processes.get(kind).ok_or_else(|| {
        SchedulerError::MissingProcessType {
            release: formation.release.id.clone(),
            kind: kind.to_string(),
        }
    })?;
    let meta = JobMeta {
        app_id: formation.app.id.clone(),
        app_name: formation.app.name.clone(),
        release_id: formation.release.id.clone(),
        kind: kind.to_string(),
    };
    let config = HostJob::new(formation.artifact.uri.clone(), spec.args.clone(), meta.into_map());
    Ok((config, spec.data))
}
