// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! Spec harness: a scheduler loop spawned over in-memory collaborators.

use herd_adapters::{
    ControllerClient, HostJob, MemCluster, MemController, MemHost, MemVolumes,
};
use herd_core::{
    App, Artifact, Event, EventKind, ExpandedFormation, FormationKey, FormationRecord, Job, JobId,
    JobMeta, ProcessSpec, Processes, SystemClock,
};
use herd_scheduler::{
    EventStream, Scheduler, SchedulerConfig, SchedulerDeps, SchedulerError, SchedulerHandle,
};
use std::collections::HashMap;
use std::sync::Arc;
use std::time::Duration;

const WAIT: Duration = Duration::from_secs(5);

/// A running scheduler plus handles to everything around it.
pub struct Specs {
    pub controller: MemController,
    pub cluster: MemCluster,
    pub hosts: Vec<Arc<MemHost>>,
    pub handle: SchedulerHandle<MemController>,
    pub events: EventStream,
    task: tokio::task::JoinHandle<Result<(), SchedulerError>>,
}

/// Build a `Processes` map from pairs.
pub fn processes(counts: &[(&str, usize)]) -> Processes {
    counts.iter().map(|(kind, count)| (kind.to_string(), *count)).collect()
}

/// The formation key `seed_formation` produces for `name`.
pub fn key_for(name: &str) -> FormationKey {
    FormationKey::new(format!("app-{name}").into(), format!("rel-{name}").into())
}

/// Seed an app, release, artifact, and declared formation.
pub async fn seed_formation(
    controller: &MemController,
    name: &str,
    counts: &[(&str, usize)],
) -> FormationKey {
    let artifact = controller
        .create_artifact(Artifact {
            id: format!("art-{name}").into(),
            uri: format!("docker://{name}"),
        })
        .await
        .unwrap();
    let release = controller
        .create_release(herd_core::Release {
            id: format!("rel-{name}").into(),
            artifact_id: artifact.id,
            processes: counts
                .iter()
                .map(|(kind, _)| {
                    (
                        kind.to_string(),
                        ProcessSpec { args: vec!["start".into(), kind.to_string()], data: false },
                    )
                })
                .collect(),
        })
        .await
        .unwrap();
    let app = controller.create_app(App::new(format!("app-{name}").into(), name)).await.unwrap();
    controller
        .put_formation(FormationRecord {
            app_id: app.id.clone(),
            release_id: release.id.clone(),
            processes: processes(counts),
        })
        .await
        .unwrap();
    FormationKey::new(app.id, release.id)
}

/// A host job carrying the identity metadata for `key`.
pub fn host_job_for(key: &FormationKey, app_name: &str, kind: &str) -> HostJob {
    let meta = JobMeta {
        app_id: key.app_id.clone(),
        app_name: app_name.into(),
        release_id: key.release_id.clone(),
        kind: kind.into(),
    };
    HostJob::new(format!("docker://{app_name}"), vec!["start".into(), kind.into()], meta.into_map())
}

/// Start a scheduler loop with `hosts` hosts and the given seeded
/// formations, leading from the start.
pub async fn start(hosts: usize, seeds: &[(&str, &[(&str, usize)])]) -> Specs {
    let controller = MemController::new();
    let cluster = MemCluster::new();
    let hosts: Vec<_> = (1..=hosts).map(|n| cluster.add_host(format!("host-{n}"))).collect();
    for (name, counts) in seeds {
        seed_formation(&controller, name, counts).await;
    }

    let config = SchedulerConfig::new()
        .job_sync_interval(Duration::from_millis(20))
        .formation_sync_interval(Duration::from_millis(30))
        .idle_wait(Duration::from_millis(5));
    let (scheduler, handle) = Scheduler::new(
        SchedulerDeps {
            controller: Arc::new(controller.clone()),
            cluster: cluster.clone(),
            volumes: MemVolumes::new(),
        },
        SystemClock,
        config,
    );
    let events = handle.subscribe();
    let task = tokio::spawn(scheduler.run());
    handle.change_leader(true);

    Specs { controller, cluster, hosts, handle, events, task }
}

impl Specs {
    /// Next event of `kind`, skipping others.
    pub async fn await_event(&mut self, kind: EventKind) -> Event {
        self.await_event_where(kind, |_| true).await
    }

    /// Next event of `kind` matching `accept`, skipping others.
    pub async fn await_event_where(
        &mut self,
        kind: EventKind,
        accept: impl Fn(&Event) -> bool,
    ) -> Event {
        let wait = async {
            loop {
                let event = self.events.recv().await.expect("event stream closed");
                if event.kind() == kind && accept(&event) {
                    return event;
                }
            }
        };
        match tokio::time::timeout(WAIT, wait).await {
            Ok(event) => event,
            Err(_) => panic!("timed out waiting for {kind}"),
        }
    }

    /// Poll until the job map holds exactly `n` entries.
    pub async fn await_jobs(&self, n: usize) -> HashMap<JobId, Job> {
        let wait = async {
            loop {
                let jobs = self.handle.jobs().await.expect("scheduler gone");
                if jobs.len() == n {
                    return jobs;
                }
                tokio::time::sleep(Duration::from_millis(5)).await;
            }
        };
        match tokio::time::timeout(WAIT, wait).await {
            Ok(jobs) => jobs,
            Err(_) => panic!("job map never reached {n} entries"),
        }
    }

    /// Queue new declared counts for a formation the controller already
    /// stores.
    pub async fn put(&self, key: &FormationKey, counts: &[(&str, usize)]) {
        let release = self.controller.get_release(&key.release_id).await.unwrap();
        let artifact = self.controller.get_artifact(&release.artifact_id).await.unwrap();
        let app = self
            .controller
            .app_list()
            .await
            .unwrap()
            .into_iter()
            .find(|app| app.id == key.app_id)
            .unwrap();
        self.handle
            .put_formation(ExpandedFormation {
                app,
                release,
                artifact,
                processes: processes(counts),
            })
            .await
            .unwrap();
    }

    /// Stop the loop and wait for it to exit cleanly.
    pub async fn stop(self) {
        self.handle.stop();
        self.task.await.expect("scheduler task panicked").expect("scheduler errored");
    }
}

/// Group a job map by (app, release, type).
pub fn grouped(jobs: &HashMap<JobId, Job>) -> HashMap<(FormationKey, String), usize> {
    let mut counts = HashMap::new();
    for job in jobs.values() {
        *counts.entry((job.formation_key(), job.kind.clone())).or_insert(0) += 1;
    }
    counts
}
