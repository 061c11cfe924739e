// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! Shared test harness: in-memory collaborators around a scheduler.

use crate::bus::EventStream;
use crate::config::SchedulerConfig;
use crate::handle::SchedulerHandle;
use crate::runtime::{Scheduler, SchedulerDeps};
use herd_adapters::{ControllerClient, MemCluster, MemController, MemVolumes};
use herd_core::{
    App, Artifact, Event, EventKind, ExpandedFormation, FakeClock, FormationKey, FormationRecord,
    ProcessSpec, Processes, Release,
};
use std::sync::Arc;
use std::time::Duration;

/// Fully-typed scheduler under test.
pub(crate) type TestScheduler = Scheduler<MemController, MemCluster, MemVolumes, FakeClock>;

pub(crate) struct TestContext {
    pub scheduler: TestScheduler,
    pub handle: SchedulerHandle<MemController>,
    pub controller: MemController,
    pub cluster: MemCluster,
    pub volumes: MemVolumes,
    pub clock: FakeClock,
    pub events: EventStream,
}

/// Intervals tight enough for spawned-loop tests.
pub(crate) fn fast_config() -> SchedulerConfig {
    SchedulerConfig::new()
        .job_sync_interval(Duration::from_millis(20))
        .formation_sync_interval(Duration::from_millis(30))
        .idle_wait(Duration::from_millis(5))
}

/// Build a scheduler over fresh in-memory collaborators. Leadership is
/// granted unless `leader` is false.
pub(crate) fn setup_with_leader(leader: bool) -> TestContext {
    let controller = MemController::new();
    let cluster = MemCluster::new();
    let volumes = MemVolumes::new();
    let clock = FakeClock::new();

    let (mut scheduler, handle) = Scheduler::new(
        SchedulerDeps {
            controller: Arc::new(controller.clone()),
            cluster: cluster.clone(),
            volumes: volumes.clone(),
        },
        clock.clone(),
        fast_config(),
    );
    let events = handle.subscribe();
    handle.change_leader(leader);
    scheduler.observe_leadership();

    TestContext { scheduler, handle, controller, cluster, volumes, clock, events }
}

pub(crate) fn setup() -> TestContext {
    setup_with_leader(true)
}

/// Build a `Processes` map from pairs.
pub(crate) fn processes(counts: &[(&str, usize)]) -> Processes {
    counts.iter().map(|(kind, count)| (kind.to_string(), *count)).collect()
}

impl TestContext {
    /// Drain every queue in priority order until the scheduler is
    /// quiescent: the synchronous equivalent of the run loop.
    pub(crate) async fn settle(&mut self) {
        while self.scheduler.dispatch_next().await {}
    }

    /// Seed the controller with an app, a release whose process specs
    /// cover `counts`, an artifact, and the declared formation. Returns
    /// the formation key.
    pub(crate) async fn seed_formation(
        &self,
        name: &str,
        counts: &[(&str, usize)],
    ) -> FormationKey {
        self.seed_formation_with_data(name, counts, false).await
    }

    /// Like [`seed_formation`](Self::seed_formation) but marking every
    /// process type as wanting a data volume.
    pub(crate) async fn seed_formation_with_data(
        &self,
        name: &str,
        counts: &[(&str, usize)],
        data: bool,
    ) -> FormationKey {
        let artifact = self
            .controller
            .create_artifact(Artifact {
                id: format!("art-{name}").into(),
                uri: format!("docker://{name}"),
            })
            .await
            .unwrap();
        let release = self
            .controller
            .create_release(Release {
                id: format!("rel-{name}").into(),
                artifact_id: artifact.id,
                processes: counts
                    .iter()
                    .map(|(kind, _)| {
                        (
                            kind.to_string(),
                            ProcessSpec {
                                args: vec!["start".into(), kind.to_string()],
                                data,
                            },
                        )
                    })
                    .collect(),
            })
            .await
            .unwrap();
        let app = self
            .controller
            .create_app(App::new(format!("app-{name}").into(), name))
            .await
            .unwrap();
        self.controller
            .put_formation(FormationRecord {
                app_id: app.id.clone(),
                release_id: release.id.clone(),
                processes: processes(counts),
            })
            .await
            .unwrap();
        FormationKey::new(app.id, release.id)
    }

    /// Build an [`ExpandedFormation`] for `key` from the controller's
    /// stored descriptors, with new counts.
    pub(crate) async fn expanded(
        &self,
        key: &FormationKey,
        counts: &[(&str, usize)],
    ) -> ExpandedFormation {
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
        ExpandedFormation { app, release, artifact, processes: processes(counts) }
    }

    /// All events published so far, in order.
    pub(crate) fn drain_events(&mut self) -> Vec<Event> {
        let mut events = Vec::new();
        while let Some(event) = self.events.try_recv() {
            events.push(event);
        }
        events
    }

    pub(crate) fn drained_kinds(&mut self) -> Vec<EventKind> {
        self.drain_events().iter().map(Event::kind).collect()
    }
}
