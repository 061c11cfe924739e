// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! External entry points to a running scheduler.

use crate::bus::{EventBus, EventStream};
use crate::error::SchedulerError;
use herd_core::{App, Artifact, ExpandedFormation, Formations, Job, JobId, Release};
use herd_adapters::ControllerClient;
use std::collections::HashMap;
use std::sync::Arc;
use tokio::sync::{mpsc, oneshot, watch};
use tokio_util::sync::CancellationToken;

/// Snapshot requests answered inside the actor's turn.
pub(crate) enum Query {
    Jobs(oneshot::Sender<HashMap<JobId, Job>>),
    Formations(oneshot::Sender<Formations>),
}

/// Handle to a [`Scheduler`](crate::Scheduler).
///
/// Cheap to clone; every method is safe to call from any task. Work is
/// queued toward the actor; a full queue back-pressures the caller.
pub struct SchedulerHandle<C> {
    pub(crate) controller: Arc<C>,
    pub(crate) formation_tx: mpsc::Sender<ExpandedFormation>,
    pub(crate) rectify_tx: mpsc::Sender<()>,
    pub(crate) formation_sync_tx: mpsc::Sender<()>,
    pub(crate) job_sync_tx: mpsc::Sender<()>,
    pub(crate) query_tx: mpsc::Sender<Query>,
    pub(crate) leader_tx: Arc<watch::Sender<bool>>,
    pub(crate) bus: EventBus,
    pub(crate) stop: CancellationToken,
}

impl<C> Clone for SchedulerHandle<C> {
    fn clone(&self) -> Self {
        Self {
            controller: self.controller.clone(),
            formation_tx: self.formation_tx.clone(),
            rectify_tx: self.rectify_tx.clone(),
            formation_sync_tx: self.formation_sync_tx.clone(),
            job_sync_tx: self.job_sync_tx.clone(),
            query_tx: self.query_tx.clone(),
            leader_tx: self.leader_tx.clone(),
            bus: self.bus.clone(),
            stop: self.stop.clone(),
        }
    }
}

impl<C: ControllerClient> SchedulerHandle<C> {
    /// Queue a desired-state change for one formation.
    pub async fn put_formation(&self, formation: ExpandedFormation) -> Result<(), SchedulerError> {
        self.formation_tx.send(formation).await.map_err(|_| SchedulerError::Stopped)
    }

    /// Trigger a drift recomputation.
    pub async fn rectify(&self) -> Result<(), SchedulerError> {
        self.rectify_tx.send(()).await.map_err(|_| SchedulerError::Stopped)
    }

    /// Trigger a pull of declared formations from the controller.
    pub async fn sync_formations(&self) -> Result<(), SchedulerError> {
        self.formation_sync_tx.send(()).await.map_err(|_| SchedulerError::Stopped)
    }

    /// Trigger a pull of live jobs from all hosts.
    pub async fn sync_jobs(&self) -> Result<(), SchedulerError> {
        self.job_sync_tx.send(()).await.map_err(|_| SchedulerError::Stopped)
    }

    /// Snapshot of the job map, taken inside the actor's turn.
    pub async fn jobs(&self) -> Result<HashMap<JobId, Job>, SchedulerError> {
        let (tx, rx) = oneshot::channel();
        self.query_tx.send(Query::Jobs(tx)).await.map_err(|_| SchedulerError::Stopped)?;
        rx.await.map_err(|_| SchedulerError::Stopped)
    }

    /// Snapshot of the known formations.
    pub async fn formations(&self) -> Result<Formations, SchedulerError> {
        let (tx, rx) = oneshot::channel();
        self.query_tx.send(Query::Formations(tx)).await.map_err(|_| SchedulerError::Stopped)?;
        rx.await.map_err(|_| SchedulerError::Stopped)
    }

    /// Open a subscription to the event stream.
    pub fn subscribe(&self) -> EventStream {
        self.bus.subscribe()
    }

    /// Advisory leadership flag; only a leader performs mutations.
    pub fn change_leader(&self, leader: bool) {
        let _ = self.leader_tx.send(leader);
    }

    pub fn is_leader(&self) -> bool {
        *self.leader_tx.borrow()
    }

    /// Stop the loop. Idempotent; `run()` returns at its next
    /// top-of-iteration check. Subscriptions stay open until dropped.
    pub fn stop(&self) {
        self.stop.cancel();
    }

    /// Register an app with the controller.
    pub async fn create_app(&self, app: App) -> Result<App, SchedulerError> {
        Ok(self.controller.create_app(app).await?)
    }

    /// Register a release with the controller.
    pub async fn create_release(&self, release: Release) -> Result<Release, SchedulerError> {
        Ok(self.controller.create_release(release).await?)
    }

    /// Register an artifact with the controller.
    pub async fn create_artifact(&self, artifact: Artifact) -> Result<Artifact, SchedulerError> {
        Ok(self.controller.create_artifact(artifact).await?)
    }
}
