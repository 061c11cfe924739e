// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! The reconciliation actor.
//!
//! One task owns the job map and the formations and is their sole
//! mutator, so every invariant here is a single-threaded invariant.
//! Five typed queues feed the loop; each iteration handles the first
//! non-empty queue in priority order (job requests → rectifies →
//! formation changes → formation syncs → job syncs), which lets local
//! work finish before global state is re-read.

mod handlers;
mod hosts;

use crate::bus::EventBus;
use crate::config::SchedulerConfig;
use crate::error::SchedulerError;
use crate::handle::{Query, SchedulerHandle};
use herd_adapters::{ClusterClient, ControllerClient, VolumeProvisioner};
use herd_core::{
    Clock, Event, ExpandedFormation, Formations, Job, JobId, JobRecord, JobRequest, JobState,
};
use std::collections::HashMap;
use std::sync::Arc;
use tokio::sync::{mpsc, watch};
use tokio_util::sync::CancellationToken;
use tracing::{debug, info, warn};

/// External collaborators the scheduler drives.
pub struct SchedulerDeps<C, X, V> {
    pub controller: Arc<C>,
    pub cluster: X,
    pub volumes: V,
}

/// What woke an idle loop iteration.
enum Wake {
    Stopped,
    Leadership,
    Query(Query),
    JobSync,
    Deadline,
}

/// The scheduler actor.
///
/// Constructed with [`new`](Self::new), which also returns the
/// [`SchedulerHandle`] used by everything outside the loop. Consumed by
/// [`run`](Self::run).
pub struct Scheduler<C, X, V, K: Clock> {
    controller: Arc<C>,
    cluster: X,
    volumes: V,
    clock: K,
    config: SchedulerConfig,

    pub(crate) jobs: HashMap<JobId, Job>,
    pub(crate) formations: Formations,
    pub(crate) leader: bool,

    job_request_rx: mpsc::Receiver<JobRequest>,
    job_request_tx: mpsc::Sender<JobRequest>,
    rectify_rx: mpsc::Receiver<()>,
    rectify_tx: mpsc::Sender<()>,
    formation_rx: mpsc::Receiver<ExpandedFormation>,
    formation_tx: mpsc::Sender<ExpandedFormation>,
    formation_sync_rx: mpsc::Receiver<()>,
    formation_sync_tx: mpsc::Sender<()>,
    job_sync_rx: mpsc::Receiver<()>,
    job_sync_tx: mpsc::Sender<()>,
    query_rx: mpsc::Receiver<Query>,
    leader_rx: watch::Receiver<bool>,

    bus: EventBus,
    stop: CancellationToken,
}

impl<C, X, V, K> Scheduler<C, X, V, K>
where
    C: ControllerClient,
    X: ClusterClient,
    V: VolumeProvisioner,
    K: Clock,
{
    /// Build a scheduler and the handle external callers use.
    pub fn new(
        deps: SchedulerDeps<C, X, V>,
        clock: K,
        config: SchedulerConfig,
    ) -> (Self, SchedulerHandle<C>) {
        let capacity = config.queue_capacity.max(1);
        let (job_request_tx, job_request_rx) = mpsc::channel(capacity);
        let (rectify_tx, rectify_rx) = mpsc::channel(capacity);
        let (formation_tx, formation_rx) = mpsc::channel(capacity);
        let (formation_sync_tx, formation_sync_rx) = mpsc::channel(capacity);
        let (job_sync_tx, job_sync_rx) = mpsc::channel(capacity);
        let (query_tx, query_rx) = mpsc::channel(16);
        let (leader_tx, leader_rx) = watch::channel(false);
        let bus = EventBus::new(config.bus_capacity);
        let stop = CancellationToken::new();

        let handle = SchedulerHandle {
            controller: deps.controller.clone(),
            formation_tx: formation_tx.clone(),
            rectify_tx: rectify_tx.clone(),
            formation_sync_tx: formation_sync_tx.clone(),
            job_sync_tx: job_sync_tx.clone(),
            query_tx,
            leader_tx: Arc::new(leader_tx),
            bus: bus.clone(),
            stop: stop.clone(),
        };

        let scheduler = Self {
            controller: deps.controller,
            cluster: deps.cluster,
            volumes: deps.volumes,
            clock,
            config,
            jobs: HashMap::new(),
            formations: Formations::new(),
            leader: false,
            job_request_rx,
            job_request_tx,
            rectify_rx,
            rectify_tx,
            formation_rx,
            formation_tx,
            formation_sync_rx,
            formation_sync_tx,
            job_sync_rx,
            job_sync_tx,
            query_rx,
            leader_rx,
            bus,
            stop,
        };

        (scheduler, handle)
    }

    /// Run until stopped. Primes one formation sync and one job sync,
    /// starts the periodic tickers, then drains the queues.
    pub async fn run(mut self) -> Result<(), SchedulerError> {
        info!("scheduler loop starting");
        let _ = self.formation_sync_tx.try_send(());
        let _ = self.job_sync_tx.try_send(());
        self.spawn_tickers();

        loop {
            if self.stop.is_cancelled() {
                info!("scheduler loop stopped");
                return Ok(());
            }
            self.observe_leadership();

            if self.dispatch_next().await {
                continue;
            }

            // All queues empty: block for up to one idle period on the
            // inputs that can arrive without a handler running.
            let wake = tokio::select! {
                _ = self.stop.cancelled() => Wake::Stopped,
                changed = self.leader_rx.changed() => {
                    if changed.is_ok() { Wake::Leadership } else { Wake::Deadline }
                }
                query = self.query_rx.recv() => match query {
                    Some(query) => Wake::Query(query),
                    None => Wake::Deadline,
                },
                tick = self.job_sync_rx.recv() => match tick {
                    Some(()) => Wake::JobSync,
                    None => Wake::Deadline,
                },
                _ = tokio::time::sleep(self.config.idle_wait) => Wake::Deadline,
            };
            match wake {
                Wake::Stopped => {
                    info!("scheduler loop stopped");
                    return Ok(());
                }
                Wake::Leadership => self.observe_leadership(),
                Wake::Query(query) => self.answer(query),
                Wake::JobSync => {
                    Self::drain(&mut self.job_sync_rx);
                    self.sync_jobs().await;
                }
                Wake::Deadline => {}
            }
        }
    }

    /// One priority-ordered, non-blocking pass over the queues. Returns
    /// true when something was handled.
    pub(crate) async fn dispatch_next(&mut self) -> bool {
        if let Ok(query) = self.query_rx.try_recv() {
            self.answer(query);
            return true;
        }
        if let Ok(request) = self.job_request_rx.try_recv() {
            self.handle_job_request(request).await;
            return true;
        }
        if self.rectify_rx.try_recv().is_ok() {
            Self::drain(&mut self.rectify_rx);
            self.rectify_jobs().await;
            return true;
        }
        if let Ok(expanded) = self.formation_rx.try_recv() {
            self.handle_formation_change(expanded).await;
            return true;
        }
        if self.formation_sync_rx.try_recv().is_ok() {
            Self::drain(&mut self.formation_sync_rx);
            self.sync_formations().await;
            return true;
        }
        if self.job_sync_rx.try_recv().is_ok() {
            Self::drain(&mut self.job_sync_rx);
            self.sync_jobs().await;
            return true;
        }
        false
    }

    /// Feed the sync queues on their periods. Ticks into a full queue
    /// coalesce with the pending one.
    fn spawn_tickers(&self) {
        let tickers = [
            (self.config.job_sync_interval, self.job_sync_tx.clone()),
            (self.config.formation_sync_interval, self.formation_sync_tx.clone()),
        ];
        for (period, tx) in tickers {
            let stop = self.stop.clone();
            tokio::spawn(async move {
                let mut ticker = tokio::time::interval(period);
                ticker.set_missed_tick_behavior(tokio::time::MissedTickBehavior::Delay);
                // The first tick completes immediately; startup already
                // primed the queue.
                ticker.tick().await;
                loop {
                    tokio::select! {
                        _ = stop.cancelled() => return,
                        _ = ticker.tick() => {
                            let _ = tx.try_send(());
                        }
                    }
                }
            });
        }
    }

    /// Coalesce queued ticks so a burst runs the handler once.
    fn drain<T>(rx: &mut mpsc::Receiver<T>) {
        while rx.try_recv().is_ok() {}
    }

    fn answer(&self, query: Query) {
        match query {
            Query::Jobs(reply) => {
                let _ = reply.send(self.jobs.clone());
            }
            Query::Formations(reply) => {
                let _ = reply.send(self.formations.clone());
            }
        }
    }

    /// Fold the latest leadership flag into the loop. Losing leadership
    /// drops queued scale work; a later resync rebuilds it if we lead
    /// again.
    pub(crate) fn observe_leadership(&mut self) {
        let leader = *self.leader_rx.borrow_and_update();
        if leader == self.leader {
            return;
        }
        self.leader = leader;
        if leader {
            info!("gained leadership");
        } else {
            let mut dropped = 0;
            while self.job_request_rx.try_recv().is_ok() {
                dropped += 1;
            }
            info!(dropped, "lost leadership");
        }
    }

    /// Insert a job and report it "up" to the controller.
    pub(crate) async fn add_job(&mut self, job: Job) -> Result<Job, SchedulerError> {
        self.put_job(JobRecord::new(&job, JobState::Up)).await?;
        self.jobs.insert(job.id.clone(), job.clone());
        Ok(job)
    }

    /// Delete a job and report it "down" to the controller.
    pub(crate) async fn remove_job(&mut self, job_id: &JobId) -> Result<Job, SchedulerError> {
        let job = self
            .jobs
            .remove(job_id)
            .ok_or_else(|| SchedulerError::JobNotFound(job_id.clone()))?;
        self.put_job(JobRecord::new(&job, JobState::Down)).await?;
        Ok(job)
    }

    /// Leader-gated controller write.
    async fn put_job(&self, record: JobRecord) -> Result<(), SchedulerError> {
        if !self.leader {
            debug!(job.id = %record.job_id, "not leader, skipping put_job");
            return Ok(());
        }
        self.controller.put_job(record).await?;
        Ok(())
    }

    pub(crate) fn publish(&self, event: Event) {
        debug!(event = %event.log_summary(), "emit");
        self.bus.publish(event);
    }

    pub(crate) fn enqueue_rectify(&self) {
        // Full queue means a run is already pending; they coalesce.
        let _ = self.rectify_tx.try_send(());
    }

    pub(crate) fn enqueue_formation_sync(&self) {
        let _ = self.formation_sync_tx.try_send(());
    }

    pub(crate) fn enqueue_formation_change(&self, expanded: ExpandedFormation) {
        if self.formation_tx.try_send(expanded).is_err() {
            warn!("formation change queue full, dropping; next sync will retry");
        }
    }

    pub(crate) fn enqueue_job_request(&self, request: JobRequest) {
        if self.job_request_tx.try_send(request).is_err() {
            warn!("job request queue full, dropping; next rectify will retry");
        }
    }
}

#[cfg(test)]
#[path = "../runtime_tests/mod.rs"]
mod tests;
