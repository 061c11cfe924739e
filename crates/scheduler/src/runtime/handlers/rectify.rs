// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! Scheduler ↔ observed: recompute drift between declared counts and
//! the jobs actually tracked.

use crate::error::SchedulerError;
use crate::runtime::Scheduler;
use herd_adapters::{ClusterClient, ControllerClient, VolumeProvisioner};
use herd_core::{counts_match, Clock, Event, ExpandedFormation, FormationKey, Processes};
use indexmap::IndexMap;
use tracing::{debug, warn};

impl<C, X, V, K> Scheduler<C, X, V, K>
where
    C: ControllerClient,
    X: ClusterClient,
    V: VolumeProvisioner,
    K: Clock,
{
    /// Compare per-(formation, type) job counts against the declared
    /// counts and queue formation changes that close the gap.
    ///
    /// The gap closes through an inversion: the declared counts are
    /// overwritten with the observed ones locally, and the queued change
    /// carries the *previous* declared counts, so the ordinary
    /// formation-change diff issues exactly the up/down requests that
    /// restore them. One diff-and-dispatch path serves both drift
    /// directions.
    pub(crate) async fn rectify_jobs(&mut self) {
        let result = self.rectify();
        if result.is_err() {
            // Declared state may be stale; re-arm a pull.
            self.enqueue_formation_sync();
        }
        self.publish(Event::RectifyJobs { error: result.err().map(|e| e.to_string()) });
    }

    fn rectify(&mut self) -> Result<(), SchedulerError> {
        // Observed per-formation, per-type counts.
        let mut observed: IndexMap<FormationKey, Processes> = IndexMap::new();
        for job in self.jobs.values() {
            *observed
                .entry(job.formation_key())
                .or_default()
                .entry(job.kind.clone())
                .or_insert(0) += 1;
        }

        let mut first_err: Option<SchedulerError> = None;
        let mut changes = Vec::new();

        for (key, counts) in &observed {
            let Some(formation) = self.formations.get_mut(key) else {
                warn!(formation = %key, "observed jobs for unknown formation");
                first_err.get_or_insert(SchedulerError::UnknownFormation(key.clone()));
                continue;
            };
            if counts_match(&formation.processes, counts) {
                continue;
            }
            debug!(formation = %key, "declared and observed counts drifted");
            let declared = std::mem::replace(&mut formation.processes, counts.clone());
            changes.push(ExpandedFormation::from_formation(formation, declared));
        }

        // Formations with no observed jobs at all: same inversion from
        // zero, unless they are declared all-zero anyway.
        for (key, formation) in self.formations.iter_mut() {
            if observed.contains_key(key) {
                continue;
            }
            if formation.processes.values().all(|&count| count == 0) {
                continue;
            }
            debug!(formation = %key, "no observed jobs for scaled formation");
            let declared = std::mem::take(&mut formation.processes);
            changes.push(ExpandedFormation::from_formation(formation, declared));
        }

        for expanded in changes {
            self.enqueue_formation_change(expanded);
        }

        match first_err {
            None => Ok(()),
            Some(err) => Err(err),
        }
    }
}
