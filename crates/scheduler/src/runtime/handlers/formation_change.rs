// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! Apply a new desired process count to one formation.

use crate::runtime::Scheduler;
use herd_adapters::{ClusterClient, ControllerClient, VolumeProvisioner};
use herd_core::{Clock, Event, ExpandedFormation, JobRequest, ProcessDiff, RequestType};
use tracing::{debug, info};

impl<C, X, V, K> Scheduler<C, X, V, K>
where
    C: ControllerClient,
    X: ClusterClient,
    V: VolumeProvisioner,
    K: Clock,
{
    /// Locate or create the formation, diff the declared counts, and
    /// queue one job request per unit of difference.
    pub(crate) async fn handle_formation_change(&mut self, expanded: ExpandedFormation) {
        let key = expanded.key();
        let diff: ProcessDiff = match self.formations.get_mut(&key) {
            Some(formation) => formation.update(expanded.processes),
            None => {
                info!(
                    app.id = %key.app_id,
                    release.id = %key.release_id,
                    "creating formation"
                );
                let formation = self.formations.insert(expanded.into_formation());
                formation
                    .processes
                    .iter()
                    .filter(|(_, &count)| count > 0)
                    .map(|(kind, &count)| (kind.clone(), count as i64))
                    .collect()
            }
        };

        for (kind, delta) in &diff {
            debug!(
                app.id = %key.app_id,
                release.id = %key.release_id,
                kind = %kind,
                delta,
                "scaling"
            );
            let request_type = if *delta > 0 { RequestType::Up } else { RequestType::Down };
            for _ in 0..delta.unsigned_abs() {
                self.enqueue_job_request(JobRequest::new(
                    key.clone(),
                    request_type,
                    kind.clone(),
                ));
            }
        }

        self.publish(Event::FormationChange {
            app_id: key.app_id,
            release_id: key.release_id,
            error: None,
        });
    }
}
