// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! Declared → scheduler: pull formations from the controller.

use crate::error::SchedulerError;
use crate::runtime::Scheduler;
use herd_adapters::{ClusterClient, ControllerClient, VolumeProvisioner};
use herd_core::{App, Clock, Event, ExpandedFormation, FormationKey, FormationRecord};
use tracing::{info, warn};

impl<C, X, V, K> Scheduler<C, X, V, K>
where
    C: ControllerClient,
    X: ClusterClient,
    V: VolumeProvisioner,
    K: Clock,
{
    /// Pull declared formations from the controller, only when the
    /// scheduler currently holds none. Steady-state declared changes
    /// arrive through `put_formation` instead.
    pub(crate) async fn sync_formations(&mut self) {
        let error = if self.formations.is_empty() {
            self.pull_formations().await.err().map(|e| e.to_string())
        } else {
            None
        };
        self.publish(Event::FormationSync { error });
    }

    async fn pull_formations(&mut self) -> Result<(), SchedulerError> {
        let apps = self.controller.app_list().await?;
        let mut first_err: Option<SchedulerError> = None;

        for app in apps {
            let records = match self.controller.formation_list(&app.id).await {
                Ok(records) => records,
                Err(err) => {
                    warn!(app.id = %app.id, err = %err, "formation list failed");
                    first_err.get_or_insert(err.into());
                    continue;
                }
            };
            for record in records {
                if let Err(err) = self.update_formation(&app, record).await {
                    warn!(app.id = %app.id, err = %err, "formation resolution failed");
                    first_err.get_or_insert(err);
                }
            }
        }

        match first_err {
            None => Ok(()),
            Some(err) => Err(err),
        }
    }

    /// Queue a formation change for one declared record. A record seen
    /// for the first time has its release and artifact resolved through
    /// the controller; failure there is fatal for this formation only.
    async fn update_formation(
        &mut self,
        app: &App,
        record: FormationRecord,
    ) -> Result<(), SchedulerError> {
        let key = FormationKey::new(record.app_id.clone(), record.release_id.clone());
        let expanded = match self.formations.get(&key) {
            Some(formation) => ExpandedFormation::from_formation(formation, record.processes),
            None => {
                let release = self.controller.get_release(&record.release_id).await?;
                let artifact = self.controller.get_artifact(&release.artifact_id).await?;
                info!(
                    app.id = %record.app_id,
                    release.id = %record.release_id,
                    "resolved new formation"
                );
                ExpandedFormation {
                    app: app.clone(),
                    release,
                    artifact,
                    processes: record.processes,
                }
            }
        };
        self.enqueue_formation_change(expanded);
        Ok(())
    }
}
