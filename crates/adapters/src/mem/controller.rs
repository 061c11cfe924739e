// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! In-memory controller.

use crate::controller::{ControllerClient, ControllerError};
use async_trait::async_trait;
use herd_core::{
    App, AppId, Artifact, ArtifactId, FormationKey, FormationRecord, JobRecord, Release, ReleaseId,
};
use indexmap::IndexMap;
use parking_lot::Mutex;
use std::sync::Arc;

#[derive(Default)]
struct Inner {
    apps: IndexMap<AppId, App>,
    releases: IndexMap<ReleaseId, Release>,
    artifacts: IndexMap<ArtifactId, Artifact>,
    formations: IndexMap<FormationKey, FormationRecord>,
    job_records: Vec<JobRecord>,
    offline: bool,
}

/// In-memory [`ControllerClient`].
#[derive(Clone, Default)]
pub struct MemController {
    inner: Arc<Mutex<Inner>>,
}

impl MemController {
    pub fn new() -> Self {
        Self::default()
    }

    /// All `PutJob` records observed, oldest first.
    pub fn job_records(&self) -> Vec<JobRecord> {
        self.inner.lock().job_records.clone()
    }

    /// While offline, every call fails with
    /// [`ControllerError::Unavailable`].
    pub fn set_offline(&self, offline: bool) {
        self.inner.lock().offline = offline;
    }

    fn check_online(&self) -> Result<(), ControllerError> {
        if self.inner.lock().offline {
            return Err(ControllerError::Unavailable("controller offline".into()));
        }
        Ok(())
    }
}

#[async_trait]
impl ControllerClient for MemController {
    async fn app_list(&self) -> Result<Vec<App>, ControllerError> {
        self.check_online()?;
        Ok(self.inner.lock().apps.values().cloned().collect())
    }

    async fn formation_list(
        &self,
        app_id: &AppId,
    ) -> Result<Vec<FormationRecord>, ControllerError> {
        self.check_online()?;
        Ok(self
            .inner
            .lock()
            .formations
            .values()
            .filter(|record| &record.app_id == app_id)
            .cloned()
            .collect())
    }

    async fn get_release(&self, id: &ReleaseId) -> Result<Release, ControllerError> {
        self.check_online()?;
        self.inner
            .lock()
            .releases
            .get(id)
            .cloned()
            .ok_or_else(|| ControllerError::NotFound(format!("release {id}")))
    }

    async fn get_artifact(&self, id: &ArtifactId) -> Result<Artifact, ControllerError> {
        self.check_online()?;
        self.inner
            .lock()
            .artifacts
            .get(id)
            .cloned()
            .ok_or_else(|| ControllerError::NotFound(format!("artifact {id}")))
    }

    async fn put_job(&self, record: JobRecord) -> Result<(), ControllerError> {
        self.check_online()?;
        self.inner.lock().job_records.push(record);
        Ok(())
    }

    async fn create_app(&self, app: App) -> Result<App, ControllerError> {
        self.check_online()?;
        self.inner.lock().apps.insert(app.id.clone(), app.clone());
        Ok(app)
    }

    async fn create_release(&self, release: Release) -> Result<Release, ControllerError> {
        self.check_online()?;
        self.inner.lock().releases.insert(release.id.clone(), release.clone());
        Ok(release)
    }

    async fn create_artifact(&self, artifact: Artifact) -> Result<Artifact, ControllerError> {
        self.check_online()?;
        self.inner.lock().artifacts.insert(artifact.id.clone(), artifact.clone());
        Ok(artifact)
    }

    async fn put_formation(&self, record: FormationRecord) -> Result<(), ControllerError> {
        self.check_online()?;
        let key = FormationKey::new(record.app_id.clone(), record.release_id.clone());
        self.inner.lock().formations.insert(key, record);
        Ok(())
    }
}

#[cfg(test)]
#[path = "controller_tests.rs"]
mod tests;
