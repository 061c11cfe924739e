// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! Controller client contract: the persistent source of declared state.

use async_trait::async_trait;
use herd_core::{
    App, AppId, Artifact, ArtifactId, FormationRecord, JobRecord, Release, ReleaseId,
};
use thiserror::Error;

/// Errors from controller operations
#[derive(Debug, Error)]
pub enum ControllerError {
    #[error("not found: {0}")]
    NotFound(String),
    #[error("controller unavailable: {0}")]
    Unavailable(String),
    #[error("conflict: {0}")]
    Conflict(String),
}

/// The persistent source of declared state.
///
/// The scheduler reads apps, declared formations, releases, and
/// artifacts from the controller, and reports every job state
/// transition back through [`put_job`](Self::put_job).
#[async_trait]
pub trait ControllerClient: Send + Sync + 'static {
    /// All registered applications.
    async fn app_list(&self) -> Result<Vec<App>, ControllerError>;

    /// Declared formations for one application.
    async fn formation_list(
        &self,
        app_id: &AppId,
    ) -> Result<Vec<FormationRecord>, ControllerError>;

    async fn get_release(&self, id: &ReleaseId) -> Result<Release, ControllerError>;

    async fn get_artifact(&self, id: &ArtifactId) -> Result<Artifact, ControllerError>;

    /// Append a job transition ("up"/"down") to the controller's job log.
    async fn put_job(&self, record: JobRecord) -> Result<(), ControllerError>;

    async fn create_app(&self, app: App) -> Result<App, ControllerError>;

    async fn create_release(&self, release: Release) -> Result<Release, ControllerError>;

    async fn create_artifact(&self, artifact: Artifact) -> Result<Artifact, ControllerError>;

    /// Store the declared process counts for one (app, release) pair.
    async fn put_formation(&self, record: FormationRecord) -> Result<(), ControllerError>;
}
