// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! Controller-side records: apps, releases, artifacts, declared
//! formations, and the job log entries reported back via `PutJob`.

use crate::formation::Processes;
use crate::job::{HostId, Job, JobId};
use crate::meta::JobMeta;
use indexmap::IndexMap;
use serde::{Deserialize, Serialize};
use std::collections::HashMap;

crate::define_id! {
    /// Identifier of an application registered with the controller.
    pub struct AppId("app-");
}

crate::define_id! {
    /// Identifier of a release (one immutable deploy unit of an app).
    pub struct ReleaseId("rel-");
}

crate::define_id! {
    /// Identifier of an artifact (the image a release runs from).
    pub struct ArtifactId("art-");
}

crate::define_id! {
    /// Identifier of a provisioned data volume.
    pub struct VolumeId("vol-");
}

/// An application registered with the controller.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct App {
    pub id: AppId,
    pub name: String,
}

impl App {
    pub fn new(id: AppId, name: impl Into<String>) -> Self {
        Self { id, name: name.into() }
    }
}

/// Launch description for one process type inside a release.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct ProcessSpec {
    /// Command argv the host runs for instances of this type.
    #[serde(default)]
    pub args: Vec<String>,
    /// Whether instances of this type get a data volume provisioned
    /// before start.
    #[serde(default)]
    pub data: bool,
}

/// One immutable deploy unit of an app: the artifact to run plus the
/// process types it defines.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Release {
    pub id: ReleaseId,
    pub artifact_id: ArtifactId,
    #[serde(default)]
    pub processes: IndexMap<String, ProcessSpec>,
}

/// The image a release runs from.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Artifact {
    pub id: ArtifactId,
    pub uri: String,
}

/// A declared formation as stored by the controller: desired process
/// counts for one (app, release) pair.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct FormationRecord {
    pub app_id: AppId,
    pub release_id: ReleaseId,
    #[serde(default)]
    pub processes: Processes,
}

/// Job state reported to the controller's job log.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum JobState {
    Up,
    Down,
}

crate::simple_display! {
    JobState {
        Up => "up",
        Down => "down",
    }
}

/// Entry reported to the controller's job log via `PutJob`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct JobRecord {
    pub job_id: JobId,
    pub app_id: AppId,
    pub release_id: ReleaseId,
    #[serde(rename = "type")]
    pub kind: String,
    pub host_id: HostId,
    pub state: JobState,
    #[serde(default)]
    pub meta: HashMap<String, String>,
}

impl JobRecord {
    /// Build the log entry for a job transition.
    pub fn new(job: &Job, state: JobState) -> Self {
        Self {
            job_id: job.id.clone(),
            app_id: job.app_id.clone(),
            release_id: job.release_id.clone(),
            kind: job.kind.clone(),
            host_id: job.host_id.clone(),
            state,
            meta: JobMeta::from(job).into_map(),
        }
    }
}

#[cfg(test)]
#[path = "records_tests.rs"]
mod tests;
