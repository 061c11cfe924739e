// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! Cluster and host client contracts: the fleet directory and the
//! worker nodes it addresses.

use async_trait::async_trait;
use herd_core::{HostId, JobId, JobStatus, VolumeId};
use std::collections::HashMap;
use std::sync::Arc;
use thiserror::Error;

/// Errors from cluster and host operations
#[derive(Debug, Error)]
pub enum ClusterError {
    #[error("host not found: {0}")]
    HostNotFound(HostId),
    #[error("job not found: {0}")]
    JobNotFound(JobId),
    #[error("host unreachable: {0}")]
    Unreachable(String),
}

/// Configuration for a job submitted to a host.
#[derive(Debug, Clone, PartialEq)]
pub struct HostJob {
    /// Job identifier; left empty by the scheduler, the host assigns one.
    pub id: JobId,
    /// Artifact URI the process runs from.
    pub artifact_uri: String,
    /// Command argv from the release's process spec.
    pub args: Vec<String>,
    /// Identity metadata (see [`herd_core::meta`]).
    pub metadata: HashMap<String, String>,
    /// Volume attached before start, for process types that request one.
    pub volume: Option<VolumeId>,
}

impl HostJob {
    pub fn new(
        artifact_uri: impl Into<String>,
        args: Vec<String>,
        metadata: HashMap<String, String>,
    ) -> Self {
        Self {
            id: JobId::from_string(""),
            artifact_uri: artifact_uri.into(),
            args,
            metadata,
            volume: None,
        }
    }
}

/// A job a host reports as present.
#[derive(Debug, Clone, PartialEq)]
pub struct ActiveJob {
    pub job: HostJob,
    pub status: JobStatus,
}

/// A single worker node.
#[async_trait]
pub trait HostClient: Send + Sync + 'static {
    fn id(&self) -> HostId;

    /// All jobs the host currently tracks, keyed by job ID.
    async fn list_jobs(&self) -> Result<HashMap<JobId, ActiveJob>, ClusterError>;

    /// Start a job. Returns the record with the host-assigned ID filled in.
    async fn add_job(&self, job: HostJob) -> Result<ActiveJob, ClusterError>;

    async fn stop_job(&self, id: &JobId) -> Result<(), ClusterError>;
}

/// The fleet directory.
#[async_trait]
pub trait ClusterClient: Send + Sync + 'static {
    type Host: HostClient;

    /// Every host currently in the fleet.
    async fn hosts(&self) -> Result<Vec<Arc<Self::Host>>, ClusterError>;

    /// One host by ID.
    async fn host(&self, id: &HostId) -> Result<Arc<Self::Host>, ClusterError>;
}
