// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! In-memory cluster and hosts.

use crate::cluster::{ActiveJob, ClusterClient, ClusterError, HostClient, HostJob};
use async_trait::async_trait;
use herd_core::{HostId, JobId, JobStatus};
use indexmap::IndexMap;
use parking_lot::Mutex;
use std::collections::HashMap;
use std::sync::Arc;

#[derive(Default, Debug)]
struct HostInner {
    jobs: HashMap<JobId, ActiveJob>,
    offline: bool,
}

/// In-memory [`HostClient`].
#[derive(Debug)]
pub struct MemHost {
    id: HostId,
    inner: Mutex<HostInner>,
}

impl MemHost {
    pub fn new(id: impl Into<HostId>) -> Self {
        Self { id: id.into(), inner: Mutex::new(HostInner::default()) }
    }

    /// Place a running job directly on the host, the way an out-of-band
    /// actor would. Returns the assigned job ID.
    pub fn inject(&self, mut job: HostJob) -> JobId {
        if job.id.is_empty() {
            job.id = JobId::new();
        }
        let id = job.id.clone();
        self.inner
            .lock()
            .jobs
            .insert(id.clone(), ActiveJob { job, status: JobStatus::Running });
        id
    }

    /// While offline, every call fails with [`ClusterError::Unreachable`].
    pub fn set_offline(&self, offline: bool) {
        self.inner.lock().offline = offline;
    }

    pub fn job_count(&self) -> usize {
        self.inner.lock().jobs.len()
    }

    pub fn contains_job(&self, id: &JobId) -> bool {
        self.inner.lock().jobs.contains_key(id)
    }

    fn check_online(&self) -> Result<(), ClusterError> {
        if self.inner.lock().offline {
            return Err(ClusterError::Unreachable(format!("host {} offline", self.id)));
        }
        Ok(())
    }
}

#[async_trait]
impl HostClient for MemHost {
    fn id(&self) -> HostId {
        self.id.clone()
    }

    async fn list_jobs(&self) -> Result<HashMap<JobId, ActiveJob>, ClusterError> {
        self.check_online()?;
        Ok(self.inner.lock().jobs.clone())
    }

    async fn add_job(&self, mut job: HostJob) -> Result<ActiveJob, ClusterError> {
        self.check_online()?;
        if job.id.is_empty() {
            job.id = JobId::new();
        }
        let active = ActiveJob { job, status: JobStatus::Starting };
        self.inner.lock().jobs.insert(active.job.id.clone(), active.clone());
        Ok(active)
    }

    async fn stop_job(&self, id: &JobId) -> Result<(), ClusterError> {
        self.check_online()?;
        self.inner
            .lock()
            .jobs
            .remove(id)
            .map(|_| ())
            .ok_or_else(|| ClusterError::JobNotFound(id.clone()))
    }
}

#[derive(Default)]
struct ClusterInner {
    hosts: IndexMap<HostId, Arc<MemHost>>,
    offline: bool,
}

/// In-memory [`ClusterClient`].
#[derive(Clone, Default)]
pub struct MemCluster {
    inner: Arc<Mutex<ClusterInner>>,
}

impl MemCluster {
    pub fn new() -> Self {
        Self::default()
    }

    /// Register a host and return a handle to it.
    pub fn add_host(&self, id: impl Into<HostId>) -> Arc<MemHost> {
        let host = Arc::new(MemHost::new(id));
        self.inner.lock().hosts.insert(host.id.clone(), host.clone());
        host
    }

    pub fn remove_host(&self, id: &HostId) {
        self.inner.lock().hosts.shift_remove(id);
    }

    /// While offline, `hosts()` and `host()` fail with
    /// [`ClusterError::Unreachable`].
    pub fn set_offline(&self, offline: bool) {
        self.inner.lock().offline = offline;
    }

    fn check_online(&self) -> Result<(), ClusterError> {
        if self.inner.lock().offline {
            return Err(ClusterError::Unreachable("cluster directory offline".into()));
        }
        Ok(())
    }
}

#[async_trait]
impl ClusterClient for MemCluster {
    type Host = MemHost;

    async fn hosts(&self) -> Result<Vec<Arc<MemHost>>, ClusterError> {
        self.check_online()?;
        Ok(self.inner.lock().hosts.values().cloned().collect())
    }

    async fn host(&self, id: &HostId) -> Result<Arc<MemHost>, ClusterError> {
        self.check_online()?;
        self.inner
            .lock()
            .hosts
            .get(id)
            .cloned()
            .ok_or_else(|| ClusterError::HostNotFound(id.clone()))
    }
}

#[cfg(test)]
#[path = "cluster_tests.rs"]
mod tests;
