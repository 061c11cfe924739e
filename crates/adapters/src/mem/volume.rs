// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! In-memory volume provisioner.

use crate::volume::{VolumeError, VolumeProvisioner};
use async_trait::async_trait;
use herd_core::{HostId, VolumeId};
use parking_lot::Mutex;
use std::sync::Arc;

#[derive(Default)]
struct Inner {
    provisioned: Vec<(VolumeId, HostId)>,
    failing: bool,
}

/// In-memory [`VolumeProvisioner`] that mints volume IDs and records
/// which host each one landed on.
#[derive(Clone, Default)]
pub struct MemVolumes {
    inner: Arc<Mutex<Inner>>,
}

impl MemVolumes {
    pub fn new() -> Self {
        Self::default()
    }

    /// Every provisioned volume with the host it was created on.
    pub fn provisioned(&self) -> Vec<(VolumeId, HostId)> {
        self.inner.lock().provisioned.clone()
    }

    /// While failing, `provision` returns
    /// [`VolumeError::ProvisionFailed`].
    pub fn set_failing(&self, failing: bool) {
        self.inner.lock().failing = failing;
    }
}

#[async_trait]
impl VolumeProvisioner for MemVolumes {
    async fn provision(&self, host: &HostId) -> Result<VolumeId, VolumeError> {
        let mut inner = self.inner.lock();
        if inner.failing {
            return Err(VolumeError::ProvisionFailed {
                host: host.clone(),
                reason: "no capacity".into(),
            });
        }
        let id = VolumeId::new();
        inner.provisioned.push((id.clone(), host.clone()));
        Ok(id)
    }
}
