// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! Volume provisioning contract for process types that request a data
//! volume.

use async_trait::async_trait;
use herd_core::{HostId, VolumeId};
use thiserror::Error;

/// Errors from volume provisioning
#[derive(Debug, Error)]
pub enum VolumeError {
    #[error("volume provisioning failed on {host}: {reason}")]
    ProvisionFailed { host: HostId, reason: String },
}

/// Provisions data volumes on hosts.
///
/// Called by the scheduler before `AddJob` when a process type declares
/// `data = true`; the returned volume ID travels in the host-job config.
#[async_trait]
pub trait VolumeProvisioner: Send + Sync + 'static {
    async fn provision(&self, host: &HostId) -> Result<VolumeId, VolumeError>;
}
