// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! Scheduler errors.

use herd_adapters::{ClusterError, ControllerError, VolumeError};
use herd_core::{FormationKey, JobId, ReleaseId};
use thiserror::Error;

/// Errors surfaced on scheduler events.
///
/// None of these abort the loop: handlers attach them to the event they
/// emit and the next resync retries.
#[derive(Debug, Error)]
pub enum SchedulerError {
    #[error(transparent)]
    Controller(#[from] ControllerError),

    #[error(transparent)]
    Cluster(#[from] ClusterError),

    #[error(transparent)]
    Volume(#[from] VolumeError),

    #[error("no hosts available")]
    NoHosts,

    #[error("no formation for {0}")]
    UnknownFormation(FormationKey),

    #[error("job not found: {0}")]
    JobNotFound(JobId),

    #[error("no job of type {kind} to stop for {formation}")]
    NoVictim { formation: FormationKey, kind: String },

    #[error("process type {kind} not defined by release {release}")]
    MissingProcessType { release: ReleaseId, kind: String },

    #[error("scheduler stopped")]
    Stopped,
}
