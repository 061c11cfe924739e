// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! Scale requests: one unit of up/down work per queue entry.

use crate::formation::FormationKey;
use crate::job::{HostId, JobId};
use serde::{Deserialize, Serialize};

/// Direction of a unit of scale work.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum RequestType {
    Up,
    Down,
}

crate::simple_display! {
    RequestType {
        Up => "up",
        Down => "down",
    }
}

/// A single scale step for one (formation, process type).
///
/// Carries the formation's key rather than the formation itself; the
/// handler resolves it at dispatch time so it always acts on current
/// state. `host_id` and `job_id` name a specific victim for `Down`
/// requests; when absent the handler selects one.
#[derive(Debug, Clone, PartialEq)]
pub struct JobRequest {
    pub formation: FormationKey,
    pub request_type: RequestType,
    /// Process type name within the release.
    pub kind: String,
    pub host_id: Option<HostId>,
    pub job_id: Option<JobId>,
}

impl JobRequest {
    pub fn new(formation: FormationKey, request_type: RequestType, kind: impl Into<String>) -> Self {
        Self { formation, request_type, kind: kind.into(), host_id: None, job_id: None }
    }

    pub fn up(formation: FormationKey, kind: impl Into<String>) -> Self {
        Self::new(formation, RequestType::Up, kind)
    }

    pub fn down(formation: FormationKey, kind: impl Into<String>) -> Self {
        Self::new(formation, RequestType::Down, kind)
    }

    crate::setters! {
        option {
            host_id: HostId,
            job_id: JobId,
        }
    }
}
