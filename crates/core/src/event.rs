// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! Events the scheduler publishes after each handler turn.
//!
//! Serializes with `{"type": "start-job", ...fields}` format so
//! subscribers can export the stream.

use crate::job::{Job, JobId};
use crate::records::{AppId, ReleaseId};
use serde::{Deserialize, Serialize};

/// Tag identifying an event's kind.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum EventKind {
    ClusterSync,
    FormationSync,
    FormationChange,
    RectifyJobs,
    JobStart,
    JobStop,
}

crate::simple_display! {
    EventKind {
        ClusterSync => "cluster-sync",
        FormationSync => "formation-sync",
        FormationChange => "formation-change",
        RectifyJobs => "rectify-jobs",
        JobStart => "start-job",
        JobStop => "stop-job",
    }
}

/// Events published on the scheduler bus.
///
/// Every variant carries an optional error; a handler that partially
/// failed still emits its event with the error attached (subscribers
/// decide whether to alert). `JobStart` additionally carries the started
/// or adopted job when there is one.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "type")]
pub enum Event {
    #[serde(rename = "cluster-sync")]
    ClusterSync {
        #[serde(default, skip_serializing_if = "Option::is_none")]
        error: Option<String>,
    },

    #[serde(rename = "formation-sync")]
    FormationSync {
        #[serde(default, skip_serializing_if = "Option::is_none")]
        error: Option<String>,
    },

    #[serde(rename = "formation-change")]
    FormationChange {
        app_id: AppId,
        release_id: ReleaseId,
        #[serde(default, skip_serializing_if = "Option::is_none")]
        error: Option<String>,
    },

    #[serde(rename = "rectify-jobs")]
    RectifyJobs {
        #[serde(default, skip_serializing_if = "Option::is_none")]
        error: Option<String>,
    },

    #[serde(rename = "start-job")]
    JobStart {
        #[serde(default, skip_serializing_if = "Option::is_none")]
        job: Option<Job>,
        #[serde(default, skip_serializing_if = "Option::is_none")]
        error: Option<String>,
    },

    #[serde(rename = "stop-job")]
    JobStop {
        #[serde(default, skip_serializing_if = "Option::is_none")]
        job_id: Option<JobId>,
        #[serde(default, skip_serializing_if = "Option::is_none")]
        error: Option<String>,
    },
}

impl Event {
    pub fn kind(&self) -> EventKind {
        match self {
            Event::ClusterSync { .. } => EventKind::ClusterSync,
            Event::FormationSync { .. } => EventKind::FormationSync,
            Event::FormationChange { .. } => EventKind::FormationChange,
            Event::RectifyJobs { .. } => EventKind::RectifyJobs,
            Event::JobStart { .. } => EventKind::JobStart,
            Event::JobStop { .. } => EventKind::JobStop,
        }
    }

    pub fn error(&self) -> Option<&str> {
        match self {
            Event::ClusterSync { error }
            | Event::FormationSync { error }
            | Event::FormationChange { error, .. }
            | Event::RectifyJobs { error }
            | Event::JobStart { error, .. }
            | Event::JobStop { error, .. } => error.as_deref(),
        }
    }

    pub fn is_error(&self) -> bool {
        self.error().is_some()
    }

    /// Compact one-line description for logs.
    pub fn log_summary(&self) -> String {
        let mut out = self.kind().to_string();
        match self {
            Event::FormationChange { app_id, release_id, .. } => {
                out.push_str(&format!(" app={} release={}", app_id, release_id));
            }
            Event::JobStart { job: Some(job), .. } => {
                out.push_str(&format!(
                    " job={} type={} host={}",
                    job.id, job.kind, job.host_id
                ));
            }
            Event::JobStop { job_id: Some(job_id), .. } => {
                out.push_str(&format!(" job={}", job_id));
            }
            _ => {}
        }
        if let Some(error) = self.error() {
            out.push_str(&format!(" err={:?}", error));
        }
        out
    }
}

#[cfg(test)]
#[path = "event_tests.rs"]
mod tests;
