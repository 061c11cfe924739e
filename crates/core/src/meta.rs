// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! Job identity metadata shared with hosts.
//!
//! Every job the scheduler starts carries these keys in its host
//! metadata map; `SyncJobs` reads them back to tie a discovered job to
//! its formation. The key names are fixed by the wire contract with
//! hosts and the controller.

use crate::job::Job;
use crate::records::{AppId, ReleaseId};
use std::collections::HashMap;

pub const APP_KEY: &str = "flynn-controller.app";
pub const APP_NAME_KEY: &str = "flynn-controller.app_name";
pub const RELEASE_KEY: &str = "flynn-controller.release";
pub const TYPE_KEY: &str = "flynn-controller.type";

/// Identity a job carries in its host metadata map.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct JobMeta {
    pub app_id: AppId,
    pub app_name: String,
    pub release_id: ReleaseId,
    pub kind: String,
}

impl JobMeta {
    /// Read identity out of a host metadata map. Missing keys come back
    /// as empty values; callers check [`is_complete`](Self::is_complete)
    /// before trusting the result.
    pub fn from_map(map: &HashMap<String, String>) -> Self {
        let get = |key: &str| map.get(key).cloned().unwrap_or_default();
        Self {
            app_id: AppId::from_string(get(APP_KEY)),
            app_name: get(APP_NAME_KEY),
            release_id: ReleaseId::from_string(get(RELEASE_KEY)),
            kind: get(TYPE_KEY),
        }
    }

    /// Render the identity into the metadata map attached to a host job.
    pub fn into_map(self) -> HashMap<String, String> {
        HashMap::from([
            (APP_KEY.to_string(), self.app_id.as_str().to_string()),
            (APP_NAME_KEY.to_string(), self.app_name),
            (RELEASE_KEY.to_string(), self.release_id.as_str().to_string()),
            (TYPE_KEY.to_string(), self.kind),
        ])
    }

    /// A job without an app or release cannot be tied to a formation.
    pub fn is_complete(&self) -> bool {
        !self.app_id.is_empty() && !self.release_id.is_empty()
    }
}

impl From<&Job> for JobMeta {
    fn from(job: &Job) -> Self {
        Self {
            app_id: job.app_id.clone(),
            app_name: job.app_name.clone(),
            release_id: job.release_id.clone(),
            kind: job.kind.clone(),
        }
    }
}

#[cfg(test)]
#[path = "meta_tests.rs"]
mod tests;
