// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

use super::*;
use crate::job::Job;
use crate::meta;

#[test]
fn job_record_carries_identity_and_meta() {
    let job = Job::builder().id("host-1-abc").host_id("host-1").kind("web").build();
    let record = JobRecord::new(&job, JobState::Up);

    assert_eq!(record.job_id, "host-1-abc");
    assert_eq!(record.host_id, "host-1");
    assert_eq!(record.kind, "web");
    assert_eq!(record.state, JobState::Up);
    assert_eq!(record.meta.get(meta::APP_KEY).map(String::as_str), Some("app-1"));
}

#[test]
fn job_state_serializes_lowercase() {
    assert_eq!(serde_json::to_string(&JobState::Up).unwrap(), "\"up\"");
    assert_eq!(serde_json::to_string(&JobState::Down).unwrap(), "\"down\"");
    assert_eq!(JobState::Down.to_string(), "down");
}

#[test]
fn job_record_kind_serializes_as_type() {
    let job = Job::builder().build();
    let record = JobRecord::new(&job, JobState::Down);
    let json = serde_json::to_value(&record).unwrap();
    assert_eq!(json["type"], "web");
    assert_eq!(json["state"], "down");
}

#[test]
fn release_process_specs_default() {
    let json = r#"{"id": "rel-1", "artifact_id": "art-1"}"#;
    let release: Release = serde_json::from_str(json).unwrap();
    assert!(release.processes.is_empty());

    let json = r#"{"id": "rel-1", "artifact_id": "art-1", "processes": {"web": {}}}"#;
    let release: Release = serde_json::from_str(json).unwrap();
    let spec = release.processes.get("web").unwrap();
    assert!(spec.args.is_empty());
    assert!(!spec.data);
}
