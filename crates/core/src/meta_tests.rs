// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

use super::*;
use crate::job::Job;

#[test]
fn meta_round_trips_through_map() {
    let meta = JobMeta {
        app_id: AppId::from_string("app-1"),
        app_name: "example".into(),
        release_id: ReleaseId::from_string("rel-1"),
        kind: "web".into(),
    };
    let map = meta.clone().into_map();

    assert_eq!(map.get(APP_KEY).map(String::as_str), Some("app-1"));
    assert_eq!(map.get(APP_NAME_KEY).map(String::as_str), Some("example"));
    assert_eq!(map.get(RELEASE_KEY).map(String::as_str), Some("rel-1"));
    assert_eq!(map.get(TYPE_KEY).map(String::as_str), Some("web"));
    assert_eq!(JobMeta::from_map(&map), meta);
}

#[test]
fn missing_keys_read_as_empty() {
    let meta = JobMeta::from_map(&HashMap::new());
    assert!(meta.app_id.is_empty());
    assert!(meta.release_id.is_empty());
    assert!(!meta.is_complete());
}

#[test]
fn complete_requires_app_and_release() {
    let mut map = HashMap::new();
    map.insert(APP_KEY.to_string(), "app-1".to_string());
    assert!(!JobMeta::from_map(&map).is_complete());

    map.insert(RELEASE_KEY.to_string(), "rel-1".to_string());
    assert!(JobMeta::from_map(&map).is_complete());
}

#[test]
fn meta_from_job() {
    let job = Job::builder().app_id("app-2").app_name("other").kind("worker").build();
    let meta = JobMeta::from(&job);
    assert_eq!(meta.app_id, "app-2");
    assert_eq!(meta.app_name, "other");
    assert_eq!(meta.kind, "worker");
}
