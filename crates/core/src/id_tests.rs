// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

use crate::job::JobId;
use crate::records::AppId;

#[test]
fn minted_ids_carry_prefix() {
    let id = JobId::new();
    assert!(id.as_str().starts_with("job-"));
    assert_eq!(id.as_str().len(), JobId::PREFIX.len() + 19);
}

#[test]
fn minted_ids_are_unique() {
    let a = JobId::new();
    let b = JobId::new();
    assert_ne!(a, b);
}

#[test]
fn external_ids_stored_verbatim() {
    // Host-assigned IDs are arbitrary strings, including long ones.
    let id = JobId::from_string("host-1-6c1f2a9e-0f37-4a2b-9c3d-1d2e3f405162");
    assert_eq!(id.as_str(), "host-1-6c1f2a9e-0f37-4a2b-9c3d-1d2e3f405162");
    assert!(!id.is_empty());
}

#[test]
fn id_display_and_eq() {
    let id: AppId = "app-web".into();
    assert_eq!(id.to_string(), "app-web");
    assert_eq!(id, "app-web");
    assert_eq!(id, AppId::from_string("app-web"));
}

#[test]
fn id_serde_transparent() {
    let id = AppId::from_string("app-web");
    let json = serde_json::to_string(&id).unwrap();
    assert_eq!(json, "\"app-web\"");
    let parsed: AppId = serde_json::from_str(&json).unwrap();
    assert_eq!(parsed, id);
}

#[test]
fn short_truncates() {
    let id = JobId::from_string("abcdefghij");
    assert_eq!(id.short(4), "abcd");
    assert_eq!(id.short(64), "abcdefghij");
}
