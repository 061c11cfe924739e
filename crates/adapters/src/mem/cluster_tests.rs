// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

use super::*;
use crate::cluster::HostJob;
use herd_core::JobMeta;

fn host_job() -> HostJob {
    let meta = JobMeta {
        app_id: "app-1".into(),
        app_name: "example".into(),
        release_id: "rel-1".into(),
        kind: "web".into(),
    };
    HostJob::new("docker://example", vec!["start".into(), "web".into()], meta.into_map())
}

#[tokio::test]
async fn add_job_assigns_an_id() {
    let host = MemHost::new("host-1");
    let active = host.add_job(host_job()).await.unwrap();

    assert!(!active.job.id.is_empty());
    assert_eq!(active.status, JobStatus::Starting);
    assert!(host.contains_job(&active.job.id));

    let listed = host.list_jobs().await.unwrap();
    assert_eq!(listed.len(), 1);
    assert!(listed.contains_key(&active.job.id));
}

#[tokio::test]
async fn stop_job_removes_and_errors_on_missing() {
    let host = MemHost::new("host-1");
    let active = host.add_job(host_job()).await.unwrap();

    host.stop_job(&active.job.id).await.unwrap();
    assert_eq!(host.job_count(), 0);

    let err = host.stop_job(&active.job.id).await.unwrap_err();
    assert!(matches!(err, ClusterError::JobNotFound(_)));
}

#[tokio::test]
async fn injected_jobs_show_up_running() {
    let host = MemHost::new("host-1");
    let id = host.inject(host_job());

    let listed = host.list_jobs().await.unwrap();
    assert_eq!(listed[&id].status, JobStatus::Running);
}

#[tokio::test]
async fn offline_host_is_unreachable() {
    let host = MemHost::new("host-1");
    host.set_offline(true);

    assert!(matches!(host.list_jobs().await, Err(ClusterError::Unreachable(_))));
    assert!(matches!(host.add_job(host_job()).await, Err(ClusterError::Unreachable(_))));

    host.set_offline(false);
    assert!(host.list_jobs().await.is_ok());
}

#[tokio::test]
async fn cluster_directory_tracks_hosts() {
    let cluster = MemCluster::new();
    let first = cluster.add_host("host-1");
    cluster.add_host("host-2");

    let hosts = cluster.hosts().await.unwrap();
    assert_eq!(hosts.len(), 2);
    // Registration order is preserved.
    assert_eq!(hosts[0].id(), "host-1");

    let found = cluster.host(&first.id()).await.unwrap();
    assert_eq!(found.id(), "host-1");

    cluster.remove_host(&first.id());
    let err = cluster.host(&HostId::from_string("host-1")).await.unwrap_err();
    assert!(matches!(err, ClusterError::HostNotFound(_)));
}
