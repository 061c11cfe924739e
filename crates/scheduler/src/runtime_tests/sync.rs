// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! SyncJobs behavior: adoption, orphan refusal, disappearance.

use super::*;
use herd_adapters::{HostClient, HostJob};
use herd_core::{Event, JobMeta};
use std::collections::HashMap;

/// Host job carrying the identity metadata for `key`.
fn host_job_for(key: &herd_core::FormationKey, app_name: &str, kind: &str) -> HostJob {
    let meta = JobMeta {
        app_id: key.app_id.clone(),
        app_name: app_name.into(),
        release_id: key.release_id.clone(),
        kind: kind.into(),
    };
    HostJob::new("docker://app", vec!["start".into(), kind.into()], meta.into_map())
}

#[tokio::test]
async fn adopts_jobs_with_known_formations() {
    let mut ctx = setup();
    let host = ctx.cluster.add_host("host-1");
    // Declared all-zero: the formation exists but starts nothing.
    let key = ctx.seed_formation("web", &[]).await;
    ctx.handle.sync_formations().await.unwrap();
    ctx.settle().await;
    ctx.drain_events();

    let injected = host.inject(host_job_for(&key, "web", "web"));
    ctx.scheduler.sync_jobs().await;

    assert_eq!(ctx.scheduler.jobs.len(), 1);
    let job = &ctx.scheduler.jobs[&injected];
    assert_eq!(job.host_id, "host-1");
    assert_eq!(job.kind, "web");

    let events = ctx.drain_events();
    assert!(matches!(&events[0], Event::JobStart { job: Some(job), error: None } if job.id == injected));
    assert_eq!(events[1], Event::ClusterSync { error: None });

    // Adoption is reported "up" to the controller.
    let records = ctx.controller.job_records();
    assert_eq!(records.len(), 1);
    assert_eq!(records[0].job_id, injected);
}

#[tokio::test]
async fn refuses_orphan_jobs() {
    let mut ctx = setup();
    let host = ctx.cluster.add_host("host-1");

    let key = herd_core::FormationKey::new("app-ghost".into(), "rel-ghost".into());
    host.inject(host_job_for(&key, "ghost", "web"));
    ctx.scheduler.sync_jobs().await;

    assert!(ctx.scheduler.jobs.is_empty());
    let events = ctx.drain_events();
    assert!(matches!(&events[0], Event::JobStart { job: None, error: Some(_) }));
    assert!(matches!(&events[1], Event::ClusterSync { error: Some(_) }));
    assert!(ctx.controller.job_records().is_empty());
}

#[tokio::test]
async fn skips_jobs_without_identity() {
    let mut ctx = setup();
    let host = ctx.cluster.add_host("host-1");
    host.inject(HostJob::new("docker://app", vec![], HashMap::new()));

    ctx.scheduler.sync_jobs().await;

    assert!(ctx.scheduler.jobs.is_empty());
    // Not an orphan, just untracked: no error on the sync.
    let events = ctx.drain_events();
    assert_eq!(events, vec![Event::ClusterSync { error: None }]);
}

#[tokio::test]
async fn sync_is_idempotent() {
    let mut ctx = setup();
    ctx.cluster.add_host("host-1");
    ctx.seed_formation("web", &[("web", 2)]).await;
    ctx.handle.sync_formations().await.unwrap();
    ctx.settle().await;

    let before = ctx.scheduler.jobs.clone();
    ctx.scheduler.sync_jobs().await;
    ctx.scheduler.sync_jobs().await;
    assert_eq!(ctx.scheduler.jobs, before);
}

#[tokio::test]
async fn drops_vanished_jobs_then_rectify_restarts() {
    let mut ctx = setup();
    let host = ctx.cluster.add_host("host-1");
    ctx.seed_formation("web", &[("web", 1)]).await;
    ctx.handle.sync_formations().await.unwrap();
    ctx.settle().await;
    let original = ctx.scheduler.jobs.keys().next().unwrap().clone();

    // The job dies out-of-band.
    host.stop_job(&original).await.unwrap();
    ctx.scheduler.sync_jobs().await;
    assert!(ctx.scheduler.jobs.is_empty());

    // The queued rectify restores the declared count.
    ctx.settle().await;
    assert_eq!(ctx.scheduler.jobs.len(), 1);
    assert!(!ctx.scheduler.jobs.contains_key(&original));
}

#[tokio::test]
async fn unreachable_host_is_skipped() {
    let mut ctx = setup();
    ctx.cluster.add_host("host-1");
    let lost = ctx.cluster.add_host("host-2");
    ctx.seed_formation("web", &[("web", 2)]).await;
    ctx.handle.sync_formations().await.unwrap();
    ctx.settle().await;
    assert_eq!(ctx.scheduler.jobs.len(), 2);
    ctx.drain_events();

    lost.set_offline(true);
    ctx.scheduler.sync_jobs().await;

    // The unreachable host's job leaves the map; the sync itself is not
    // an error. The next rectify replaces the lost capacity.
    assert_eq!(ctx.scheduler.jobs.len(), 1);
    let events = ctx.drain_events();
    assert_eq!(events.last(), Some(&Event::ClusterSync { error: None }));

    lost.set_offline(false);
    ctx.settle().await;
    assert_eq!(ctx.scheduler.jobs.len(), 2);
}

#[tokio::test]
async fn cluster_outage_reports_and_skips_rectify() {
    let mut ctx = setup();
    ctx.cluster.add_host("host-1");
    ctx.seed_formation("web", &[("web", 1)]).await;
    ctx.handle.sync_formations().await.unwrap();
    ctx.settle().await;
    ctx.drain_events();

    ctx.cluster.set_offline(true);
    ctx.scheduler.sync_jobs().await;

    // Observed state untouched, error surfaced, no rectify queued.
    assert_eq!(ctx.scheduler.jobs.len(), 1);
    let events = ctx.drain_events();
    assert!(matches!(&events[0], Event::ClusterSync { error: Some(_) }));
    assert!(ctx.scheduler.rectify_rx.try_recv().is_err());
}
