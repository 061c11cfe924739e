// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! RectifyJobs behavior: drift detection and the inversion trick.

use super::*;
use herd_adapters::HostJob;
use herd_core::{Event, JobBuilder, JobMeta};
use std::time::Duration;

fn host_job_for(key: &herd_core::FormationKey, kind: &str) -> HostJob {
    let meta = JobMeta {
        app_id: key.app_id.clone(),
        app_name: "web".into(),
        release_id: key.release_id.clone(),
        kind: kind.into(),
    };
    HostJob::new("docker://web", vec!["start".into(), kind.into()], meta.into_map())
}

#[tokio::test]
async fn surplus_job_is_stopped() {
    let mut ctx = setup();
    let host = ctx.cluster.add_host("host-1");
    let key = ctx.seed_formation("web", &[("web", 1)]).await;
    ctx.handle.sync_formations().await.unwrap();
    ctx.settle().await;
    let original = ctx.scheduler.jobs.keys().next().unwrap().clone();
    ctx.drain_events();

    // An out-of-band actor doubles the web count.
    ctx.clock.advance(Duration::from_secs(1));
    let extra = host.inject(host_job_for(&key, "web"));
    ctx.scheduler.sync_jobs().await;
    assert_eq!(ctx.scheduler.jobs.len(), 2);

    ctx.settle().await;

    // The youngest job (the adopted surplus) was the victim.
    assert_eq!(ctx.scheduler.jobs.len(), 1);
    assert!(ctx.scheduler.jobs.contains_key(&original));
    assert!(!ctx.scheduler.jobs.contains_key(&extra));
    assert!(!host.contains_job(&extra));

    // Declared counts are restored after the round-trip.
    let formation = ctx.scheduler.formations.get(&key).unwrap();
    assert_eq!(formation.processes, processes(&[("web", 1)]));

    // A subscriber sees the rectify before the stop it triggered.
    let kinds = ctx.drained_kinds();
    let rectify = kinds.iter().position(|kind| *kind == EventKind::RectifyJobs).unwrap();
    let stop = kinds.iter().position(|kind| *kind == EventKind::JobStop).unwrap();
    assert!(rectify < stop);
}

#[tokio::test]
async fn formation_with_no_jobs_is_restored() {
    let mut ctx = setup();
    ctx.cluster.add_host("host-1");
    let key = ctx.seed_formation("web", &[("web", 2)]).await;
    ctx.handle.sync_formations().await.unwrap();
    ctx.settle().await;

    // Wipe the observed side entirely.
    let ids: Vec<_> = ctx.scheduler.jobs.keys().cloned().collect();
    for id in &ids {
        ctx.scheduler.jobs.remove(id);
    }

    ctx.handle.rectify().await.unwrap();
    ctx.settle().await;

    assert_eq!(ctx.scheduler.jobs.len(), 2);
    let formation = ctx.scheduler.formations.get(&key).unwrap();
    assert_eq!(formation.processes, processes(&[("web", 2)]));
}

#[tokio::test]
async fn all_zero_formation_is_left_alone() {
    let mut ctx = setup();
    ctx.cluster.add_host("host-1");
    ctx.seed_formation("web", &[("web", 0)]).await;
    ctx.handle.sync_formations().await.unwrap();
    ctx.settle().await;
    ctx.drain_events();

    ctx.scheduler.rectify_jobs().await;

    assert!(ctx.scheduler.jobs.is_empty());
    let events = ctx.drain_events();
    assert_eq!(events, vec![Event::RectifyJobs { error: None }]);
    // No churn: nothing new queued.
    assert!(ctx.scheduler.formation_rx.try_recv().is_err());
}

#[tokio::test]
async fn matching_counts_queue_no_work() {
    let mut ctx = setup();
    ctx.cluster.add_host("host-1");
    ctx.seed_formation("web", &[("web", 2)]).await;
    ctx.handle.sync_formations().await.unwrap();
    ctx.settle().await;
    ctx.drain_events();

    ctx.scheduler.rectify_jobs().await;

    let events = ctx.drain_events();
    assert_eq!(events, vec![Event::RectifyJobs { error: None }]);
    assert!(ctx.scheduler.formation_rx.try_recv().is_err());
}

#[tokio::test]
async fn unknown_formation_errors_and_rearms_sync() {
    let mut ctx = setup();
    ctx.cluster.add_host("host-1");

    // A job that refers to a formation the scheduler never learned.
    // This state cannot arise through sync, which refuses orphans.
    let stray = JobBuilder::default().id("job-stray").app_id("app-ghost").build();
    ctx.scheduler.jobs.insert(stray.id.clone(), stray);

    ctx.scheduler.rectify_jobs().await;

    let events = ctx.drain_events();
    assert!(matches!(&events[0], Event::RectifyJobs { error: Some(_) }));
    // Declared state may be stale, so a formation sync was re-armed.
    assert!(ctx.scheduler.formation_sync_rx.try_recv().is_ok());
}
