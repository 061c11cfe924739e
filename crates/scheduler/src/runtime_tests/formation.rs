// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! Formation-change and formation-sync behavior.

use super::*;
use herd_core::Event;

#[tokio::test]
async fn new_formation_starts_declared_jobs() {
    let mut ctx = setup();
    ctx.cluster.add_host("host-1");
    ctx.seed_formation("web", &[("web", 2)]).await;

    ctx.handle.sync_formations().await.unwrap();
    ctx.settle().await;

    let jobs = &ctx.scheduler.jobs;
    assert_eq!(jobs.len(), 2);
    assert!(jobs.values().all(|job| job.kind == "web" && job.host_id == "host-1"));

    let kinds = ctx.drained_kinds();
    assert_eq!(
        kinds,
        vec![
            EventKind::FormationSync,
            EventKind::FormationChange,
            EventKind::JobStart,
            EventKind::JobStart,
        ]
    );
}

#[tokio::test]
async fn formation_sync_only_pulls_when_empty() {
    let mut ctx = setup();
    ctx.cluster.add_host("host-1");
    let key = ctx.seed_formation("web", &[("web", 1)]).await;

    ctx.handle.sync_formations().await.unwrap();
    ctx.settle().await;
    assert_eq!(ctx.scheduler.jobs.len(), 1);

    // Bump the declared count behind the scheduler's back; a second sync
    // must not pull it, since steady-state changes arrive via put_formation.
    let record = herd_core::FormationRecord {
        app_id: key.app_id.clone(),
        release_id: key.release_id.clone(),
        processes: processes(&[("web", 5)]),
    };
    herd_adapters::ControllerClient::put_formation(&ctx.controller, record).await.unwrap();

    ctx.handle.sync_formations().await.unwrap();
    ctx.settle().await;
    assert_eq!(ctx.scheduler.jobs.len(), 1);
}

#[tokio::test]
async fn scale_up_adds_jobs() {
    let mut ctx = setup();
    ctx.cluster.add_host("host-1");
    let key = ctx.seed_formation("web", &[("web", 1)]).await;
    ctx.handle.sync_formations().await.unwrap();
    ctx.settle().await;
    ctx.drain_events();

    let expanded = ctx.expanded(&key, &[("web", 3)]).await;
    ctx.handle.put_formation(expanded).await.unwrap();
    ctx.settle().await;

    assert_eq!(ctx.scheduler.jobs.len(), 3);
    let kinds = ctx.drained_kinds();
    assert_eq!(
        kinds,
        vec![EventKind::FormationChange, EventKind::JobStart, EventKind::JobStart]
    );
}

#[tokio::test]
async fn scale_down_stops_jobs() {
    let mut ctx = setup();
    ctx.cluster.add_host("host-1");
    let key = ctx.seed_formation("web", &[("web", 3)]).await;
    ctx.handle.sync_formations().await.unwrap();
    ctx.settle().await;
    ctx.drain_events();

    let expanded = ctx.expanded(&key, &[("web", 1)]).await;
    ctx.handle.put_formation(expanded).await.unwrap();
    ctx.settle().await;

    assert_eq!(ctx.scheduler.jobs.len(), 1);
    let kinds = ctx.drained_kinds();
    assert_eq!(
        kinds,
        vec![EventKind::FormationChange, EventKind::JobStop, EventKind::JobStop]
    );
    // The hosts agree.
    let host = ctx.cluster.hosts().await.unwrap().remove(0);
    assert_eq!(host.job_count(), 1);
}

#[tokio::test]
async fn scale_to_zero_keeps_the_formation() {
    let mut ctx = setup();
    ctx.cluster.add_host("host-1");
    let key = ctx.seed_formation("web", &[("web", 2)]).await;
    ctx.handle.sync_formations().await.unwrap();
    ctx.settle().await;

    let expanded = ctx.expanded(&key, &[("web", 0)]).await;
    ctx.handle.put_formation(expanded).await.unwrap();
    ctx.settle().await;

    assert!(ctx.scheduler.jobs.is_empty());
    // Scaled to all-zero, the formation stays so future scale-ups share
    // the key.
    assert!(ctx.scheduler.formations.contains_key(&key));
}

#[tokio::test]
async fn dropping_a_type_stops_its_jobs() {
    let mut ctx = setup();
    ctx.cluster.add_host("host-1");
    let key = ctx.seed_formation("app", &[("web", 1), ("worker", 2)]).await;
    ctx.handle.sync_formations().await.unwrap();
    ctx.settle().await;
    assert_eq!(ctx.scheduler.jobs.len(), 3);

    let expanded = ctx.expanded(&key, &[("web", 1)]).await;
    ctx.handle.put_formation(expanded).await.unwrap();
    ctx.settle().await;

    assert_eq!(ctx.scheduler.jobs.len(), 1);
    assert!(ctx.scheduler.jobs.values().all(|job| job.kind == "web"));
}

#[tokio::test]
async fn second_formation_coexists() {
    let mut ctx = setup();
    ctx.cluster.add_host("host-1");
    ctx.seed_formation("web", &[("web", 1)]).await;
    ctx.handle.sync_formations().await.unwrap();
    ctx.settle().await;

    // A formation created after the initial pull arrives fully expanded.
    let other = ctx.seed_formation("api", &[("web", 1)]).await;
    let expanded = ctx.expanded(&other, &[("web", 1)]).await;
    ctx.handle.put_formation(expanded).await.unwrap();
    ctx.settle().await;

    assert_eq!(ctx.scheduler.jobs.len(), 2);
    assert_eq!(ctx.scheduler.formations.len(), 2);

    let start_events = ctx
        .drain_events()
        .into_iter()
        .filter(|event| matches!(event, Event::JobStart { .. }))
        .count();
    assert_eq!(start_events, 2);
}
