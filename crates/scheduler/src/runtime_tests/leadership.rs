// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! Leadership gating: only a leader mutates the cluster or controller.

use super::*;
use crate::test_helpers::setup_with_leader;
use herd_adapters::HostJob;
use herd_core::JobMeta;

#[tokio::test]
async fn non_leader_drops_scale_requests() {
    let mut ctx = setup_with_leader(false);
    ctx.cluster.add_host("host-1");
    ctx.seed_formation("web", &[("web", 2)]).await;

    ctx.handle.sync_formations().await.unwrap();
    ctx.settle().await;

    // The formation change went through (desired state is tracked),
    // but no jobs started and nothing reached the controller.
    assert_eq!(ctx.scheduler.formations.len(), 1);
    assert!(ctx.scheduler.jobs.is_empty());
    assert!(ctx.controller.job_records().is_empty());
    let kinds = ctx.drained_kinds();
    assert!(!kinds.contains(&EventKind::JobStart));
}

#[tokio::test]
async fn non_leader_still_tracks_observed_jobs() {
    let mut ctx = setup_with_leader(false);
    let host = ctx.cluster.add_host("host-1");
    let key = ctx.seed_formation("web", &[]).await;
    ctx.handle.sync_formations().await.unwrap();
    ctx.settle().await;

    let meta = JobMeta {
        app_id: key.app_id.clone(),
        app_name: "web".into(),
        release_id: key.release_id.clone(),
        kind: "web".into(),
    };
    host.inject(HostJob::new("docker://web", vec![], meta.into_map()));
    ctx.scheduler.sync_jobs().await;

    // The observed view stays warm for fast failover, but a non-leader
    // does not report "up" to the controller.
    assert_eq!(ctx.scheduler.jobs.len(), 1);
    assert!(ctx.controller.job_records().is_empty());
}

#[tokio::test]
async fn losing_leadership_drains_pending_requests() {
    let mut ctx = setup();
    ctx.cluster.add_host("host-1");
    ctx.seed_formation("web", &[("web", 2)]).await;

    // Run only up to the formation change so the two start requests are
    // still queued.
    ctx.handle.sync_formations().await.unwrap();
    assert!(ctx.scheduler.dispatch_next().await); // formation sync
    assert!(ctx.scheduler.dispatch_next().await); // formation change

    ctx.handle.change_leader(false);
    ctx.scheduler.observe_leadership();
    ctx.settle().await;
    assert!(ctx.scheduler.jobs.is_empty());

    // Regaining leadership rebuilds the work through rectify.
    ctx.handle.change_leader(true);
    ctx.scheduler.observe_leadership();
    ctx.handle.rectify().await.unwrap();
    ctx.settle().await;
    assert_eq!(ctx.scheduler.jobs.len(), 2);
}

#[tokio::test]
async fn handle_reports_leadership() {
    let ctx = setup_with_leader(false);
    assert!(!ctx.handle.is_leader());
    ctx.handle.change_leader(true);
    assert!(ctx.handle.is_leader());
}
