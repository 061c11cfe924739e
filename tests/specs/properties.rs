// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! Universal properties: convergence, idempotent sync, controller
//! round-trip.

use crate::harness::{self, grouped, key_for, processes};
use herd_core::{EventKind, JobState};
use std::collections::HashMap;
use std::time::Duration;

#[tokio::test]
async fn converges_on_the_final_declared_counts() {
    let specs = harness::start(2, &[("app", &[("web", 1)])]).await;
    let key = key_for("app");
    specs.await_jobs(1).await;

    // A burst of declared changes; only the last one must win.
    for counts in [
        &[("web", 3)][..],
        &[("web", 2), ("worker", 2)][..],
        &[("web", 0), ("worker", 1)][..],
    ] {
        specs.put(&key, counts).await;
    }

    let deadline = tokio::time::Instant::now() + Duration::from_secs(5);
    loop {
        let jobs = specs.handle.jobs().await.unwrap();
        let want: HashMap<_, _> = processes(&[("worker", 1)])
            .into_iter()
            .map(|(kind, count)| ((key.clone(), kind), count))
            .collect();
        if grouped(&jobs) == want {
            break;
        }
        if tokio::time::Instant::now() > deadline {
            panic!("never converged: {:?}", grouped(&jobs));
        }
        tokio::time::sleep(Duration::from_millis(10)).await;
    }
    specs.stop().await;
}

#[tokio::test]
async fn back_to_back_syncs_change_nothing() {
    let specs = harness::start(1, &[("web", &[("web", 2)])]).await;
    specs.await_jobs(2).await;

    let before = specs.handle.jobs().await.unwrap();
    specs.handle.sync_jobs().await.unwrap();
    specs.handle.sync_jobs().await.unwrap();
    // Let both syncs (and their rectifies) run.
    tokio::time::sleep(Duration::from_millis(100)).await;

    let after = specs.handle.jobs().await.unwrap();
    assert_eq!(before.keys().collect::<std::collections::BTreeSet<_>>(),
        after.keys().collect::<std::collections::BTreeSet<_>>());
    specs.stop().await;
}

#[tokio::test]
async fn every_transition_reaches_the_controller() {
    let mut specs = harness::start(1, &[("web", &[("web", 2)])]).await;
    specs.await_jobs(2).await;

    specs.put(&key_for("web"), &[("web", 1)]).await;
    specs.await_event(EventKind::JobStop).await;
    specs.await_jobs(1).await;

    let records = specs.controller.job_records();
    let ups: Vec<_> = records.iter().filter(|r| r.state == JobState::Up).collect();
    let downs: Vec<_> = records.iter().filter(|r| r.state == JobState::Down).collect();
    assert_eq!(ups.len(), 2);
    assert_eq!(downs.len(), 1);
    // The stopped job was previously reported up.
    assert!(ups.iter().any(|up| up.job_id == downs[0].job_id));
    for record in &records {
        assert_eq!(record.host_id, "host-1");
        assert_eq!(record.kind, "web");
    }

    specs.stop().await;
}

#[tokio::test]
async fn subscribers_share_one_event_order() {
    // Start with nothing declared so both subscriptions exist before the
    // first job event.
    let mut specs = harness::start(1, &[]).await;
    let mut other = specs.handle.subscribe();
    harness::seed_formation(&specs.controller, "web", &[("web", 1)]).await;
    specs.put(&key_for("web"), &[("web", 1)]).await;

    specs.await_event(EventKind::JobStart).await;
    specs.put(&key_for("web"), &[("web", 0)]).await;
    specs.await_event(EventKind::JobStop).await;
    specs.await_jobs(0).await;
    specs.stop().await;

    // Replay the second subscription: stop-job never precedes start-job.
    let mut seen = Vec::new();
    while let Some(event) = other.try_recv() {
        seen.push(event.kind());
    }
    let start = seen.iter().position(|kind| *kind == EventKind::JobStart);
    let stop = seen.iter().position(|kind| *kind == EventKind::JobStop);
    assert!(start.unwrap() < stop.unwrap());
    assert_eq!(other.missed(), 0);
}
