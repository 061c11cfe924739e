// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! Seed scenarios: single start, scaling, adoption, drift, orphans.

use crate::harness::{self, grouped, host_job_for, key_for, seed_formation};
use herd_core::{Event, EventKind};

#[tokio::test]
async fn single_start() {
    let mut specs = harness::start(1, &[("web", &[("web", 1)])]).await;

    let event = specs.await_event(EventKind::JobStart).await;
    let Event::JobStart { job: Some(job), error: None } = event else {
        panic!("expected a started job, got {event:?}");
    };
    assert_eq!(job.kind, "web");
    assert_eq!(job.host_id, "host-1");
    assert_eq!(job.formation_key(), key_for("web"));

    // The periodic job sync keeps rectifying; the converged state holds
    // exactly the declared job.
    specs.await_event(EventKind::RectifyJobs).await;
    let jobs = specs.await_jobs(1).await;
    assert!(jobs.contains_key(&job.id));

    specs.stop().await;
}

#[tokio::test]
async fn scale_up() {
    let mut specs = harness::start(1, &[("web", &[("web", 1)])]).await;
    specs.await_jobs(1).await;

    specs.put(&key_for("web"), &[("web", 2)]).await;
    specs.await_event(EventKind::FormationChange).await;
    specs.await_event(EventKind::JobStart).await;

    specs.await_jobs(2).await;
    specs.stop().await;
}

#[tokio::test]
async fn scale_down() {
    let mut specs = harness::start(1, &[("web", &[("web", 2)])]).await;
    specs.await_jobs(2).await;

    specs.put(&key_for("web"), &[("web", 1)]).await;
    specs.await_event(EventKind::FormationChange).await;
    let stop = specs.await_event(EventKind::JobStop).await;
    assert!(stop.error().is_none());

    specs.await_jobs(1).await;
    specs.stop().await;
}

#[tokio::test]
async fn a_new_host_receives_the_next_job() {
    let mut specs = harness::start(1, &[("web", &[("web", 1)])]).await;
    specs.await_jobs(1).await;

    // A host joins the fleet; the next start lands on it, being the
    // least loaded.
    let joined = specs.cluster.add_host("host-2");
    specs.put(&key_for("web"), &[("web", 2)]).await;

    specs
        .await_event_where(EventKind::JobStart, |event| {
            matches!(event, Event::JobStart { job: Some(job), .. } if job.host_id == "host-2")
        })
        .await;
    specs.await_jobs(2).await;
    assert_eq!(joined.job_count(), 1);

    specs.stop().await;
}

#[tokio::test]
async fn new_formation_joins_a_running_scheduler() {
    let mut specs = harness::start(1, &[("web", &[("web", 1)])]).await;
    specs.await_jobs(1).await;

    // A second app arrives through the controller passthroughs and a
    // formation put.
    let other = seed_formation(&specs.controller, "api", &[("web", 1)]).await;
    specs.put(&other, &[("web", 1)]).await;

    specs.await_event_where(EventKind::JobStart, |event| {
        matches!(event, Event::JobStart { job: Some(job), .. } if job.app_id == other.app_id)
    })
    .await;

    let jobs = specs.await_jobs(2).await;
    assert_eq!(grouped(&jobs).len(), 2);
    let formations = specs.handle.formations().await.unwrap();
    assert_eq!(formations.len(), 2);

    specs.stop().await;
}

#[tokio::test]
async fn drift_repair_stops_the_surplus_job() {
    let mut specs = harness::start(1, &[("web", &[("web", 1)])]).await;
    let jobs = specs.await_jobs(1).await;
    let original = jobs.keys().next().unwrap().clone();

    // An out-of-band actor starts a second web job on the host.
    let extra = specs.hosts[0].inject(host_job_for(&key_for("web"), "web", "web"));

    // The sync adopts it, then rectify notices the surplus and a stop
    // follows, in that order for any single subscriber.
    specs
        .await_event_where(EventKind::JobStart, |event| {
            matches!(event, Event::JobStart { job: Some(job), .. } if job.id == extra)
        })
        .await;
    specs.await_event(EventKind::RectifyJobs).await;
    let stop = specs
        .await_event_where(EventKind::JobStop, |event| {
            matches!(event, Event::JobStop { job_id: Some(id), .. } if *id == extra)
        })
        .await;
    assert!(stop.error().is_none());

    let jobs = specs.await_jobs(1).await;
    assert!(jobs.contains_key(&original));
    assert!(!jobs.contains_key(&extra));
    assert!(!specs.hosts[0].contains_job(&extra));

    specs.stop().await;
}

#[tokio::test]
async fn orphan_jobs_are_refused() {
    let mut specs = harness::start(1, &[("web", &[("web", 1)])]).await;
    specs.await_jobs(1).await;

    // A job whose formation the scheduler has never heard of.
    let ghost = key_for("ghost");
    specs.hosts[0].inject(host_job_for(&ghost, "ghost", "web"));

    let refusal = specs
        .await_event_where(EventKind::JobStart, |event| {
            matches!(event, Event::JobStart { job: None, error: Some(_) })
        })
        .await;
    assert!(refusal.error().unwrap().contains(&*ghost.app_id));

    // Still exactly the one declared job.
    assert_eq!(specs.await_jobs(1).await.len(), 1);
    specs.stop().await;
}
