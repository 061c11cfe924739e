// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! HandleJobRequest behavior: host selection, volumes, victims.

use super::*;
use herd_core::{Event, HostId, JobRequest};
use std::collections::HashMap;
use std::time::Duration;

#[tokio::test]
async fn spreads_jobs_over_least_loaded_hosts() {
    let mut ctx = setup();
    ctx.cluster.add_host("host-1");
    ctx.cluster.add_host("host-2");
    ctx.seed_formation("web", &[("web", 4)]).await;

    ctx.handle.sync_formations().await.unwrap();
    ctx.settle().await;

    let mut by_host: HashMap<HostId, usize> = HashMap::new();
    for job in ctx.scheduler.jobs.values() {
        *by_host.entry(job.host_id.clone()).or_insert(0) += 1;
    }
    assert_eq!(by_host.get(&HostId::from("host-1")), Some(&2));
    assert_eq!(by_host.get(&HostId::from("host-2")), Some(&2));
}

#[tokio::test]
async fn load_counts_per_process_type() {
    let mut ctx = setup();
    ctx.cluster.add_host("host-1");
    ctx.cluster.add_host("host-2");
    // Two worker jobs land one per host; the web job then goes to the
    // host with fewer *web* jobs, which is the fleet-order first.
    ctx.seed_formation("app", &[("worker", 2), ("web", 1)]).await;

    ctx.handle.sync_formations().await.unwrap();
    ctx.settle().await;

    let web_host = ctx
        .scheduler
        .jobs
        .values()
        .find(|job| job.kind == "web")
        .map(|job| job.host_id.clone())
        .unwrap();
    assert_eq!(web_host, "host-1");
}

#[tokio::test]
async fn honors_an_explicitly_requested_host() {
    let mut ctx = setup();
    ctx.cluster.add_host("host-1");
    ctx.cluster.add_host("host-2");
    let key = ctx.seed_formation("web", &[]).await;
    ctx.handle.sync_formations().await.unwrap();
    ctx.settle().await;

    let request = JobRequest::up(key, "web").host_id(HostId::from_string("host-2"));
    ctx.scheduler.handle_job_request(request).await;

    assert_eq!(ctx.scheduler.jobs.len(), 1);
    assert!(ctx.scheduler.jobs.values().all(|job| job.host_id == "host-2"));
}

#[tokio::test]
async fn start_without_hosts_reports_the_failure() {
    let mut ctx = setup();
    ctx.seed_formation("web", &[("web", 1)]).await;

    ctx.handle.sync_formations().await.unwrap();
    ctx.settle().await;

    assert!(ctx.scheduler.jobs.is_empty());
    let starts: Vec<Event> = ctx
        .drain_events()
        .into_iter()
        .filter(|event| event.kind() == EventKind::JobStart)
        .collect();
    assert_eq!(starts.len(), 1);
    assert!(matches!(&starts[0], Event::JobStart { job: None, error: Some(err) }
        if err.contains("no hosts")));
}

#[tokio::test]
async fn data_types_get_a_volume_before_start() {
    let mut ctx = setup();
    let host = ctx.cluster.add_host("host-1");
    ctx.seed_formation_with_data("db", &[("postgres", 1)], true).await;

    ctx.handle.sync_formations().await.unwrap();
    ctx.settle().await;

    assert_eq!(ctx.scheduler.jobs.len(), 1);
    let provisioned = ctx.volumes.provisioned();
    assert_eq!(provisioned.len(), 1);
    assert_eq!(provisioned[0].1, "host-1");

    // The volume binding traveled in the host-job config.
    let listed = herd_adapters::HostClient::list_jobs(&*host).await.unwrap();
    let active = listed.values().next().unwrap();
    assert_eq!(active.job.volume.as_ref(), Some(&provisioned[0].0));
}

#[tokio::test]
async fn volume_failure_fails_the_start() {
    let mut ctx = setup();
    let host = ctx.cluster.add_host("host-1");
    ctx.volumes.set_failing(true);
    ctx.seed_formation_with_data("db", &[("postgres", 1)], true).await;

    ctx.handle.sync_formations().await.unwrap();
    ctx.settle().await;

    assert!(ctx.scheduler.jobs.is_empty());
    assert_eq!(host.job_count(), 0);
    let events = ctx.drain_events();
    assert!(events.iter().any(|event| matches!(event,
        Event::JobStart { job: None, error: Some(err) } if err.contains("volume"))));
}

#[tokio::test]
async fn undeclared_process_type_fails_the_start() {
    let mut ctx = setup();
    ctx.cluster.add_host("host-1");
    // Declared counts name a type the release does not define.
    let key = ctx.seed_formation("web", &[]).await;
    ctx.handle.sync_formations().await.unwrap();
    ctx.settle().await;

    ctx.scheduler.handle_job_request(JobRequest::up(key, "db")).await;

    assert!(ctx.scheduler.jobs.is_empty());
    let events = ctx.drain_events();
    assert!(matches!(events.last(), Some(Event::JobStart { job: None, error: Some(err) })
        if err.contains("db")));
}

#[tokio::test]
async fn victim_is_youngest_on_the_most_loaded_host() {
    let mut ctx = setup();
    ctx.cluster.add_host("host-1");
    ctx.cluster.add_host("host-2");
    let key = ctx.seed_formation("web", &[]).await;
    ctx.handle.sync_formations().await.unwrap();
    ctx.settle().await;

    // Three web jobs: two on host-1, one on host-2, with distinct ages.
    for host in ["host-1", "host-2", "host-1"] {
        ctx.clock.advance(Duration::from_secs(1));
        let request =
            JobRequest::up(key.clone(), "web").host_id(HostId::from_string(host));
        ctx.scheduler.handle_job_request(request).await;
    }
    assert_eq!(ctx.scheduler.jobs.len(), 3);

    let (victim, host) = ctx.scheduler.find_victim(&key, "web").unwrap();
    // host-1 runs two web jobs, so it gives one up; its youngest is the
    // last job started.
    assert_eq!(host, "host-1");
    let youngest = ctx
        .scheduler
        .jobs
        .values()
        .filter(|job| job.host_id == "host-1")
        .max_by_key(|job| job.created_at)
        .unwrap();
    assert_eq!(victim, youngest.id);
}

#[tokio::test]
async fn down_with_explicit_ids_stops_that_job() {
    let mut ctx = setup();
    let host = ctx.cluster.add_host("host-1");
    let key = ctx.seed_formation("web", &[("web", 2)]).await;
    ctx.handle.sync_formations().await.unwrap();
    ctx.settle().await;
    let target = ctx.scheduler.jobs.keys().next().unwrap().clone();

    let request = JobRequest::down(key, "web")
        .host_id(HostId::from_string("host-1"))
        .job_id(target.clone());
    ctx.scheduler.handle_job_request(request).await;

    assert_eq!(ctx.scheduler.jobs.len(), 1);
    assert!(!ctx.scheduler.jobs.contains_key(&target));
    assert!(!host.contains_job(&target));
}

#[tokio::test]
async fn down_without_candidates_reports_the_failure() {
    let mut ctx = setup();
    ctx.cluster.add_host("host-1");
    let key = ctx.seed_formation("web", &[]).await;
    ctx.handle.sync_formations().await.unwrap();
    ctx.settle().await;

    ctx.scheduler.handle_job_request(JobRequest::down(key, "web")).await;

    let events = ctx.drain_events();
    assert!(matches!(events.last(), Some(Event::JobStop { job_id: None, error: Some(_) })));
}
