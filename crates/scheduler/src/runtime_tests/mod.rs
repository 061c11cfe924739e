// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! Scheduler runtime tests: handlers driven directly over in-memory
//! collaborators, plus a spawned-loop smoke test.

mod formation;
mod leadership;
mod rectify;
mod requests;
mod sync;

use super::*;
use crate::test_helpers::{fast_config, processes, setup};
use herd_core::EventKind;
use std::time::Duration;

/// Poll the handle until the job map reaches `n` entries.
async fn await_jobs(ctx: &crate::handle::SchedulerHandle<herd_adapters::MemController>, n: usize) {
    for _ in 0..200 {
        let jobs = ctx.jobs().await.unwrap_or_default();
        if jobs.len() == n {
            return;
        }
        tokio::time::sleep(Duration::from_millis(5)).await;
    }
    panic!("job map never reached {n} entries");
}

#[tokio::test]
async fn run_loop_converges_and_stops() {
    let ctx = setup();
    ctx.cluster.add_host("host-1");
    let key = ctx.seed_formation("web", &[("web", 1)]).await;

    let handle = ctx.handle.clone();
    let task = tokio::spawn(ctx.scheduler.run());

    // Startup syncs pull the declared formation and start its job.
    await_jobs(&handle, 1).await;
    let formations = handle.formations().await.unwrap();
    assert!(formations.contains_key(&key));

    handle.stop();
    // Idempotent.
    handle.stop();
    task.await.unwrap().unwrap();

    // Handle operations after stop fail cleanly once the actor is gone.
    assert!(matches!(handle.jobs().await, Err(crate::SchedulerError::Stopped)));
}

#[tokio::test]
async fn queries_answer_inside_the_turn() {
    let mut ctx = setup();
    ctx.cluster.add_host("host-1");
    ctx.seed_formation("web", &[("web", 2)]).await;

    ctx.handle.sync_formations().await.unwrap();
    ctx.settle().await;

    // Snapshots are answered by the actor's turn, not from shared state.
    let handle = ctx.handle.clone();
    let (jobs, ()) = tokio::join!(handle.jobs(), ctx.settle());
    assert_eq!(jobs.unwrap().len(), 2);
}

#[test]
fn fast_config_is_sane() {
    let config = fast_config();
    assert!(config.job_sync_interval < Duration::from_secs(1));
    assert_eq!(processes(&[("web", 1)]).get("web"), Some(&1));
}
