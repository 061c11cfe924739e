// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

use super::*;
use crate::controller::{ControllerClient, ControllerError};
use herd_core::{
    App, Artifact, FormationRecord, JobBuilder, JobRecord, JobState, ProcessSpec, Release,
};

async fn seed(controller: &MemController) -> (App, Release) {
    let artifact = controller
        .create_artifact(Artifact { id: "art-1".into(), uri: "docker://example".into() })
        .await
        .unwrap();
    let release = controller
        .create_release(Release {
            id: "rel-1".into(),
            artifact_id: artifact.id,
            processes: [("web".to_string(), ProcessSpec::default())].into_iter().collect(),
        })
        .await
        .unwrap();
    let app = controller.create_app(App::new("app-1".into(), "example")).await.unwrap();
    (app, release)
}

#[tokio::test]
async fn formation_list_filters_by_app() {
    let controller = MemController::new();
    let (app, release) = seed(&controller).await;
    controller
        .put_formation(FormationRecord {
            app_id: app.id.clone(),
            release_id: release.id.clone(),
            processes: [("web".to_string(), 2)].into_iter().collect(),
        })
        .await
        .unwrap();
    controller
        .put_formation(FormationRecord {
            app_id: "app-2".into(),
            release_id: "rel-2".into(),
            processes: Default::default(),
        })
        .await
        .unwrap();

    let listed = controller.formation_list(&app.id).await.unwrap();
    assert_eq!(listed.len(), 1);
    assert_eq!(listed[0].release_id, release.id);
}

#[tokio::test]
async fn lookups_resolve_or_not_found() {
    let controller = MemController::new();
    let (_, release) = seed(&controller).await;

    assert_eq!(controller.get_release(&release.id).await.unwrap().id, "rel-1");
    assert_eq!(controller.get_artifact(&release.artifact_id).await.unwrap().uri, "docker://example");

    let err = controller.get_release(&"rel-missing".into()).await.unwrap_err();
    assert!(matches!(err, ControllerError::NotFound(_)));
}

#[tokio::test]
async fn put_job_records_are_kept_in_order() {
    let controller = MemController::new();
    let job = JobBuilder::default().id("host-1-abc").build();

    controller.put_job(JobRecord::new(&job, JobState::Up)).await.unwrap();
    controller.put_job(JobRecord::new(&job, JobState::Down)).await.unwrap();

    let records = controller.job_records();
    assert_eq!(records.len(), 2);
    assert_eq!(records[0].state, JobState::Up);
    assert_eq!(records[1].state, JobState::Down);
    assert_eq!(records[1].job_id, "host-1-abc");
}

#[tokio::test]
async fn offline_controller_is_unavailable() {
    let controller = MemController::new();
    controller.set_offline(true);
    assert!(matches!(controller.app_list().await, Err(ControllerError::Unavailable(_))));
}
