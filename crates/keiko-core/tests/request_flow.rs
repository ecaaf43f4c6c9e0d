mod common;

use crate::common::{access, connect, queued_request, DenyAll};
use keiko_core::access::{Access, Actor};
use keiko_core::request::{self, NewTrainingRequest};
use keiko_db::training_request::{Mutation, Query};
use keiko_entity::training_request::Status;
use test_log::test;
use uuid::Uuid;

fn new_request(id: &str, learner_id: Uuid) -> NewTrainingRequest {
    NewTrainingRequest {
        id: id.to_owned(),
        learner_id,
        competency_level: "care-2".to_owned(),
        status: None,
    }
}

#[test(tokio::test)]
async fn test_create_defaults_to_in_queue() {
    let conn = &connect().await;
    let actor = Actor::new("coordinator");
    let access = access(&actor);

    let model = request::create(conn, access, new_request("TR-1", Uuid::new_v4()))
        .await
        .unwrap();
    assert_eq!(model.status, Status::InQueue);
    assert_eq!(model.training_batch_id, None);
    assert_eq!(model.drop_off_reason, None);
}

#[test(tokio::test)]
async fn test_create_refuses_duplicates_and_parallel_open_requests() {
    let conn = &connect().await;
    let actor = Actor::new("coordinator");
    let access = access(&actor);
    let learner = Uuid::new_v4();

    request::create(conn, access, new_request("TR-1", learner)).await.unwrap();

    let error = request::create(conn, access, new_request("TR-1", Uuid::new_v4()))
        .await
        .unwrap_err();
    assert_eq!(error.kind(), "validation");

    let error = request::create(conn, access, new_request("TR-2", learner))
        .await
        .unwrap_err();
    assert_eq!(error.kind(), "validation");
    assert_eq!(Query::by_id(conn, "TR-2").await.unwrap(), None);

    // A different competency level is its own journey.
    let other_level = NewTrainingRequest {
        competency_level: "care-3".to_owned(),
        ..new_request("TR-3", learner)
    };
    request::create(conn, access, other_level).await.unwrap();
}

#[test(tokio::test)]
async fn test_create_rejects_workflow_owned_statuses() {
    let conn = &connect().await;
    let actor = Actor::new("coordinator");
    let access = access(&actor);

    for status in [Status::InProgress, Status::SessionsCompleted, Status::TrainingCompleted] {
        let mut incoming = new_request("TR-1", Uuid::new_v4());
        incoming.status = Some(status);
        let error = request::create(conn, access, incoming).await.unwrap_err();
        assert_eq!(error.kind(), "validation");
    }
}

#[test(tokio::test)]
async fn test_a_completed_request_does_not_block_a_new_round() {
    let conn = &connect().await;
    let actor = Actor::new("coordinator");
    let access = access(&actor);
    let learner = Uuid::new_v4();

    queued_request(conn, "TR-1", learner, "care-2").await;
    Mutation::set_status(conn, "TR-1", Status::TrainingCompleted).await.unwrap();

    let second = request::create(conn, access, new_request("TR-2", learner)).await.unwrap();
    assert_eq!(second.status, Status::InQueue);
}

#[test(tokio::test)]
async fn test_manual_moves_stay_off_workflow_statuses() {
    let conn = &connect().await;
    let actor = Actor::new("coordinator");
    let access = access(&actor);

    queued_request(conn, "TR-1", Uuid::new_v4(), "care-2").await;

    let error = request::update_status(conn, access, "TR-1", Status::InProgress, None)
        .await
        .unwrap_err();
    assert_eq!(error.kind(), "validation");

    let error = request::update_status(conn, access, "TR-9", Status::OnHold, None)
        .await
        .unwrap_err();
    assert_eq!(error.kind(), "not-found");

    let moved = request::update_status(conn, access, "TR-1", Status::OnHold, None)
        .await
        .unwrap();
    assert_eq!(moved.status, Status::OnHold);
}

#[test(tokio::test)]
async fn test_drop_off_requires_a_reason_and_clears_it_on_return() {
    let conn = &connect().await;
    let actor = Actor::new("coordinator");
    let access = access(&actor);

    queued_request(conn, "TR-1", Uuid::new_v4(), "care-2").await;

    let error = request::update_status(conn, access, "TR-1", Status::DropOff, None)
        .await
        .unwrap_err();
    assert_eq!(error.kind(), "validation");
    let error = request::update_status(conn, access, "TR-1", Status::DropOff, Some("  ".to_owned()))
        .await
        .unwrap_err();
    assert_eq!(error.kind(), "validation");

    let dropped = request::update_status(conn, access, "TR-1", Status::DropOff, Some("moved away".to_owned()))
        .await
        .unwrap();
    assert_eq!(dropped.status, Status::DropOff);
    assert_eq!(dropped.drop_off_reason.as_deref(), Some("moved away"));

    let returned = request::update_status(conn, access, "TR-1", Status::InQueue, None)
        .await
        .unwrap();
    assert_eq!(returned.status, Status::InQueue);
    assert_eq!(returned.drop_off_reason, None);
}

#[test(tokio::test)]
async fn test_batched_and_completed_requests_resist_manual_moves() {
    let conn = &connect().await;
    let actor = Actor::new("coordinator");
    let access = access(&actor);

    queued_request(conn, "TR-1", Uuid::new_v4(), "care-2").await;
    let batch = keiko_db::batch::Mutation::create(conn, "care-2", "sensei", 2, 3, 1, None, None)
        .await
        .unwrap();
    Mutation::assign_to_batch(conn, "TR-1", batch.id).await.unwrap();

    let error = request::update_status(conn, access, "TR-1", Status::OnHold, None)
        .await
        .unwrap_err();
    assert_eq!(error.kind(), "validation");

    queued_request(conn, "TR-2", Uuid::new_v4(), "care-2").await;
    Mutation::set_status(conn, "TR-2", Status::TrainingCompleted).await.unwrap();
    let error = request::update_status(conn, access, "TR-2", Status::InQueue, None)
        .await
        .unwrap_err();
    assert_eq!(error.kind(), "validation");
}

#[test(tokio::test)]
async fn test_a_denied_caller_writes_nothing() {
    let conn = &connect().await;
    let actor = Actor::new("intruder");
    let access = Access {
        actor: &actor,
        policy: &DenyAll,
    };

    let error = request::create(conn, access, new_request("TR-1", Uuid::new_v4()))
        .await
        .unwrap_err();
    assert_eq!(error.kind(), "authorization");
    assert_eq!(error.to_string(), "not allowed to create training-request");
    assert_eq!(Query::by_id(conn, "TR-1").await.unwrap(), None);
}
