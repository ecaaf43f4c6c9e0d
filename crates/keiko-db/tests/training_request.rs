mod common;

use crate::common::seed::create_queued_request;
use crate::common::setup_schema;
use keiko_db::training_request::{Mutation, Query};
use keiko_entity::training_request::Status;
use sea_orm::Database;
use test_log::test;
use uuid::Uuid;

#[test(tokio::test)]
async fn test_create_and_load() {
    let conn = &Database::connect("sqlite::memory:").await.unwrap();
    setup_schema(conn).await.unwrap();

    let learner = Uuid::new_v4();
    let created = Mutation::create(conn, "TR-1", learner, "care-2", Status::InQueue)
        .await
        .unwrap();
    assert_eq!(created.status, Status::InQueue);
    assert_eq!(created.training_batch_id, None);

    let loaded = Query::by_id(conn, "TR-1").await.unwrap().unwrap();
    assert_eq!(loaded, created);

    Mutation::create(conn, "TR-1", learner, "care-2", Status::InQueue)
        .await
        .expect_err("duplicate id must be rejected by the primary key");
}

#[test(tokio::test)]
async fn test_open_lookup_skips_completed_requests() {
    let conn = &Database::connect("sqlite::memory:").await.unwrap();
    setup_schema(conn).await.unwrap();

    let learner = Uuid::new_v4();
    create_queued_request(conn, "TR-1", learner, "care-2").await;
    Mutation::set_status(conn, "TR-1", Status::TrainingCompleted).await.unwrap();

    assert_eq!(Query::open_for_learner_level(conn, learner, "care-2").await.unwrap(), None);

    let open = create_queued_request(conn, "TR-2", learner, "care-2").await;
    assert_eq!(
        Query::open_for_learner_level(conn, learner, "care-2").await.unwrap(),
        Some(open)
    );
}

#[test(tokio::test)]
async fn test_batch_membership_roundtrip() {
    let conn = &Database::connect("sqlite::memory:").await.unwrap();
    setup_schema(conn).await.unwrap();

    let learner = Uuid::new_v4();
    let batch_id = Uuid::new_v4();
    create_queued_request(conn, "TR-1", learner, "care-2").await;

    let assigned = Mutation::assign_to_batch(conn, "TR-1", batch_id).await.unwrap();
    assert_eq!(assigned.status, Status::InProgress);
    assert_eq!(assigned.training_batch_id, Some(batch_id));

    let eligible = Query::for_learner_level_in(conn, learner, "care-2", &[Status::InQueue])
        .await
        .unwrap();
    assert_eq!(eligible, None, "a request in training is no longer queue-eligible");

    let released = Mutation::release_from_batch(conn, "TR-1", Status::InQueue, None)
        .await
        .unwrap();
    assert_eq!(released.status, Status::InQueue);
    assert_eq!(released.training_batch_id, None);
}

#[test(tokio::test)]
async fn test_release_all_clears_links_and_drop_off_keeps_reason() {
    let conn = &Database::connect("sqlite::memory:").await.unwrap();
    setup_schema(conn).await.unwrap();

    let batch_id = Uuid::new_v4();
    create_queued_request(conn, "TR-1", Uuid::new_v4(), "care-2").await;
    create_queued_request(conn, "TR-2", Uuid::new_v4(), "care-2").await;
    Mutation::assign_to_batch(conn, "TR-1", batch_id).await.unwrap();
    Mutation::assign_to_batch(conn, "TR-2", batch_id).await.unwrap();

    let dropped = Mutation::release_from_batch(conn, "TR-2", Status::DropOff, Some("moved away".to_owned()))
        .await
        .unwrap();
    assert_eq!(dropped.status, Status::DropOff);
    assert_eq!(dropped.drop_off_reason.as_deref(), Some("moved away"));

    let affected = Mutation::release_all_for_batch(conn, batch_id, Status::InQueue).await.unwrap();
    assert_eq!(affected, 1, "only the request still linked to the batch moves");
    assert_eq!(Query::for_batch(conn, batch_id).await.unwrap(), vec![]);
}
