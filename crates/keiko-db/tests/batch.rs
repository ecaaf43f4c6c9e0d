mod common;

use crate::common::setup_schema;
use chrono::NaiveDate;
use keiko_db::batch::{attendance, homework, learner, session, Mutation, Query};
use sea_orm::Database;
use test_log::test;
use uuid::Uuid;

#[test(tokio::test)]
async fn test_counters_follow_membership() {
    let conn = &Database::connect("sqlite::memory:").await.unwrap();
    setup_schema(conn).await.unwrap();

    let batch = Mutation::create(conn, "care-2", "sensei", 4, 3, 0, None, None).await.unwrap();
    assert_eq!(batch.spot_left, 3);

    let first = Uuid::new_v4();
    learner::Mutation::insert_many(
        conn,
        batch.id,
        vec![(first, "TR-1".to_owned()), (Uuid::new_v4(), "TR-2".to_owned())],
    )
    .await
    .unwrap();

    let batch = Mutation::recompute_counters(conn, batch.id).await.unwrap();
    assert_eq!(batch.current_participant, 2);
    assert_eq!(batch.spot_left, 1);

    assert_eq!(learner::Mutation::remove(conn, batch.id, first).await.unwrap(), 1);
    let batch = Mutation::recompute_counters(conn, batch.id).await.unwrap();
    assert_eq!(batch.current_participant, 1);
    assert_eq!(batch.spot_left, 2);
}

#[test(tokio::test)]
async fn test_finish_date_is_set_once() {
    let conn = &Database::connect("sqlite::memory:").await.unwrap();
    setup_schema(conn).await.unwrap();

    let batch = Mutation::create(conn, "care-2", "sensei", 2, 5, 0, None, None).await.unwrap();
    let finished = chrono::Utc::now().naive_utc();

    assert_eq!(Mutation::mark_finished(conn, batch.id, finished).await.unwrap(), 1);
    assert_eq!(
        Mutation::mark_finished(conn, batch.id, finished).await.unwrap(),
        0,
        "a finished batch must not take a second finish date"
    );

    let batch = Query::by_id(conn, batch.id).await.unwrap().unwrap();
    assert!(batch.is_finished());
}

#[test(tokio::test)]
async fn test_sessions_are_ordered_and_trimmable() {
    let conn = &Database::connect("sqlite::memory:").await.unwrap();
    setup_schema(conn).await.unwrap();

    let batch = Mutation::create(conn, "care-2", "sensei", 3, 5, 0, None, None).await.unwrap();
    let day = NaiveDate::from_ymd_opt(2025, 3, 10).unwrap();
    session::Mutation::insert_numbers(conn, batch.id, vec![(1, Some(day)), (2, None), (3, None)])
        .await
        .unwrap();

    let sessions = session::Query::for_batch(conn, batch.id).await.unwrap();
    assert_eq!(sessions.iter().map(|s| s.number).collect::<Vec<_>>(), vec![1, 2, 3]);

    assert_eq!(session::Mutation::delete_above(conn, batch.id, 1).await.unwrap(), 2);
    let sessions = session::Query::for_batch(conn, batch.id).await.unwrap();
    assert_eq!(sessions.len(), 1);
    assert_eq!(sessions[0].session_date, Some(day));
}

#[test(tokio::test)]
async fn test_attendance_upsert_overwrites_the_flag() {
    let conn = &Database::connect("sqlite::memory:").await.unwrap();
    setup_schema(conn).await.unwrap();

    let batch_id = Uuid::new_v4();
    let learner_id = Uuid::new_v4();

    let entry = attendance::Mutation::upsert(conn, batch_id, 1, learner_id, true).await.unwrap();
    assert!(entry.attended);

    let entry = attendance::Mutation::upsert(conn, batch_id, 1, learner_id, false).await.unwrap();
    assert!(!entry.attended);

    assert_eq!(attendance::Query::for_batch(conn, batch_id).await.unwrap().len(), 1);
}

#[test(tokio::test)]
async fn test_homework_url_survives_resubmission() {
    let conn = &Database::connect("sqlite::memory:").await.unwrap();
    setup_schema(conn).await.unwrap();

    let batch_id = Uuid::new_v4();
    let learner_id = Uuid::new_v4();

    let entry = homework::Mutation::upsert(conn, batch_id, 1, learner_id, false, None).await.unwrap();
    assert_eq!(entry.homework_url, None);

    let entry = homework::Mutation::upsert(
        conn,
        batch_id,
        1,
        learner_id,
        true,
        Some("https://example.com/hw/1".to_owned()),
    )
    .await
    .unwrap();
    assert!(entry.completed);
    assert_eq!(entry.homework_url.as_deref(), Some("https://example.com/hw/1"));

    let entry = homework::Mutation::upsert(
        conn,
        batch_id,
        1,
        learner_id,
        false,
        Some("https://example.com/hw/other".to_owned()),
    )
    .await
    .unwrap();
    assert!(!entry.completed, "completion follows the latest submission");
    assert_eq!(
        entry.homework_url.as_deref(),
        Some("https://example.com/hw/1"),
        "the first url sticks"
    );
}

#[test(tokio::test)]
async fn test_level_listing() {
    let conn = &Database::connect("sqlite::memory:").await.unwrap();
    setup_schema(conn).await.unwrap();

    Mutation::create(conn, "care-2", "sensei", 2, 5, 0, None, None).await.unwrap();
    Mutation::create(conn, "care-3", "kohai", 2, 5, 0, None, None).await.unwrap();

    let batches = Query::for_level(conn, "care-2").await.unwrap();
    assert_eq!(batches.len(), 1);
    assert_eq!(batches[0].trainer, "sensei");
}
