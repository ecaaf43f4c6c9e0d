mod common;

use crate::common::{access, connect, queued_request};
use chrono::{Local, NaiveDate};
use keiko_core::access::Actor;
use keiko_core::approval::{self, ApprovalUpdate, NewProjectApproval};
use keiko_core::audit;
use keiko_core::batch::{self, AttendanceEntry, HomeworkEntry, NewBatch};
use keiko_core::config::WorkflowConfig;
use keiko_core::request::{self, NewTrainingRequest};
use keiko_core::schedule::{self, ScheduleUpdate};
use keiko_db::training_request::Query as RequestQuery;
use keiko_entity::training_request::Status as RequestStatus;
use keiko_entity::validation::audit_log::EntityKind;
use keiko_entity::validation::project_approval::Status as ApprovalStatus;
use keiko_entity::validation::schedule_request::Status as ScheduleStatus;
use keiko_test_helpers::{SqliteDb, TestDb};
use sea_orm::Database;
use test_log::test;
use uuid::Uuid;

fn date(day: u32) -> NaiveDate {
    NaiveDate::from_ymd_opt(2026, 9, day).unwrap()
}

#[test(tokio::test)]
async fn test_the_full_journey_from_queue_to_completed_training() {
    let db = SqliteDb::new().unwrap();
    let conn = &Database::connect(db.db_uri().as_ref()).await.unwrap();
    keiko_test_helpers::schema::create_all(conn).await.unwrap();

    let coordinator = Actor::new("coordinator");
    let access = access(&coordinator);
    let config = WorkflowConfig::default();
    let learner = Uuid::new_v4();

    let created = request::create(
        conn,
        access,
        NewTrainingRequest {
            id: "TR-104".to_owned(),
            learner_id: learner,
            competency_level: "care-2".to_owned(),
            status: None,
        },
    )
    .await
    .unwrap();
    assert_eq!(created.status, RequestStatus::InQueue);

    let group = batch::create(
        conn,
        access,
        &config,
        NewBatch {
            competency_level: "care-2".to_owned(),
            trainer: "sensei".to_owned(),
            session_count: 2,
            capacity: 1,
            estimated_start: Some(date(1)),
            batch_start_date: Some(date(2)),
            learner_ids: vec![learner],
            session_dates: vec![(1, date(2))],
        },
    )
    .await
    .unwrap();
    batch::set_session_date(conn, access, group.id, 2, date(9)).await.unwrap();

    for number in [1, 2] {
        batch::record_attendance(
            conn,
            access,
            group.id,
            number,
            vec![AttendanceEntry {
                learner_id: learner,
                attended: true,
            }],
        )
        .await
        .unwrap();
    }
    batch::record_homework(
        conn,
        access,
        group.id,
        1,
        vec![HomeworkEntry {
            learner_id: learner,
            completed: true,
            homework_url: Some("https://docs/portfolio".to_owned()),
        }],
    )
    .await
    .unwrap();

    let finished = batch::finish(conn, access, group.id).await.unwrap();
    assert!(finished.is_finished());
    let request = RequestQuery::by_id(conn, "TR-104").await.unwrap().unwrap();
    assert_eq!(request.status, RequestStatus::SessionsCompleted);

    approval::create(
        conn,
        access,
        NewProjectApproval {
            id: "VPA-1".to_owned(),
            learner_id: learner,
            competency_level: "care-2".to_owned(),
            training_request_id: "TR-104".to_owned(),
            project_details: Some("wound care portfolio".to_owned()),
        },
    )
    .await
    .unwrap();
    approval::update(
        conn,
        access,
        "VPA-1",
        ApprovalUpdate {
            status: Some(ApprovalStatus::Approved),
            ..Default::default()
        },
    )
    .await
    .unwrap();

    let booked = schedule::update(
        conn,
        access,
        "VSR01",
        ScheduleUpdate {
            status: Some(ScheduleStatus::ValidationScheduled),
            validator_ops: Some("freja".to_owned()),
            validator_trainer: Some("sensei".to_owned()),
            scheduled_date: date(20).and_hms_opt(9, 0, 0),
            ..Default::default()
        },
    )
    .await
    .unwrap();
    assert_eq!(booked.status, ScheduleStatus::ValidationScheduled);

    schedule::update(
        conn,
        access,
        "VSR01",
        ScheduleUpdate {
            status: Some(ScheduleStatus::Pass),
            response_date: Some(Local::now().date_naive()),
            definite_answer: Some(true),
            ..Default::default()
        },
    )
    .await
    .unwrap();

    let request = RequestQuery::by_id(conn, "TR-104").await.unwrap().unwrap();
    assert_eq!(request.status, RequestStatus::TrainingCompleted);

    let approvals = audit::history(conn, access, EntityKind::ProjectApproval, "VPA-1")
        .await
        .unwrap();
    assert_eq!(approvals.len(), 2);
    let schedules = audit::history(conn, access, EntityKind::ScheduleRequest, "VSR01")
        .await
        .unwrap();
    assert_eq!(schedules.len(), 3);
}

#[test(tokio::test)]
async fn test_a_failed_validation_loops_back_through_approval() {
    let conn = &connect().await;
    let assessor = Actor::new("assessor");
    let access = access(&assessor);
    let learner = Uuid::new_v4();

    request::create(
        conn,
        access,
        NewTrainingRequest {
            id: "TR-201".to_owned(),
            learner_id: learner,
            competency_level: "care-3".to_owned(),
            status: None,
        },
    )
    .await
    .unwrap();
    approval::create(
        conn,
        access,
        NewProjectApproval {
            id: "VPA-1".to_owned(),
            learner_id: learner,
            competency_level: "care-3".to_owned(),
            training_request_id: "TR-201".to_owned(),
            project_details: Some("first draft".to_owned()),
        },
    )
    .await
    .unwrap();
    let grant = ApprovalUpdate {
        status: Some(ApprovalStatus::Approved),
        ..Default::default()
    };
    approval::update(conn, access, "VPA-1", grant.clone()).await.unwrap();

    schedule::update(
        conn,
        access,
        "VSR01",
        ScheduleUpdate {
            status: Some(ScheduleStatus::Fail),
            definite_answer: Some(true),
            ..Default::default()
        },
    )
    .await
    .unwrap();
    let approval = keiko_db::validation::project_approval::Query::by_id(conn, "VPA-1")
        .await
        .unwrap()
        .unwrap();
    assert_eq!(approval.status, ApprovalStatus::ResubmitForRevalidation);

    approval::update(
        conn,
        access,
        "VPA-1",
        ApprovalUpdate {
            project_details: Some("second draft".to_owned()),
            ..grant
        },
    )
    .await
    .unwrap();
    let reopened = keiko_db::validation::schedule_request::Query::by_id(conn, "VSR01")
        .await
        .unwrap()
        .unwrap();
    assert_eq!(reopened.status, ScheduleStatus::PendingValidation);
    assert_eq!(reopened.description.as_deref(), Some("second draft"));

    schedule::update(
        conn,
        access,
        "VSR01",
        ScheduleUpdate {
            status: Some(ScheduleStatus::Pass),
            ..Default::default()
        },
    )
    .await
    .unwrap();
    let request = RequestQuery::by_id(conn, "TR-201").await.unwrap().unwrap();
    assert_eq!(request.status, RequestStatus::TrainingCompleted);

    // Both validation rounds ran over the same schedule request.
    let trail = audit::history(conn, access, EntityKind::ScheduleRequest, "VSR01")
        .await
        .unwrap();
    assert_eq!(trail.len(), 4);
}

#[test(tokio::test)]
async fn test_a_drop_off_does_not_stop_the_rest_of_the_batch() {
    let conn = &connect().await;
    let coordinator = Actor::new("coordinator");
    let access = access(&coordinator);
    let config = WorkflowConfig::default();

    let anna = Uuid::new_v4();
    let ben = Uuid::new_v4();
    queued_request(conn, "TR-1", anna, "care-2").await;
    queued_request(conn, "TR-2", ben, "care-2").await;

    let group = batch::create(
        conn,
        access,
        &config,
        NewBatch {
            competency_level: "care-2".to_owned(),
            trainer: "sensei".to_owned(),
            session_count: 1,
            capacity: 2,
            estimated_start: None,
            batch_start_date: Some(date(2)),
            learner_ids: vec![anna, ben],
            session_dates: vec![(1, date(2))],
        },
    )
    .await
    .unwrap();

    batch::drop_off_learner(conn, access, group.id, anna, Some("left the programme".to_owned()))
        .await
        .unwrap();

    batch::record_attendance(
        conn,
        access,
        group.id,
        1,
        vec![AttendanceEntry {
            learner_id: ben,
            attended: true,
        }],
    )
    .await
    .unwrap();
    let finished = batch::finish(conn, access, group.id).await.unwrap();
    assert_eq!(finished.current_participant, 1);

    let dropped = RequestQuery::by_id(conn, "TR-1").await.unwrap().unwrap();
    assert_eq!(dropped.status, RequestStatus::DropOff);
    assert_eq!(dropped.drop_off_reason.as_deref(), Some("left the programme"));
    assert_eq!(dropped.training_batch_id, None);

    let completed = RequestQuery::by_id(conn, "TR-2").await.unwrap().unwrap();
    assert_eq!(completed.status, RequestStatus::SessionsCompleted);
}
