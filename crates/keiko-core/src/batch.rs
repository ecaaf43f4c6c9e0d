//! The training batch engine: capacity, session scheduling, attendance,
//! homework and completion.
//!
//! A batch is active from creation; setting `batch_finish_date` is terminal
//! and every mutation entry point rejects a finished batch. All multi-row
//! effects of one operation run inside one transaction.

use crate::access::{Access, Action, Resource};
use crate::config::WorkflowConfig;
use crate::error::WorkflowError;
use chrono::{NaiveDate, Utc};
use keiko_db::batch::{attendance, homework, learner, session, Mutation, Query};
use keiko_db::training_request;
use keiko_db::util::{FlattenTransactionResultExt, InspectTransactionError};
use keiko_entity::batch::attendance::Model as AttendanceModel;
use keiko_entity::batch::homework::Model as HomeworkModel;
use keiko_entity::batch::session::Model as SessionModel;
use keiko_entity::batch::Model;
use keiko_entity::training_request::Status;
use sea_orm::{ConnectionTrait, TransactionTrait};
use std::collections::HashSet;
use std::error::Error;
use uuid::Uuid;

#[derive(Clone, Debug)]
pub struct NewBatch {
    pub competency_level: String,
    pub trainer: String,
    pub session_count: i32,
    pub capacity: i32,
    pub estimated_start: Option<NaiveDate>,
    pub batch_start_date: Option<NaiveDate>,
    pub learner_ids: Vec<Uuid>,
    /// Dates keyed by session number; dated sessions must form a prefix.
    pub session_dates: Vec<(i32, NaiveDate)>,
}

/// Partial update. `None` leaves a field untouched; the date fields are
/// set-only and cannot be cleared through here.
#[derive(Clone, Debug, Default)]
pub struct BatchUpdate {
    pub trainer: Option<String>,
    pub capacity: Option<i32>,
    pub session_count: Option<i32>,
    pub estimated_start: Option<NaiveDate>,
    pub batch_start_date: Option<NaiveDate>,
    /// Full desired membership; the difference against the current members
    /// decides who is added and who is released back to the queue.
    pub learner_ids: Option<Vec<Uuid>>,
    pub session_dates: Option<Vec<(i32, NaiveDate)>>,
}

#[derive(Clone, Copy, Debug)]
pub struct AttendanceEntry {
    pub learner_id: Uuid,
    pub attended: bool,
}

#[derive(Clone, Debug)]
pub struct HomeworkEntry {
    pub learner_id: Uuid,
    pub completed: bool,
    pub homework_url: Option<String>,
}

pub async fn create<C: ConnectionTrait + TransactionTrait>(
    conn: &C,
    access: Access<'_>,
    config: &WorkflowConfig,
    batch: NewBatch,
) -> Result<Model, WorkflowError> {
    access.ensure(Resource::TrainingBatch, Action::Create)?;

    let NewBatch {
        competency_level,
        trainer,
        session_count,
        capacity,
        estimated_start,
        batch_start_date,
        learner_ids,
        session_dates,
    } = batch;

    if !config.session_count_in_bounds(session_count) {
        return Err(WorkflowError::Validation(format!(
            "session count {session_count} is outside {}..={}",
            config.min_session_count, config.max_session_count
        )));
    }
    ensure_unique_learners(&learner_ids)?;
    let participants = participant_count(learner_ids.len())?;
    if participants > capacity {
        return Err(WorkflowError::Capacity(format!(
            "{participants} learners do not fit a capacity of {capacity}"
        )));
    }
    let sessions = spread_dates(session_count, &session_dates)?;
    let eligible = config.queue_eligible_statuses();

    let res = conn
        .transaction(|txn| {
            Box::pin(async move {
                let members = resolve_members(txn, &competency_level, &eligible, &learner_ids).await?;

                let model = Mutation::create(
                    txn,
                    &competency_level,
                    &trainer,
                    session_count,
                    capacity,
                    participants,
                    estimated_start,
                    batch_start_date,
                )
                .await?;
                session::Mutation::insert_numbers(txn, model.id, sessions).await?;
                learner::Mutation::insert_many(txn, model.id, members.clone()).await?;
                for (_, request_id) in &members {
                    training_request::Mutation::assign_to_batch(txn, request_id, model.id).await?;
                }
                Result::<_, WorkflowError>::Ok(model)
            })
        })
        .await;

    let model = res
        .inspect_transaction_err(
            |error| tracing::error!(error = error as &dyn Error, "error creating training batch"),
        )
        .flatten_res()?;
    tracing::debug!(batch_id = %model.id, participants, "created training batch");
    Ok(model)
}

pub async fn update<C: ConnectionTrait + TransactionTrait>(
    conn: &C,
    access: Access<'_>,
    config: &WorkflowConfig,
    batch_id: Uuid,
    update: BatchUpdate,
) -> Result<Model, WorkflowError> {
    access.ensure(Resource::TrainingBatch, Action::Update)?;

    let BatchUpdate {
        trainer,
        capacity,
        session_count,
        estimated_start,
        batch_start_date,
        learner_ids,
        session_dates,
    } = update;

    if let Some(count) = session_count {
        if !config.session_count_in_bounds(count) {
            return Err(WorkflowError::Validation(format!(
                "session count {count} is outside {}..={}",
                config.min_session_count, config.max_session_count
            )));
        }
    }
    if let Some(ids) = &learner_ids {
        ensure_unique_learners(ids)?;
    }
    let eligible = config.queue_eligible_statuses();

    let res = conn
        .transaction(|txn| {
            Box::pin(async move {
                let current = load_batch(txn, batch_id).await?;
                ensure_unfinished(&current)?;

                let target_capacity = capacity.unwrap_or(current.capacity);
                let target_sessions = session_count.unwrap_or(current.session_count);

                // The whole membership change is resolved before any write so
                // an ineligible addition leaves nothing behind.
                let membership = match learner_ids {
                    Some(desired) => {
                        let members = learner::Query::for_batch(txn, batch_id).await?;
                        let current_ids: HashSet<Uuid> = members.iter().map(|member| member.learner_id).collect();
                        let desired_ids: HashSet<Uuid> = desired.iter().copied().collect();

                        let added: Vec<Uuid> =
                            desired.iter().copied().filter(|id| !current_ids.contains(id)).collect();
                        let removed: Vec<_> = members
                            .into_iter()
                            .filter(|member| !desired_ids.contains(&member.learner_id))
                            .collect();
                        let added =
                            resolve_members(txn, &current.competency_level, &eligible, &added).await?;
                        Some((added, removed, participant_count(desired_ids.len())?))
                    }
                    None => None,
                };
                let resulting_participants = match &membership {
                    Some((_, _, count)) => *count,
                    None => current.current_participant,
                };
                if target_capacity < resulting_participants {
                    return Err(WorkflowError::Capacity(format!(
                        "capacity {target_capacity} is below the {resulting_participants} current participants"
                    )));
                }

                if let Some(trainer) = &trainer {
                    Mutation::set_trainer(txn, batch_id, trainer).await?;
                }
                if let Some(capacity) = capacity {
                    Mutation::set_capacity(txn, batch_id, capacity).await?;
                }
                if estimated_start.is_some() {
                    Mutation::set_estimated_start(txn, batch_id, estimated_start).await?;
                }
                if batch_start_date.is_some() {
                    Mutation::set_batch_start_date(txn, batch_id, batch_start_date).await?;
                }

                if target_sessions != current.session_count {
                    if target_sessions > current.session_count {
                        let tail = (current.session_count + 1..=target_sessions)
                            .map(|number| (number, None))
                            .collect();
                        session::Mutation::insert_numbers(txn, batch_id, tail).await?;
                    } else {
                        // Trimming only ever removes the highest numbers;
                        // surviving sessions keep their numbering.
                        session::Mutation::delete_above(txn, batch_id, target_sessions).await?;
                        attendance::Mutation::delete_above(txn, batch_id, target_sessions).await?;
                        homework::Mutation::delete_above(txn, batch_id, target_sessions).await?;
                    }
                    Mutation::set_session_count(txn, batch_id, target_sessions).await?;
                }

                if let Some((added, removed, _)) = membership {
                    for member in removed {
                        release_member(txn, batch_id, &member, Status::InQueue, None).await?;
                    }
                    learner::Mutation::insert_many(txn, batch_id, added.clone()).await?;
                    for (_, request_id) in &added {
                        training_request::Mutation::assign_to_batch(txn, request_id, batch_id).await?;
                    }
                }

                if let Some(dates) = session_dates {
                    apply_session_dates(txn, batch_id, &dates).await?;
                }

                let model = Mutation::recompute_counters(txn, batch_id).await?;
                Result::<_, WorkflowError>::Ok(model)
            })
        })
        .await;

    let model = res
        .inspect_transaction_err(
            |error| tracing::error!(error = error as &dyn Error, %batch_id, "error updating training batch"),
        )
        .flatten_res()?;
    tracing::debug!(batch_id = %model.id, "updated training batch");
    Ok(model)
}

pub async fn remove_learner<C: ConnectionTrait + TransactionTrait>(
    conn: &C,
    access: Access<'_>,
    batch_id: Uuid,
    learner_id: Uuid,
) -> Result<Model, WorkflowError> {
    access.ensure(Resource::TrainingBatch, Action::Update)?;
    release_one(conn, batch_id, learner_id, Status::InQueue, None).await
}

/// Like [`remove_learner`], but the learner leaves the programme: their
/// request moves to `DropOff` and keeps the reason.
pub async fn drop_off_learner<C: ConnectionTrait + TransactionTrait>(
    conn: &C,
    access: Access<'_>,
    batch_id: Uuid,
    learner_id: Uuid,
    reason: Option<String>,
) -> Result<Model, WorkflowError> {
    access.ensure(Resource::TrainingBatch, Action::Update)?;
    release_one(conn, batch_id, learner_id, Status::DropOff, reason).await
}

pub async fn set_session_date<C: ConnectionTrait + TransactionTrait>(
    conn: &C,
    access: Access<'_>,
    batch_id: Uuid,
    number: i32,
    date: NaiveDate,
) -> Result<SessionModel, WorkflowError> {
    access.ensure(Resource::TrainingBatch, Action::Update)?;

    let res = conn
        .transaction(|txn| {
            Box::pin(async move {
                let batch = load_batch(txn, batch_id).await?;
                ensure_unfinished(&batch)?;
                if session::Query::get(txn, batch_id, number).await?.is_none() {
                    return Err(WorkflowError::NotFound(format!(
                        "training batch {batch_id} has no session {number}"
                    )));
                }
                if number > 1 {
                    let previous = session::Query::get(txn, batch_id, number - 1).await?;
                    if previous.and_then(|session| session.session_date).is_none() {
                        return Err(WorkflowError::Sequence(format!(
                            "session {number} cannot start while session {} has no date",
                            number - 1
                        )));
                    }
                }
                let model = session::Mutation::set_date(txn, batch_id, number, Some(date)).await?;
                Result::<_, WorkflowError>::Ok(model)
            })
        })
        .await;

    res.inspect_transaction_err(
        |error| tracing::error!(error = error as &dyn Error, %batch_id, number, "error dating session"),
    )
    .flatten_res()
}

pub async fn record_attendance<C: ConnectionTrait + TransactionTrait>(
    conn: &C,
    access: Access<'_>,
    batch_id: Uuid,
    session_number: i32,
    entries: Vec<AttendanceEntry>,
) -> Result<Vec<AttendanceModel>, WorkflowError> {
    access.ensure(Resource::TrainingBatch, Action::Update)?;

    let res = conn
        .transaction(|txn| {
            Box::pin(async move {
                let batch = load_batch(txn, batch_id).await?;
                ensure_unfinished(&batch)?;
                ensure_session(txn, batch_id, session_number).await?;

                let mut records = Vec::with_capacity(entries.len());
                for entry in entries {
                    ensure_member(txn, batch_id, entry.learner_id).await?;

                    // Attendance is confirmed front to back and cleared back
                    // to front.
                    if entry.attended && session_number > 1 {
                        let previous =
                            attendance::Query::get(txn, batch_id, session_number - 1, entry.learner_id).await?;
                        if !previous.is_some_and(|record| record.attended) {
                            return Err(WorkflowError::Sequence(format!(
                                "learner {} has not attended session {} yet",
                                entry.learner_id,
                                session_number - 1
                            )));
                        }
                    }
                    if !entry.attended {
                        let next =
                            attendance::Query::get(txn, batch_id, session_number + 1, entry.learner_id).await?;
                        if next.is_some_and(|record| record.attended) {
                            return Err(WorkflowError::Sequence(format!(
                                "learner {} already attended session {}",
                                entry.learner_id,
                                session_number + 1
                            )));
                        }
                    }

                    let record = attendance::Mutation::upsert(
                        txn,
                        batch_id,
                        session_number,
                        entry.learner_id,
                        entry.attended,
                    )
                    .await?;
                    records.push(record);
                }
                Result::<_, WorkflowError>::Ok(records)
            })
        })
        .await;

    res.inspect_transaction_err(
        |error| tracing::error!(error = error as &dyn Error, %batch_id, session_number, "error recording attendance"),
    )
    .flatten_res()
}

pub async fn record_homework<C: ConnectionTrait + TransactionTrait>(
    conn: &C,
    access: Access<'_>,
    batch_id: Uuid,
    session_number: i32,
    entries: Vec<HomeworkEntry>,
) -> Result<Vec<HomeworkModel>, WorkflowError> {
    access.ensure(Resource::TrainingBatch, Action::Update)?;

    let res = conn
        .transaction(|txn| {
            Box::pin(async move {
                let batch = load_batch(txn, batch_id).await?;
                ensure_unfinished(&batch)?;
                ensure_session(txn, batch_id, session_number).await?;

                let mut records = Vec::with_capacity(entries.len());
                for entry in entries {
                    ensure_member(txn, batch_id, entry.learner_id).await?;
                    let record = homework::Mutation::upsert(
                        txn,
                        batch_id,
                        session_number,
                        entry.learner_id,
                        entry.completed,
                        entry.homework_url,
                    )
                    .await?;
                    records.push(record);
                }
                Result::<_, WorkflowError>::Ok(records)
            })
        })
        .await;

    res.inspect_transaction_err(
        |error| tracing::error!(error = error as &dyn Error, %batch_id, session_number, "error recording homework"),
    )
    .flatten_res()
}

/// Closes the batch once every session is dated and every learner attended
/// every session. Members' requests move on to `SessionsCompleted`.
pub async fn finish<C: ConnectionTrait + TransactionTrait>(
    conn: &C,
    access: Access<'_>,
    batch_id: Uuid,
) -> Result<Model, WorkflowError> {
    access.ensure(Resource::TrainingBatch, Action::Update)?;

    let res = conn
        .transaction(|txn| {
            Box::pin(async move {
                let batch = load_batch(txn, batch_id).await?;
                ensure_unfinished(&batch)?;

                let sessions = session::Query::for_batch(txn, batch_id).await?;
                if let Some(undated) = sessions.iter().find(|session| session.session_date.is_none()) {
                    return Err(WorkflowError::NotReady(format!(
                        "session {} has no date yet",
                        undated.number
                    )));
                }
                let members = learner::Query::for_batch(txn, batch_id).await?;
                let attended: HashSet<(i32, Uuid)> = attendance::Query::for_batch(txn, batch_id)
                    .await?
                    .into_iter()
                    .filter(|record| record.attended)
                    .map(|record| (record.session_number, record.learner_id))
                    .collect();
                for member in &members {
                    for session in &sessions {
                        if !attended.contains(&(session.number, member.learner_id)) {
                            return Err(WorkflowError::NotReady(format!(
                                "learner {} has no confirmed attendance for session {}",
                                member.learner_id, session.number
                            )));
                        }
                    }
                }

                // The filtered update makes a concurrent double finish lose.
                let rows = Mutation::mark_finished(txn, batch_id, Utc::now().naive_utc()).await?;
                if rows == 0 {
                    return Err(WorkflowError::Validation(format!(
                        "training batch {batch_id} is already finished"
                    )));
                }
                training_request::Mutation::set_status_for_batch(txn, batch_id, Status::SessionsCompleted).await?;

                let model = load_batch(txn, batch_id).await?;
                Result::<_, WorkflowError>::Ok(model)
            })
        })
        .await;

    let model = res
        .inspect_transaction_err(
            |error| tracing::error!(error = error as &dyn Error, %batch_id, "error finishing training batch"),
        )
        .flatten_res()?;
    tracing::debug!(batch_id = %model.id, "finished training batch");
    Ok(model)
}

/// Dismantles an unfinished batch: every member's request goes back to the
/// queue, then sessions, attendance, homework and the batch row itself are
/// removed.
pub async fn delete<C: ConnectionTrait + TransactionTrait>(
    conn: &C,
    access: Access<'_>,
    batch_id: Uuid,
) -> Result<(), WorkflowError> {
    access.ensure(Resource::TrainingBatch, Action::Delete)?;

    let res = conn
        .transaction(|txn| {
            Box::pin(async move {
                let batch = load_batch(txn, batch_id).await?;
                if batch.is_finished() {
                    return Err(WorkflowError::Validation(format!(
                        "training batch {batch_id} is finished and cannot be deleted"
                    )));
                }
                let released =
                    training_request::Mutation::release_all_for_batch(txn, batch_id, Status::InQueue).await?;
                attendance::Mutation::delete_for_batch(txn, batch_id).await?;
                homework::Mutation::delete_for_batch(txn, batch_id).await?;
                session::Mutation::delete_for_batch(txn, batch_id).await?;
                learner::Mutation::delete_for_batch(txn, batch_id).await?;
                Mutation::delete(txn, batch_id).await?;
                Result::<_, WorkflowError>::Ok(released)
            })
        })
        .await;

    let released = res
        .inspect_transaction_err(
            |error| tracing::error!(error = error as &dyn Error, %batch_id, "error deleting training batch"),
        )
        .flatten_res()?;
    tracing::debug!(%batch_id, released, "deleted training batch");
    Ok(())
}

async fn load_batch<C: ConnectionTrait>(conn: &C, batch_id: Uuid) -> Result<Model, WorkflowError> {
    Query::by_id(conn, batch_id)
        .await?
        .ok_or_else(|| WorkflowError::NotFound(format!("training batch {batch_id} not found")))
}

fn ensure_unfinished(batch: &Model) -> Result<(), WorkflowError> {
    if batch.is_finished() {
        return Err(WorkflowError::Validation(format!(
            "training batch {} is finished",
            batch.id
        )));
    }
    Ok(())
}

async fn ensure_session<C: ConnectionTrait>(conn: &C, batch_id: Uuid, number: i32) -> Result<(), WorkflowError> {
    if session::Query::get(conn, batch_id, number).await?.is_none() {
        return Err(WorkflowError::NotFound(format!(
            "training batch {batch_id} has no session {number}"
        )));
    }
    Ok(())
}

async fn ensure_member<C: ConnectionTrait>(conn: &C, batch_id: Uuid, learner_id: Uuid) -> Result<(), WorkflowError> {
    if learner::Query::get(conn, batch_id, learner_id).await?.is_none() {
        return Err(WorkflowError::NotFound(format!(
            "learner {learner_id} is not in training batch {batch_id}"
        )));
    }
    Ok(())
}

fn ensure_unique_learners(learner_ids: &[Uuid]) -> Result<(), WorkflowError> {
    let unique: HashSet<&Uuid> = learner_ids.iter().collect();
    if unique.len() != learner_ids.len() {
        return Err(WorkflowError::Validation("learner ids must be unique".to_owned()));
    }
    Ok(())
}

fn participant_count(len: usize) -> Result<i32, WorkflowError> {
    i32::try_from(len).map_err(|_| WorkflowError::Capacity("participant count out of range".to_owned()))
}

/// Maps each learner to their queue-eligible training request, refusing the
/// whole operation if one is missing.
async fn resolve_members<C: ConnectionTrait>(
    conn: &C,
    competency_level: &str,
    eligible: &[Status],
    learner_ids: &[Uuid],
) -> Result<Vec<(Uuid, String)>, WorkflowError> {
    let mut members = Vec::with_capacity(learner_ids.len());
    for learner_id in learner_ids {
        let request = training_request::Query::for_learner_level_in(conn, *learner_id, competency_level, eligible)
            .await?
            .ok_or_else(|| {
                WorkflowError::Eligibility(format!(
                    "learner {learner_id} has no queue-eligible training request for {competency_level}"
                ))
            })?;
        members.push((*learner_id, request.id));
    }
    Ok(members)
}

async fn release_member<C: ConnectionTrait>(
    conn: &C,
    batch_id: Uuid,
    member: &keiko_entity::batch::learner::Model,
    status: Status,
    drop_off_reason: Option<String>,
) -> Result<(), WorkflowError> {
    learner::Mutation::remove(conn, batch_id, member.learner_id).await?;
    attendance::Mutation::delete_for_learner(conn, batch_id, member.learner_id).await?;
    homework::Mutation::delete_for_learner(conn, batch_id, member.learner_id).await?;
    training_request::Mutation::release_from_batch(conn, &member.training_request_id, status, drop_off_reason)
        .await?;
    Ok(())
}

async fn release_one<C: ConnectionTrait + TransactionTrait>(
    conn: &C,
    batch_id: Uuid,
    learner_id: Uuid,
    status: Status,
    drop_off_reason: Option<String>,
) -> Result<Model, WorkflowError> {
    let res = conn
        .transaction(|txn| {
            Box::pin(async move {
                let batch = load_batch(txn, batch_id).await?;
                ensure_unfinished(&batch)?;
                let member = learner::Query::get(txn, batch_id, learner_id).await?.ok_or_else(|| {
                    WorkflowError::NotFound(format!("learner {learner_id} is not in training batch {batch_id}"))
                })?;
                release_member(txn, batch_id, &member, status, drop_off_reason).await?;
                let model = Mutation::recompute_counters(txn, batch_id).await?;
                Result::<_, WorkflowError>::Ok(model)
            })
        })
        .await;

    let model = res
        .inspect_transaction_err(
            |error| tracing::error!(error = error as &dyn Error, %batch_id, %learner_id, "error releasing learner"),
        )
        .flatten_res()?;
    tracing::debug!(batch_id = %model.id, %learner_id, to = ?status, "released learner from batch");
    Ok(model)
}

/// Expands (number, date) pairs over 1..=session_count for creation.
fn spread_dates(
    session_count: i32,
    dates: &[(i32, NaiveDate)],
) -> Result<Vec<(i32, Option<NaiveDate>)>, WorkflowError> {
    let mut rows: Vec<(i32, Option<NaiveDate>)> = (1..=session_count).map(|number| (number, None)).collect();
    for (number, date) in dates {
        let slot = rows
            .iter_mut()
            .find(|(candidate, _)| candidate == number)
            .ok_or_else(|| WorkflowError::Validation(format!("session {number} is outside 1..={session_count}")))?;
        if slot.1.replace(*date).is_some() {
            return Err(WorkflowError::Validation(format!("session {number} is dated twice")));
        }
    }
    ensure_date_prefix(rows.iter().map(|(number, date)| (*number, date.is_some())))?;
    Ok(rows)
}

/// Applies incoming dates on top of the stored ones and re-checks the prefix
/// rule over the combined result.
async fn apply_session_dates<C: ConnectionTrait>(
    conn: &C,
    batch_id: Uuid,
    dates: &[(i32, NaiveDate)],
) -> Result<(), WorkflowError> {
    let sessions = session::Query::for_batch(conn, batch_id).await?;
    let mut resulting: Vec<(i32, Option<NaiveDate>)> = sessions
        .iter()
        .map(|session| (session.number, session.session_date))
        .collect();

    let mut seen = HashSet::new();
    for (number, date) in dates {
        if !seen.insert(*number) {
            return Err(WorkflowError::Validation(format!("session {number} is dated twice")));
        }
        let slot = resulting
            .iter_mut()
            .find(|(candidate, _)| candidate == number)
            .ok_or_else(|| {
                WorkflowError::NotFound(format!("training batch {batch_id} has no session {number}"))
            })?;
        slot.1 = Some(*date);
    }
    ensure_date_prefix(resulting.iter().map(|(number, date)| (*number, date.is_some())))?;

    for (number, date) in dates {
        session::Mutation::set_date(conn, batch_id, *number, Some(*date)).await?;
    }
    Ok(())
}

/// Session n may carry a date only if every session before it does. The
/// iterator must yield ascending session numbers.
fn ensure_date_prefix(dated: impl Iterator<Item = (i32, bool)>) -> Result<(), WorkflowError> {
    let mut first_gap = None;
    for (number, is_dated) in dated {
        match (is_dated, first_gap) {
            (false, None) => first_gap = Some(number),
            (true, Some(gap)) => {
                return Err(WorkflowError::Sequence(format!(
                    "session {number} cannot be dated while session {gap} has no date"
                )));
            }
            _ => {}
        }
    }
    Ok(())
}
