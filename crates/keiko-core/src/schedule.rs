//! The validation schedule workflow.
//!
//! A schedule request is born from the approval edge and ends in Pass or
//! Fail. Pass completes the learner's training request; Fail sends the
//! project approval back for another round. Either effect shares the
//! transaction with the triggering update.

use crate::access::{Access, Action, Resource};
use crate::assignee::resolve_assignee;
use crate::dates::due_after;
use crate::edges::{schedule_edge, ScheduleOutcome};
use crate::error::WorkflowError;
use chrono::{NaiveDate, NaiveDateTime};
use keiko_db::training_request;
use keiko_db::util::{FlattenTransactionResultExt, InspectTransactionError};
use keiko_db::validation::{audit, project_approval, schedule_request};
use keiko_entity::validation::audit_log::EntityKind;
use keiko_entity::validation::schedule_request::{ActiveModel, Model, Status};
use sea_orm::ActiveValue::{NotSet, Set, Unchanged};
use sea_orm::{ActiveEnum, ConnectionTrait, TransactionTrait};
use std::error::Error;

/// Partial update. `None` leaves a field untouched.
#[derive(Clone, Debug, Default)]
pub struct ScheduleUpdate {
    pub status: Option<Status>,
    pub validator_ops: Option<String>,
    pub validator_trainer: Option<String>,
    pub assigned_to: Option<String>,
    pub scheduled_date: Option<NaiveDateTime>,
    pub response_date: Option<NaiveDate>,
    pub definite_answer: Option<bool>,
    pub follow_up_date: Option<NaiveDate>,
    pub description: Option<String>,
}

pub async fn update<C: ConnectionTrait + TransactionTrait>(
    conn: &C,
    access: Access<'_>,
    id: &str,
    update: ScheduleUpdate,
) -> Result<Model, WorkflowError> {
    access.ensure(Resource::ScheduleRequest, Action::Update)?;

    let id = id.to_owned();
    let actor_id = access.actor.id.clone();

    let res = conn
        .transaction(|txn| {
            Box::pin(async move {
                let current = schedule_request::Query::by_id(txn, &id)
                    .await?
                    .ok_or_else(|| WorkflowError::NotFound(format!("schedule request {id} not found")))?;

                let ScheduleUpdate {
                    status,
                    validator_ops,
                    validator_trainer,
                    assigned_to,
                    scheduled_date,
                    response_date,
                    definite_answer,
                    follow_up_date,
                    description,
                } = update;
                let new_status = status.unwrap_or(current.status);

                let assigned = resolve_assignee(current.assigned_to.as_deref(), assigned_to.as_deref(), &actor_id);
                // Both derived dates track the requested date only while
                // their driving condition holds, and freeze after.
                let response_due = if new_status.response_due_active() {
                    due_after(current.requested_date, 1)
                } else {
                    current.response_due
                };
                let resulting_answer = definite_answer.or(current.definite_answer);
                let no_follow_up_date = if resulting_answer == Some(false) {
                    Some(due_after(current.requested_date, 3))
                } else {
                    current.no_follow_up_date
                };

                let change = ActiveModel {
                    id: Unchanged(current.id.clone()),
                    status: Set(new_status),
                    assigned_to: Set(assigned),
                    response_due: Set(response_due),
                    no_follow_up_date: Set(no_follow_up_date),
                    validator_ops: validator_ops.map_or(NotSet, |validator| Set(Some(validator))),
                    validator_trainer: validator_trainer.map_or(NotSet, |validator| Set(Some(validator))),
                    scheduled_date: scheduled_date.map_or(NotSet, |date| Set(Some(date))),
                    response_date: response_date.map_or(NotSet, |date| Set(Some(date))),
                    definite_answer: definite_answer.map_or(NotSet, |answer| Set(Some(answer))),
                    follow_up_date: follow_up_date.map_or(NotSet, |date| Set(Some(date))),
                    description: description.map_or(NotSet, |description| Set(Some(description))),
                    ..Default::default()
                };
                let model = schedule_request::Mutation::update(txn, change).await?;

                audit::Mutation::append(
                    txn,
                    EntityKind::ScheduleRequest,
                    &model.id,
                    model.status.to_value(),
                    model.assigned_to.clone(),
                    model.description.clone(),
                    &actor_id,
                )
                .await?;

                match schedule_edge(current.status, model.status) {
                    Some(ScheduleOutcome::Passed) => complete_training(txn, &model).await?,
                    Some(ScheduleOutcome::Failed) => reopen_approval(txn, &model, &actor_id).await?,
                    None => {}
                }
                Result::<_, WorkflowError>::Ok(model)
            })
        })
        .await;

    let model = res
        .inspect_transaction_err(
            |error| tracing::error!(error = error as &dyn Error, "error updating schedule request"),
        )
        .flatten_res()?;
    tracing::debug!(id = model.id, status = ?model.status, "updated schedule request");
    Ok(model)
}

/// Removes a schedule request together with its audit trail. Requests that
/// already reached an outcome may be deleted too; the effects their edges
/// had on other entities stay.
pub async fn delete<C: ConnectionTrait + TransactionTrait>(
    conn: &C,
    access: Access<'_>,
    id: &str,
) -> Result<(), WorkflowError> {
    access.ensure(Resource::ScheduleRequest, Action::Delete)?;

    let id = id.to_owned();
    let res = conn
        .transaction(|txn| {
            Box::pin(async move {
                if schedule_request::Query::by_id(txn, &id).await?.is_none() {
                    return Err(WorkflowError::NotFound(format!("schedule request {id} not found")));
                }
                let entries = audit::Mutation::delete_for_entity(txn, EntityKind::ScheduleRequest, &id).await?;
                schedule_request::Mutation::delete(txn, &id).await?;
                Result::<_, WorkflowError>::Ok((id, entries))
            })
        })
        .await;

    let (id, entries) = res
        .inspect_transaction_err(
            |error| tracing::error!(error = error as &dyn Error, "error deleting schedule request"),
        )
        .flatten_res()?;
    tracing::debug!(id, entries, "deleted schedule request");
    Ok(())
}

/// Pass edge: the learner is done with this competency level.
async fn complete_training<C: ConnectionTrait>(conn: &C, request: &Model) -> Result<(), WorkflowError> {
    let request_id = &request.training_request_id;
    if training_request::Query::by_id(conn, request_id).await?.is_none() {
        return Err(WorkflowError::NotFound(format!("training request {request_id} not found")));
    }
    training_request::Mutation::set_status(
        conn,
        request_id,
        keiko_entity::training_request::Status::TrainingCompleted,
    )
    .await?;
    tracing::debug!(training_request_id = %request_id, "training completed after passed validation");
    Ok(())
}

/// Fail edge: the project approval goes back for another round, with its
/// own audit entry for the forced move.
async fn reopen_approval<C: ConnectionTrait>(conn: &C, request: &Model, actor_id: &str) -> Result<(), WorkflowError> {
    let approval = project_approval::Query::by_training_request(conn, &request.training_request_id)
        .await?
        .ok_or_else(|| {
            WorkflowError::NotFound(format!(
                "no project approval for training request {}",
                request.training_request_id
            ))
        })?;
    let approval = project_approval::Mutation::set_status(
        conn,
        &approval.id,
        keiko_entity::validation::project_approval::Status::ResubmitForRevalidation,
    )
    .await?;
    audit::Mutation::append(
        conn,
        EntityKind::ProjectApproval,
        &approval.id,
        approval.status.to_value(),
        approval.assigned_to.clone(),
        approval.project_details.clone(),
        actor_id,
    )
    .await?;
    tracing::debug!(id = approval.id, "project approval reopened after failed validation");
    Ok(())
}
