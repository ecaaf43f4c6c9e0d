//! The project approval workflow.
//!
//! Granting an approval is the edge that opens (or re-opens) the learner's
//! validation schedule request. The approval write, its audit entry and the
//! schedule request it spawns share one transaction; if the schedule side
//! fails, the approval stays untouched.

use crate::access::{Access, Action, Resource};
use crate::assignee::resolve_assignee;
use crate::dates::{due_after, today};
use crate::edges::approval_edge;
use crate::error::WorkflowError;
use chrono::NaiveDate;
use keiko_db::util::{FlattenTransactionResultExt, InspectTransactionError};
use keiko_db::validation::{audit, project_approval, schedule_request};
use keiko_db::{sequence, training_request};
use keiko_entity::validation::audit_log::EntityKind;
use keiko_entity::validation::project_approval::{ActiveModel, Model, Status};
use sea_orm::ActiveValue::{NotSet, Set, Unchanged};
use sea_orm::{ActiveEnum, ConnectionTrait, DbErr, TransactionTrait};
use std::error::Error;
use uuid::Uuid;

/// Sequence namespace behind generated schedule request ids.
const SCHEDULE_NAMESPACE: &str = "vsr";

#[derive(Clone, Debug)]
pub struct NewProjectApproval {
    pub id: String,
    pub learner_id: Uuid,
    pub competency_level: String,
    pub training_request_id: String,
    pub project_details: Option<String>,
}

/// Partial update. `None` leaves a field untouched.
#[derive(Clone, Debug, Default)]
pub struct ApprovalUpdate {
    pub status: Option<Status>,
    pub assigned_to: Option<String>,
    pub response_due: Option<NaiveDate>,
    pub response_date: Option<NaiveDate>,
    pub project_details: Option<String>,
    pub rejection_reason: Option<String>,
}

pub async fn create<C: ConnectionTrait + TransactionTrait>(
    conn: &C,
    access: Access<'_>,
    approval: NewProjectApproval,
) -> Result<Model, WorkflowError> {
    access.ensure(Resource::ProjectApproval, Action::Create)?;

    let NewProjectApproval {
        id,
        learner_id,
        competency_level,
        training_request_id,
        project_details,
    } = approval;
    let actor_id = access.actor.id.clone();
    let requested = today();

    let res = conn
        .transaction(|txn| {
            Box::pin(async move {
                if project_approval::Query::by_id(txn, &id).await?.is_some() {
                    return Err(WorkflowError::Validation(format!(
                        "project approval id {id} is already taken"
                    )));
                }
                if training_request::Query::by_id(txn, &training_request_id).await?.is_none() {
                    return Err(WorkflowError::NotFound(format!(
                        "training request {training_request_id} not found"
                    )));
                }

                let model = project_approval::Mutation::create(
                    txn,
                    &id,
                    learner_id,
                    &competency_level,
                    &training_request_id,
                    requested,
                    due_after(requested, 1),
                    project_details,
                )
                .await?;
                audit::Mutation::append(
                    txn,
                    EntityKind::ProjectApproval,
                    &model.id,
                    model.status.to_value(),
                    model.assigned_to.clone(),
                    model.project_details.clone(),
                    &actor_id,
                )
                .await?;
                Result::<_, WorkflowError>::Ok(model)
            })
        })
        .await;

    let model = res
        .inspect_transaction_err(
            |error| tracing::error!(error = error as &dyn Error, "error creating project approval"),
        )
        .flatten_res()?;
    tracing::debug!(id = model.id, "created project approval");
    Ok(model)
}

pub async fn update<C: ConnectionTrait + TransactionTrait>(
    conn: &C,
    access: Access<'_>,
    id: &str,
    update: ApprovalUpdate,
) -> Result<Model, WorkflowError> {
    access.ensure(Resource::ProjectApproval, Action::Update)?;

    let id = id.to_owned();
    let actor_id = access.actor.id.clone();
    let today = today();

    let res = conn
        .transaction(|txn| {
            Box::pin(async move {
                let current = project_approval::Query::by_id(txn, &id)
                    .await?
                    .ok_or_else(|| WorkflowError::NotFound(format!("project approval {id} not found")))?;

                let ApprovalUpdate {
                    status,
                    assigned_to,
                    response_due,
                    response_date,
                    project_details,
                    rejection_reason,
                } = update;
                let new_status = status.unwrap_or(current.status);

                if new_status == Status::Rejected {
                    let reason = rejection_reason.as_deref().or(current.rejection_reason.as_deref());
                    if reason.is_none_or(|reason| reason.trim().is_empty()) {
                        return Err(WorkflowError::Validation(
                            "rejecting a project approval requires a reason".to_owned(),
                        ));
                    }
                }

                let assigned = resolve_assignee(current.assigned_to.as_deref(), assigned_to.as_deref(), &actor_id);
                // An explicit due date wins; otherwise the due date keeps
                // tracking the requested date while still pending, and is
                // frozen once the approval has an answer.
                let response_due = match response_due {
                    Some(due) => due,
                    None if new_status.response_due_tracks() => due_after(current.requested_date, 1),
                    None => current.response_due,
                };

                let change = ActiveModel {
                    id: Unchanged(current.id.clone()),
                    status: Set(new_status),
                    assigned_to: Set(assigned),
                    response_due: Set(response_due),
                    response_date: response_date.map_or(NotSet, |date| Set(Some(date))),
                    project_details: project_details.map_or(NotSet, |details| Set(Some(details))),
                    rejection_reason: rejection_reason.map_or(NotSet, |reason| Set(Some(reason))),
                    ..Default::default()
                };
                let model = project_approval::Mutation::update(txn, change).await?;

                let detail = if model.status == Status::Rejected {
                    model.rejection_reason.clone()
                } else {
                    model.project_details.clone()
                };
                audit::Mutation::append(
                    txn,
                    EntityKind::ProjectApproval,
                    &model.id,
                    model.status.to_value(),
                    model.assigned_to.clone(),
                    detail,
                    &actor_id,
                )
                .await?;

                if approval_edge(current.status, model.status).is_some() {
                    grant_validation(txn, &model, today, &actor_id).await?;
                }
                Result::<_, WorkflowError>::Ok(model)
            })
        })
        .await;

    let model = res
        .inspect_transaction_err(
            |error| tracing::error!(error = error as &dyn Error, "error updating project approval"),
        )
        .flatten_res()?;
    tracing::debug!(id = model.id, status = ?model.status, "updated project approval");
    Ok(model)
}

/// The approval edge: exactly one schedule request per training request,
/// fresh for the new validation round. An existing request is re-opened in
/// place so its validators and assignee survive.
async fn grant_validation<C: ConnectionTrait>(
    conn: &C,
    approval: &Model,
    today: NaiveDate,
    actor_id: &str,
) -> Result<(), WorkflowError> {
    let response_due = due_after(today, 1);
    let details = approval.project_details.clone();

    let request = match schedule_request::Query::by_training_request(conn, &approval.training_request_id).await? {
        Some(existing) => {
            tracing::debug!(id = existing.id, "re-opening schedule request");
            schedule_request::Mutation::reset(conn, &existing.id, today, response_due, details).await?
        }
        None => {
            let id = sequence::Mutation::next_id(conn, SCHEDULE_NAMESPACE)
                .await
                .map_err(|error| match error {
                    DbErr::RecordNotUpdated => WorkflowError::Generation(SCHEDULE_NAMESPACE.to_owned()),
                    other => WorkflowError::Database(other),
                })?;
            tracing::debug!(id, training_request_id = approval.training_request_id, "creating schedule request");
            schedule_request::Mutation::create(
                conn,
                &id,
                approval.learner_id,
                &approval.competency_level,
                &approval.training_request_id,
                today,
                response_due,
                details,
            )
            .await?
        }
    };

    audit::Mutation::append(
        conn,
        EntityKind::ScheduleRequest,
        &request.id,
        request.status.to_value(),
        request.assigned_to.clone(),
        request.description.clone(),
        actor_id,
    )
    .await?;
    Ok(())
}
