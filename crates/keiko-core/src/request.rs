//! Manual moves on the training request ledger.
//!
//! The workflow itself owns `InProgress`, `SessionsCompleted` and
//! `TrainingCompleted`; those statuses are only reachable through the batch
//! engine and the validation edges. Everything else can be set by hand here.

use crate::access::{Access, Action, Resource};
use crate::error::WorkflowError;
use keiko_db::training_request::{Mutation, Query};
use keiko_db::util::{FlattenTransactionResultExt, InspectTransactionError};
use keiko_entity::training_request::{Model, Status};
use sea_orm::{ConnectionTrait, TransactionTrait};
use std::error::Error;
use uuid::Uuid;

/// Statuses a request may carry on entry into the ledger.
const CREATION_STATUSES: [Status; 3] = [Status::NotStarted, Status::LookingForTrainer, Status::InQueue];

/// Statuses reachable by hand.
const MANUAL_STATUSES: [Status; 5] = [
    Status::LookingForTrainer,
    Status::InQueue,
    Status::NoBatchMatch,
    Status::OnHold,
    Status::DropOff,
];

#[derive(Clone, Debug)]
pub struct NewTrainingRequest {
    pub id: String,
    pub learner_id: Uuid,
    pub competency_level: String,
    /// Defaults to `InQueue`.
    pub status: Option<Status>,
}

pub async fn create<C: ConnectionTrait + TransactionTrait>(
    conn: &C,
    access: Access<'_>,
    request: NewTrainingRequest,
) -> Result<Model, WorkflowError> {
    access.ensure(Resource::TrainingRequest, Action::Create)?;

    let NewTrainingRequest {
        id,
        learner_id,
        competency_level,
        status,
    } = request;
    let status = status.unwrap_or(Status::InQueue);
    if !CREATION_STATUSES.contains(&status) {
        return Err(WorkflowError::Validation(format!(
            "a training request cannot be created at status {status:?}"
        )));
    }

    let res = conn
        .transaction(|txn| {
            Box::pin(async move {
                if Query::by_id(txn, &id).await?.is_some() {
                    return Err(WorkflowError::Validation(format!(
                        "training request id {id} is already taken"
                    )));
                }
                if let Some(open) = Query::open_for_learner_level(txn, learner_id, &competency_level).await? {
                    return Err(WorkflowError::Validation(format!(
                        "learner already has an open training request {} for {competency_level}",
                        open.id
                    )));
                }
                let model = Mutation::create(txn, &id, learner_id, &competency_level, status).await?;
                Result::<_, WorkflowError>::Ok(model)
            })
        })
        .await;

    let model = res
        .inspect_transaction_err(
            |error| tracing::error!(error = error as &dyn Error, "error creating training request"),
        )
        .flatten_res()?;
    tracing::debug!(id = model.id, status = ?model.status, "created training request");
    Ok(model)
}

pub async fn update_status<C: ConnectionTrait + TransactionTrait>(
    conn: &C,
    access: Access<'_>,
    id: &str,
    status: Status,
    drop_off_reason: Option<String>,
) -> Result<Model, WorkflowError> {
    access.ensure(Resource::TrainingRequest, Action::Update)?;

    if !MANUAL_STATUSES.contains(&status) {
        return Err(WorkflowError::Validation(format!(
            "status {status:?} is owned by the workflow and cannot be set by hand"
        )));
    }
    if status == Status::DropOff && drop_off_reason.as_deref().is_none_or(|reason| reason.trim().is_empty()) {
        return Err(WorkflowError::Validation(
            "dropping off a training request requires a reason".to_owned(),
        ));
    }

    let id = id.to_owned();
    let res = conn
        .transaction(|txn| {
            Box::pin(async move {
                let current = Query::by_id(txn, &id)
                    .await?
                    .ok_or_else(|| WorkflowError::NotFound(format!("training request {id} not found")))?;
                if current.status.in_batch() {
                    return Err(WorkflowError::Validation(format!(
                        "training request {id} belongs to a batch; use the batch operations"
                    )));
                }
                if current.status.is_terminal() {
                    return Err(WorkflowError::Validation(format!(
                        "training request {id} is already completed"
                    )));
                }

                let model = Mutation::set_status(txn, &id, status).await?;
                let model = if status == Status::DropOff {
                    Mutation::set_drop_off_reason(txn, &id, drop_off_reason).await?
                } else if current.status == Status::DropOff {
                    Mutation::set_drop_off_reason(txn, &id, None).await?
                } else {
                    model
                };
                Result::<_, WorkflowError>::Ok((current.status, model))
            })
        })
        .await;

    let (previous, model) = res
        .inspect_transaction_err(
            |error| tracing::error!(error = error as &dyn Error, "error updating training request status"),
        )
        .flatten_res()?;
    tracing::debug!(id = model.id, from = ?previous, to = ?model.status, "moved training request");
    Ok(model)
}
