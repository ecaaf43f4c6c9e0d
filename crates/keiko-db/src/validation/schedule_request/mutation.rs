use chrono::NaiveDate;
use keiko_entity::validation::schedule_request::{ActiveModel, Entity as ScheduleRequest, Model, Status};
use sea_orm::ActiveValue::{Set, Unchanged};
use sea_orm::{ActiveModelTrait, ConnectionTrait, DbErr, EntityTrait};
use std::error::Error;
use uuid::Uuid;

pub struct Mutation;

impl Mutation {
    #[allow(clippy::too_many_arguments)]
    pub async fn create<C: ConnectionTrait>(
        conn: &C,
        id: &str,
        learner_id: Uuid,
        competency_level: &str,
        training_request_id: &str,
        requested_date: NaiveDate,
        response_due: NaiveDate,
        description: Option<String>,
    ) -> Result<Model, DbErr> {
        let request = ActiveModel {
            id: Set(id.to_owned()),
            learner_id: Set(learner_id),
            competency_level: Set(competency_level.to_owned()),
            training_request_id: Set(training_request_id.to_owned()),
            status: Set(Status::PendingValidation),
            validator_ops: Set(None),
            validator_trainer: Set(None),
            assigned_to: Set(None),
            requested_date: Set(requested_date),
            response_due: Set(response_due),
            response_date: Set(None),
            scheduled_date: Set(None),
            definite_answer: Set(None),
            follow_up_date: Set(None),
            no_follow_up_date: Set(None),
            description: Set(description),
        };

        request.insert(conn).await.inspect_err(
            |error| tracing::error!(error = error as &dyn Error, id, "failed to create schedule request"),
        )
    }

    /// Partial update; fields the caller leaves `NotSet` keep their value.
    pub async fn update<C: ConnectionTrait>(conn: &C, request: ActiveModel) -> Result<Model, DbErr> {
        request.update(conn).await
    }

    /// Re-opens an existing request after a fresh project approval. Only the
    /// validation-cycle fields move; validators and the assignee survive.
    pub async fn reset<C: ConnectionTrait>(
        conn: &C,
        id: &str,
        requested_date: NaiveDate,
        response_due: NaiveDate,
        description: Option<String>,
    ) -> Result<Model, DbErr> {
        let request = ActiveModel {
            id: Unchanged(id.to_owned()),
            status: Set(Status::PendingValidation),
            requested_date: Set(requested_date),
            response_due: Set(response_due),
            description: Set(description),
            ..Default::default()
        };
        request.update(conn).await
    }

    pub async fn delete<C: ConnectionTrait>(conn: &C, id: &str) -> Result<u64, DbErr> {
        ScheduleRequest::delete_by_id(id)
            .exec(conn)
            .await
            .map(|res| res.rows_affected)
            .inspect_err(|error| {
                tracing::error!(error = error as &dyn Error, id, "failed to delete schedule request");
            })
    }
}
