use chrono::NaiveDate;
use keiko_entity::validation::project_approval::{ActiveModel, Model, Status};
use sea_orm::ActiveValue::{Set, Unchanged};
use sea_orm::{ActiveModelTrait, ConnectionTrait, DbErr};
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
        project_details: Option<String>,
    ) -> Result<Model, DbErr> {
        let approval = ActiveModel {
            id: Set(id.to_owned()),
            learner_id: Set(learner_id),
            competency_level: Set(competency_level.to_owned()),
            training_request_id: Set(training_request_id.to_owned()),
            status: Set(Status::Pending),
            assigned_to: Set(None),
            requested_date: Set(requested_date),
            response_due: Set(response_due),
            response_date: Set(None),
            project_details: Set(project_details),
            rejection_reason: Set(None),
        };

        approval.insert(conn).await.inspect_err(
            |error| tracing::error!(error = error as &dyn Error, id, "failed to create project approval"),
        )
    }

    /// Partial update; fields the caller leaves `NotSet` keep their value.
    pub async fn update<C: ConnectionTrait>(conn: &C, approval: ActiveModel) -> Result<Model, DbErr> {
        approval.update(conn).await
    }

    /// Forced move used by the schedule-request fail edge.
    pub async fn set_status<C: ConnectionTrait>(conn: &C, id: &str, status: Status) -> Result<Model, DbErr> {
        let approval = ActiveModel {
            id: Unchanged(id.to_owned()),
            status: Set(status),
            ..Default::default()
        };
        approval.update(conn).await
    }
}
