use keiko_entity::training_request::{self, Entity as TrainingRequest, Model, Status};
use sea_orm::{ColumnTrait, ConnectionTrait, DbErr, EntityTrait, QueryFilter};
use std::error::Error;
use uuid::Uuid;

pub struct Query;

impl Query {
    pub async fn by_id<C: ConnectionTrait>(conn: &C, id: &str) -> Result<Option<Model>, DbErr> {
        TrainingRequest::find_by_id(id).one(conn).await.inspect_err(|error| {
            tracing::error!(error = error as &dyn Error, id, "failed to load training request");
        })
    }

    pub async fn for_learner_level<C: ConnectionTrait>(
        conn: &C,
        learner_id: Uuid,
        competency_level: &str,
    ) -> Result<Vec<Model>, DbErr> {
        TrainingRequest::find()
            .filter(training_request::Column::LearnerId.eq(learner_id))
            .filter(training_request::Column::CompetencyLevel.eq(competency_level))
            .all(conn)
            .await
            .inspect_err(|error| {
                tracing::error!(error = error as &dyn Error, %learner_id, "failed to load training requests");
            })
    }

    /// The open request for (learner, level), if any. At most one exists
    /// because creation refuses a second non-terminal request.
    pub async fn open_for_learner_level<C: ConnectionTrait>(
        conn: &C,
        learner_id: Uuid,
        competency_level: &str,
    ) -> Result<Option<Model>, DbErr> {
        TrainingRequest::find()
            .filter(training_request::Column::LearnerId.eq(learner_id))
            .filter(training_request::Column::CompetencyLevel.eq(competency_level))
            .filter(training_request::Column::Status.ne(Status::TrainingCompleted))
            .one(conn)
            .await
    }

    /// Restricts the lookup to the given statuses, e.g. the queue-eligible
    /// set when a batch picks up learners.
    pub async fn for_learner_level_in<C: ConnectionTrait>(
        conn: &C,
        learner_id: Uuid,
        competency_level: &str,
        statuses: &[Status],
    ) -> Result<Option<Model>, DbErr> {
        TrainingRequest::find()
            .filter(training_request::Column::LearnerId.eq(learner_id))
            .filter(training_request::Column::CompetencyLevel.eq(competency_level))
            .filter(training_request::Column::Status.is_in(statuses.iter().copied()))
            .one(conn)
            .await
    }

    pub async fn for_batch<C: ConnectionTrait>(conn: &C, batch_id: Uuid) -> Result<Vec<Model>, DbErr> {
        TrainingRequest::find()
            .filter(training_request::Column::TrainingBatchId.eq(batch_id))
            .all(conn)
            .await
    }
}
