use keiko_entity::validation::project_approval::{self, Entity as ProjectApproval, Model};
use sea_orm::{ColumnTrait, ConnectionTrait, DbErr, EntityTrait, QueryFilter};
use std::error::Error;

pub struct Query;

impl Query {
    pub async fn by_id<C: ConnectionTrait>(conn: &C, id: &str) -> Result<Option<Model>, DbErr> {
        ProjectApproval::find_by_id(id).one(conn).await.inspect_err(|error| {
            tracing::error!(error = error as &dyn Error, id, "failed to load project approval");
        })
    }

    pub async fn by_training_request<C: ConnectionTrait>(
        conn: &C,
        training_request_id: &str,
    ) -> Result<Option<Model>, DbErr> {
        ProjectApproval::find()
            .filter(project_approval::Column::TrainingRequestId.eq(training_request_id))
            .one(conn)
            .await
    }
}
