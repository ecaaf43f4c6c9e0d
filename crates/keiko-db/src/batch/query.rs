use keiko_entity::batch::{self, Entity as Batch, Model};
use sea_orm::{ColumnTrait, ConnectionTrait, DbErr, EntityTrait, QueryFilter};
use std::error::Error;
use uuid::Uuid;

pub struct Query;

impl Query {
    pub async fn by_id<C: ConnectionTrait>(conn: &C, batch_id: Uuid) -> Result<Option<Model>, DbErr> {
        Batch::find_by_id(batch_id).one(conn).await.inspect_err(|error| {
            tracing::error!(error = error as &dyn Error, %batch_id, "failed to load training batch");
        })
    }

    pub async fn for_level<C: ConnectionTrait>(conn: &C, competency_level: &str) -> Result<Vec<Model>, DbErr> {
        Batch::find()
            .filter(batch::Column::CompetencyLevel.eq(competency_level))
            .all(conn)
            .await
            .inspect_err(|error| {
                tracing::error!(error = error as &dyn Error, competency_level, "failed to load training batches");
            })
    }
}
