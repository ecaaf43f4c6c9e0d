use keiko_entity::batch::learner::{self, Entity as BatchLearner, Model};
use sea_orm::{ColumnTrait, ConnectionTrait, DbErr, EntityTrait, PaginatorTrait, QueryFilter};
use uuid::Uuid;

pub struct Query;

impl Query {
    pub async fn for_batch<C: ConnectionTrait>(conn: &C, batch_id: Uuid) -> Result<Vec<Model>, DbErr> {
        BatchLearner::find()
            .filter(learner::Column::BatchId.eq(batch_id))
            .all(conn)
            .await
    }

    pub async fn get<C: ConnectionTrait>(conn: &C, batch_id: Uuid, learner_id: Uuid) -> Result<Option<Model>, DbErr> {
        BatchLearner::find_by_id((batch_id, learner_id)).one(conn).await
    }

    pub async fn count<C: ConnectionTrait>(conn: &C, batch_id: Uuid) -> Result<u64, DbErr> {
        BatchLearner::find()
            .filter(learner::Column::BatchId.eq(batch_id))
            .count(conn)
            .await
    }
}
