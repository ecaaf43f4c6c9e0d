use keiko_entity::batch::session::{self, Entity as BatchSession, Model};
use sea_orm::{ColumnTrait, ConnectionTrait, DbErr, EntityTrait, QueryFilter, QueryOrder};
use uuid::Uuid;

pub struct Query;

impl Query {
    pub async fn for_batch<C: ConnectionTrait>(conn: &C, batch_id: Uuid) -> Result<Vec<Model>, DbErr> {
        BatchSession::find()
            .filter(session::Column::BatchId.eq(batch_id))
            .order_by_asc(session::Column::Number)
            .all(conn)
            .await
    }

    pub async fn get<C: ConnectionTrait>(conn: &C, batch_id: Uuid, number: i32) -> Result<Option<Model>, DbErr> {
        BatchSession::find_by_id((batch_id, number)).one(conn).await
    }
}
