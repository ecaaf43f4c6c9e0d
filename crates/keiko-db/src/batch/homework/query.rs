use keiko_entity::batch::homework::{self, Entity as SessionHomework, Model};
use sea_orm::{ColumnTrait, ConnectionTrait, DbErr, EntityTrait, QueryFilter};
use uuid::Uuid;

pub struct Query;

impl Query {
    pub async fn for_batch<C: ConnectionTrait>(conn: &C, batch_id: Uuid) -> Result<Vec<Model>, DbErr> {
        SessionHomework::find()
            .filter(homework::Column::BatchId.eq(batch_id))
            .all(conn)
            .await
    }

    pub async fn get<C: ConnectionTrait>(
        conn: &C,
        batch_id: Uuid,
        session_number: i32,
        learner_id: Uuid,
    ) -> Result<Option<Model>, DbErr> {
        SessionHomework::find_by_id((batch_id, session_number, learner_id))
            .one(conn)
            .await
    }
}
