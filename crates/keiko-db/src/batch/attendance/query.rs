use keiko_entity::batch::attendance::{self, Entity as SessionAttendance, Model};
use sea_orm::{ColumnTrait, ConnectionTrait, DbErr, EntityTrait, QueryFilter};
use uuid::Uuid;

pub struct Query;

impl Query {
    pub async fn for_batch<C: ConnectionTrait>(conn: &C, batch_id: Uuid) -> Result<Vec<Model>, DbErr> {
        SessionAttendance::find()
            .filter(attendance::Column::BatchId.eq(batch_id))
            .all(conn)
            .await
    }

    pub async fn get<C: ConnectionTrait>(
        conn: &C,
        batch_id: Uuid,
        session_number: i32,
        learner_id: Uuid,
    ) -> Result<Option<Model>, DbErr> {
        SessionAttendance::find_by_id((batch_id, session_number, learner_id))
            .one(conn)
            .await
    }
}
