use keiko_entity::batch::attendance::{self, Entity as SessionAttendance, Model};
use sea_orm::sea_query::OnConflict;
use sea_orm::{ColumnTrait, ConnectionTrait, DbErr, EntityTrait, QueryFilter, Set};
use uuid::Uuid;

pub struct Mutation;

impl Mutation {
    pub async fn upsert<C: ConnectionTrait>(
        conn: &C,
        batch_id: Uuid,
        session_number: i32,
        learner_id: Uuid,
        attended: bool,
    ) -> Result<Model, DbErr> {
        let on_conflict = OnConflict::columns([
            attendance::Column::BatchId,
            attendance::Column::SessionNumber,
            attendance::Column::LearnerId,
        ])
        .update_columns([attendance::Column::Attended])
        .to_owned();

        let entry = attendance::ActiveModel {
            batch_id: Set(batch_id),
            session_number: Set(session_number),
            learner_id: Set(learner_id),
            attended: Set(attended),
        };
        SessionAttendance::insert(entry)
            .on_conflict(on_conflict)
            .exec_with_returning(conn)
            .await
    }

    pub async fn delete_for_learner<C: ConnectionTrait>(
        conn: &C,
        batch_id: Uuid,
        learner_id: Uuid,
    ) -> Result<u64, DbErr> {
        SessionAttendance::delete_many()
            .filter(attendance::Column::BatchId.eq(batch_id))
            .filter(attendance::Column::LearnerId.eq(learner_id))
            .exec(conn)
            .await
            .map(|res| res.rows_affected)
    }

    pub async fn delete_above<C: ConnectionTrait>(conn: &C, batch_id: Uuid, keep: i32) -> Result<u64, DbErr> {
        SessionAttendance::delete_many()
            .filter(attendance::Column::BatchId.eq(batch_id))
            .filter(attendance::Column::SessionNumber.gt(keep))
            .exec(conn)
            .await
            .map(|res| res.rows_affected)
    }

    pub async fn delete_for_batch<C: ConnectionTrait>(conn: &C, batch_id: Uuid) -> Result<u64, DbErr> {
        SessionAttendance::delete_many()
            .filter(attendance::Column::BatchId.eq(batch_id))
            .exec(conn)
            .await
            .map(|res| res.rows_affected)
    }
}
