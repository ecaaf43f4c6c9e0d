use chrono::NaiveDate;
use keiko_entity::batch::session::{self, Entity as BatchSession};
use sea_orm::ActiveValue::{Set, Unchanged};
use sea_orm::{ActiveModelTrait, ColumnTrait, ConnectionTrait, DbErr, EntityTrait, QueryFilter};
use uuid::Uuid;

pub struct Mutation;

impl Mutation {
    pub async fn insert_numbers<C: ConnectionTrait>(
        conn: &C,
        batch_id: Uuid,
        sessions: Vec<(i32, Option<NaiveDate>)>,
    ) -> Result<(), DbErr> {
        if sessions.is_empty() {
            return Ok(());
        }
        let rows = sessions.into_iter().map(|(number, session_date)| session::ActiveModel {
            batch_id: Set(batch_id),
            number: Set(number),
            session_date: Set(session_date),
        });
        BatchSession::insert_many(rows).exec(conn).await?;
        Ok(())
    }

    pub async fn set_date<C: ConnectionTrait>(
        conn: &C,
        batch_id: Uuid,
        number: i32,
        session_date: Option<NaiveDate>,
    ) -> Result<session::Model, DbErr> {
        let session = session::ActiveModel {
            batch_id: Unchanged(batch_id),
            number: Unchanged(number),
            session_date: Set(session_date),
        };
        session.update(conn).await
    }

    /// Removes the sessions above `keep` when a batch is shortened.
    pub async fn delete_above<C: ConnectionTrait>(conn: &C, batch_id: Uuid, keep: i32) -> Result<u64, DbErr> {
        BatchSession::delete_many()
            .filter(session::Column::BatchId.eq(batch_id))
            .filter(session::Column::Number.gt(keep))
            .exec(conn)
            .await
            .map(|res| res.rows_affected)
    }

    pub async fn delete_for_batch<C: ConnectionTrait>(conn: &C, batch_id: Uuid) -> Result<u64, DbErr> {
        BatchSession::delete_many()
            .filter(session::Column::BatchId.eq(batch_id))
            .exec(conn)
            .await
            .map(|res| res.rows_affected)
    }
}
