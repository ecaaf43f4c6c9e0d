use crate::batch::homework::query;
use crate::util::{FlattenTransactionResultExt, RequireRecord};
use keiko_entity::batch::homework::{self, Entity as SessionHomework, Model};
use sea_orm::sea_query::OnConflict;
use sea_orm::{ColumnTrait, ConnectionTrait, DbErr, EntityTrait, QueryFilter, Set, TransactionTrait};
use uuid::Uuid;

pub struct Mutation;

impl Mutation {
    /// Upserts the completion flag. The submission url is written only when
    /// the row does not carry one yet, so re-submissions keep the original.
    pub async fn upsert<C: ConnectionTrait + TransactionTrait>(
        conn: &C,
        batch_id: Uuid,
        session_number: i32,
        learner_id: Uuid,
        completed: bool,
        homework_url: Option<String>,
    ) -> Result<Model, DbErr> {
        conn.transaction(|txn| {
            Box::pin(async move {
                let on_conflict = OnConflict::columns([
                    homework::Column::BatchId,
                    homework::Column::SessionNumber,
                    homework::Column::LearnerId,
                ])
                .update_columns([homework::Column::Completed])
                .to_owned();

                let entry = homework::ActiveModel {
                    batch_id: Set(batch_id),
                    session_number: Set(session_number),
                    learner_id: Set(learner_id),
                    completed: Set(completed),
                    homework_url: Set(homework_url.clone()),
                };
                SessionHomework::insert(entry).on_conflict(on_conflict).exec(txn).await?;

                if let Some(url) = homework_url {
                    let change = homework::ActiveModel {
                        homework_url: Set(Some(url)),
                        ..Default::default()
                    };
                    SessionHomework::update_many()
                        .set(change)
                        .filter(homework::Column::BatchId.eq(batch_id))
                        .filter(homework::Column::SessionNumber.eq(session_number))
                        .filter(homework::Column::LearnerId.eq(learner_id))
                        .filter(homework::Column::HomeworkUrl.is_null())
                        .exec(txn)
                        .await?;
                }

                query::Query::get(txn, batch_id, session_number, learner_id)
                    .await
                    .require("homework entry")
            })
        })
        .await
        .flatten_res()
    }

    pub async fn delete_for_learner<C: ConnectionTrait>(
        conn: &C,
        batch_id: Uuid,
        learner_id: Uuid,
    ) -> Result<u64, DbErr> {
        SessionHomework::delete_many()
            .filter(homework::Column::BatchId.eq(batch_id))
            .filter(homework::Column::LearnerId.eq(learner_id))
            .exec(conn)
            .await
            .map(|res| res.rows_affected)
    }

    pub async fn delete_above<C: ConnectionTrait>(conn: &C, batch_id: Uuid, keep: i32) -> Result<u64, DbErr> {
        SessionHomework::delete_many()
            .filter(homework::Column::BatchId.eq(batch_id))
            .filter(homework::Column::SessionNumber.gt(keep))
            .exec(conn)
            .await
            .map(|res| res.rows_affected)
    }

    pub async fn delete_for_batch<C: ConnectionTrait>(conn: &C, batch_id: Uuid) -> Result<u64, DbErr> {
        SessionHomework::delete_many()
            .filter(homework::Column::BatchId.eq(batch_id))
            .exec(conn)
            .await
            .map(|res| res.rows_affected)
    }
}
