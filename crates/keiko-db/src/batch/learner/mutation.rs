use keiko_entity::batch::learner::{self, Entity as BatchLearner};
use sea_orm::ActiveValue::Set;
use sea_orm::{ColumnTrait, ConnectionTrait, DbErr, EntityTrait, QueryFilter};
use uuid::Uuid;

pub struct Mutation;

impl Mutation {
    /// Members arrive as (learner id, originating training request id).
    pub async fn insert_many<C: ConnectionTrait>(
        conn: &C,
        batch_id: Uuid,
        members: Vec<(Uuid, String)>,
    ) -> Result<(), DbErr> {
        if members.is_empty() {
            return Ok(());
        }
        let rows = members
            .into_iter()
            .map(|(learner_id, training_request_id)| learner::ActiveModel {
                batch_id: Set(batch_id),
                learner_id: Set(learner_id),
                training_request_id: Set(training_request_id),
            });
        BatchLearner::insert_many(rows).exec(conn).await?;
        Ok(())
    }

    pub async fn remove<C: ConnectionTrait>(conn: &C, batch_id: Uuid, learner_id: Uuid) -> Result<u64, DbErr> {
        BatchLearner::delete_by_id((batch_id, learner_id))
            .exec(conn)
            .await
            .map(|res| res.rows_affected)
    }

    pub async fn delete_for_batch<C: ConnectionTrait>(conn: &C, batch_id: Uuid) -> Result<u64, DbErr> {
        BatchLearner::delete_many()
            .filter(learner::Column::BatchId.eq(batch_id))
            .exec(conn)
            .await
            .map(|res| res.rows_affected)
    }
}
