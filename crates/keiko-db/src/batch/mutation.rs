use crate::batch::learner;
use crate::util::RequireRecord;
use chrono::{NaiveDate, NaiveDateTime};
use keiko_entity::batch::{self, ActiveModel, Entity as Batch, Model};
use paste::paste;
use sea_orm::ActiveValue::{Set, Unchanged};
use sea_orm::{ActiveModelTrait, ColumnTrait, ConnectionTrait, DbErr, EntityTrait, QueryFilter};
use std::error::Error;
use uuid::Uuid;

pub struct Mutation;

macro_rules! update_batch_field {
    ($i:ident, $t:ty) => {
        paste! {
            pub async fn [<set_ $i>]<C: ConnectionTrait>(conn: &C, batch_id: Uuid, $i: Option<$t>) -> Result<Model, DbErr> {
                let batch = ActiveModel {
                    id: Unchanged(batch_id),
                    $i: Set($i),
                    ..Default::default()
                };
                batch.update(conn).await
            }
        }
    };
}

impl Mutation {
    pub async fn create<C: ConnectionTrait>(
        conn: &C,
        competency_level: &str,
        trainer: &str,
        session_count: i32,
        capacity: i32,
        participants: i32,
        estimated_start: Option<NaiveDate>,
        batch_start_date: Option<NaiveDate>,
    ) -> Result<Model, DbErr> {
        let batch_id = Uuid::new_v4();
        let batch = ActiveModel {
            id: Set(batch_id),
            competency_level: Set(competency_level.to_owned()),
            trainer: Set(trainer.to_owned()),
            session_count: Set(session_count),
            capacity: Set(capacity),
            current_participant: Set(participants),
            spot_left: Set(capacity - participants),
            estimated_start: Set(estimated_start),
            batch_start_date: Set(batch_start_date),
            batch_finish_date: Set(None),
        };

        batch.insert(conn).await.inspect_err(
            |error| tracing::error!(error = error as &dyn Error, %batch_id, "failed to create training batch"),
        )
    }

    pub async fn set_trainer<C: ConnectionTrait>(conn: &C, batch_id: Uuid, trainer: &str) -> Result<Model, DbErr> {
        let batch = ActiveModel {
            id: Unchanged(batch_id),
            trainer: Set(trainer.to_owned()),
            ..Default::default()
        };
        batch.update(conn).await
    }

    pub async fn set_capacity<C: ConnectionTrait>(conn: &C, batch_id: Uuid, capacity: i32) -> Result<Model, DbErr> {
        let batch = ActiveModel {
            id: Unchanged(batch_id),
            capacity: Set(capacity),
            ..Default::default()
        };
        batch.update(conn).await
    }

    pub async fn set_session_count<C: ConnectionTrait>(
        conn: &C,
        batch_id: Uuid,
        session_count: i32,
    ) -> Result<Model, DbErr> {
        let batch = ActiveModel {
            id: Unchanged(batch_id),
            session_count: Set(session_count),
            ..Default::default()
        };
        batch.update(conn).await
    }

    update_batch_field!(estimated_start, NaiveDate);
    update_batch_field!(batch_start_date, NaiveDate);

    /// Re-derives `current_participant` and `spot_left` from the membership
    /// table so the two can never drift from the learner rows.
    pub async fn recompute_counters<C: ConnectionTrait>(conn: &C, batch_id: Uuid) -> Result<Model, DbErr> {
        let members = learner::Query::count(conn, batch_id).await?;
        let members =
            i32::try_from(members).map_err(|_| DbErr::Custom("participant count out of range".to_owned()))?;
        let batch = Batch::find_by_id(batch_id).one(conn).await.require("training batch")?;

        let update = ActiveModel {
            id: Unchanged(batch_id),
            current_participant: Set(members),
            spot_left: Set(batch.capacity - members),
            ..Default::default()
        };
        update.update(conn).await
    }

    /// Set-once: the filter skips batches that already carry a finish date,
    /// so a second finish reports zero affected rows.
    pub async fn mark_finished<C: ConnectionTrait>(
        conn: &C,
        batch_id: Uuid,
        finished: NaiveDateTime,
    ) -> Result<u64, DbErr> {
        let change = ActiveModel {
            batch_finish_date: Set(Some(finished)),
            ..Default::default()
        };
        Batch::update_many()
            .set(change)
            .filter(batch::Column::Id.eq(batch_id))
            .filter(batch::Column::BatchFinishDate.is_null())
            .exec(conn)
            .await
            .map(|res| res.rows_affected)
    }

    pub async fn delete<C: ConnectionTrait>(conn: &C, batch_id: Uuid) -> Result<(), DbErr> {
        let res = Batch::delete_by_id(batch_id).exec(conn).await;
        if let Err(error) = res {
            tracing::error!(error = &error as &dyn Error, %batch_id, "failed to delete training batch");
            return Err(error);
        }
        Ok(())
    }
}
