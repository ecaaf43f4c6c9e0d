use keiko_entity::training_request::{self, ActiveModel, Entity as TrainingRequest, Model, Status};
use paste::paste;
use sea_orm::ActiveValue::{Set, Unchanged};
use sea_orm::{ActiveModelTrait, ColumnTrait, ConnectionTrait, DbErr, EntityTrait, QueryFilter};
use std::error::Error;
use uuid::Uuid;

pub struct Mutation;

macro_rules! update_request_field {
    ($i:ident, $t:ty) => {
        paste! {
            pub async fn [<set_ $i>]<C: ConnectionTrait>(conn: &C, id: &str, $i: Option<$t>) -> Result<Model, DbErr> {
                let request = ActiveModel {
                    id: Unchanged(id.to_owned()),
                    $i: Set($i),
                    ..Default::default()
                };
                request.update(conn).await
            }
        }
    };
}

impl Mutation {
    pub async fn create<C: ConnectionTrait>(
        conn: &C,
        id: &str,
        learner_id: Uuid,
        competency_level: &str,
        status: Status,
    ) -> Result<Model, DbErr> {
        let request = ActiveModel {
            id: Set(id.to_owned()),
            learner_id: Set(learner_id),
            competency_level: Set(competency_level.to_owned()),
            status: Set(status),
            training_batch_id: Set(None),
            drop_off_reason: Set(None),
        };

        request.insert(conn).await.inspect_err(
            |error| tracing::error!(error = error as &dyn Error, id, %learner_id, "failed to create training request"),
        )
    }

    pub async fn set_status<C: ConnectionTrait>(conn: &C, id: &str, status: Status) -> Result<Model, DbErr> {
        let request = ActiveModel {
            id: Unchanged(id.to_owned()),
            status: Set(status),
            ..Default::default()
        };
        request.update(conn).await
    }

    /// Moves the request into a batch and flips it to `InProgress` in one
    /// write.
    pub async fn assign_to_batch<C: ConnectionTrait>(conn: &C, id: &str, batch_id: Uuid) -> Result<Model, DbErr> {
        let request = ActiveModel {
            id: Unchanged(id.to_owned()),
            status: Set(Status::InProgress),
            training_batch_id: Set(Some(batch_id)),
            ..Default::default()
        };
        request.update(conn).await
    }

    /// Clears the batch link and puts the request at `status`. The drop-off
    /// reason is overwritten either way so a stale one cannot survive a
    /// re-queue.
    pub async fn release_from_batch<C: ConnectionTrait>(
        conn: &C,
        id: &str,
        status: Status,
        drop_off_reason: Option<String>,
    ) -> Result<Model, DbErr> {
        let request = ActiveModel {
            id: Unchanged(id.to_owned()),
            status: Set(status),
            training_batch_id: Set(None),
            drop_off_reason: Set(drop_off_reason),
            ..Default::default()
        };
        request.update(conn).await
    }

    /// Resets every request still linked to the batch. Used by the batch
    /// deletion cascade; the link is cleared alongside the status.
    pub async fn release_all_for_batch<C: ConnectionTrait>(
        conn: &C,
        batch_id: Uuid,
        status: Status,
    ) -> Result<u64, DbErr> {
        let reset = ActiveModel {
            status: Set(status),
            training_batch_id: Set(None),
            ..Default::default()
        };
        TrainingRequest::update_many()
            .set(reset)
            .filter(training_request::Column::TrainingBatchId.eq(batch_id))
            .exec(conn)
            .await
            .map(|res| res.rows_affected)
    }

    /// Moves every request in the batch to `status` while keeping the batch
    /// link for history. Used when a batch finishes.
    pub async fn set_status_for_batch<C: ConnectionTrait>(
        conn: &C,
        batch_id: Uuid,
        status: Status,
    ) -> Result<u64, DbErr> {
        let change = ActiveModel {
            status: Set(status),
            ..Default::default()
        };
        TrainingRequest::update_many()
            .set(change)
            .filter(training_request::Column::TrainingBatchId.eq(batch_id))
            .exec(conn)
            .await
            .map(|res| res.rows_affected)
    }

    update_request_field!(drop_off_reason, String);
}
