use sea_orm::entity::prelude::*;
use serde::Serialize;

/// Membership of a learner in a batch, keeping the training request that
/// brought them in so removal can reset the right ledger row.
#[derive(Clone, Debug, PartialEq, DeriveEntityModel, Serialize)]
#[sea_orm(table_name = "batch_learner")]
pub struct Model {
    #[sea_orm(primary_key, auto_increment = false)]
    pub batch_id: Uuid,
    #[sea_orm(primary_key, auto_increment = false)]
    pub learner_id: Uuid,
    pub training_request_id: String,
}

#[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
pub enum Relation {
    #[sea_orm(
        belongs_to = "super::Entity",
        from = "Column::BatchId",
        to = "super::Column::Id"
    )]
    Batch,
    #[sea_orm(
        belongs_to = "crate::training_request::Entity",
        from = "Column::TrainingRequestId",
        to = "crate::training_request::Column::Id"
    )]
    TrainingRequest,
}

impl Related<super::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::Batch.def()
    }
}

impl Related<crate::training_request::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::TrainingRequest.def()
    }
}

impl ActiveModelBehavior for ActiveModel {}
