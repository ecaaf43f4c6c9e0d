use sea_orm::entity::prelude::*;
use serde::Serialize;

/// Homework per learner and session. The submission URL is written once;
/// toggling completion leaves it untouched.
#[derive(Clone, Debug, PartialEq, DeriveEntityModel, Serialize)]
#[sea_orm(table_name = "session_homework")]
pub struct Model {
    #[sea_orm(primary_key, auto_increment = false)]
    pub batch_id: Uuid,
    #[sea_orm(primary_key, auto_increment = false)]
    pub session_number: i32,
    #[sea_orm(primary_key, auto_increment = false)]
    pub learner_id: Uuid,
    pub completed: bool,
    pub homework_url: Option<String>,
}

#[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
pub enum Relation {
    #[sea_orm(
        belongs_to = "super::Entity",
        from = "Column::BatchId",
        to = "super::Column::Id"
    )]
    Batch,
}

impl Related<super::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::Batch.def()
    }
}

impl ActiveModelBehavior for ActiveModel {}
