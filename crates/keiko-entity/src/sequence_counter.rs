use sea_orm::entity::prelude::*;
use serde::Serialize;

/// Per-namespace running number behind the generated request ids. The row
/// is bumped with a single atomic update so concurrent readers never see
/// the same value twice.
#[derive(Clone, Debug, PartialEq, DeriveEntityModel, Serialize)]
#[sea_orm(table_name = "sequence_counter")]
pub struct Model {
    #[sea_orm(primary_key, auto_increment = false)]
    pub namespace: String,
    pub running_number: i32,
}

#[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
pub enum Relation {}

impl ActiveModelBehavior for ActiveModel {}
