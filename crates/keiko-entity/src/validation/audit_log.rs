use sea_orm::entity::prelude::*;
use serde::{Deserialize, Serialize};

#[derive(Debug, Copy, Clone, PartialEq, Eq, EnumIter, DeriveActiveEnum, Serialize, Deserialize)]
#[sea_orm(rs_type = "String", db_type = "String(StringLen::N(16))")]
pub enum EntityKind {
    #[sea_orm(string_value = "vpa")]
    ProjectApproval,
    #[sea_orm(string_value = "vsr")]
    ScheduleRequest,
}

/// Append-only trail of validation workflow changes. Rows are only ever
/// inserted, never updated or deleted.
#[derive(Clone, Debug, PartialEq, DeriveEntityModel, Serialize)]
#[sea_orm(table_name = "validation_audit_log")]
pub struct Model {
    #[sea_orm(primary_key)]
    pub id: i64,
    pub entity_kind: EntityKind,
    pub entity_id: String,
    pub status: i32,
    pub assigned_to: Option<String>,
    pub detail: Option<String>,
    pub updated_by: String,
    pub logged_at: DateTime,
}

#[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
pub enum Relation {}

impl ActiveModelBehavior for ActiveModel {}
