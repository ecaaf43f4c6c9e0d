use sea_orm::entity::prelude::*;
use serde::{Deserialize, Serialize};

#[derive(Debug, Copy, Clone, PartialEq, Eq, EnumIter, DeriveActiveEnum, Serialize, Deserialize)]
#[sea_orm(rs_type = "i32", db_type = "Integer")]
pub enum Status {
    Pending = 0,
    Approved = 1,
    Rejected = 2,
    ResubmitForRevalidation = 3,
}

impl Status {
    /// The response-due date keeps tracking the requested date only while
    /// the approval is still pending.
    #[must_use]
    pub fn response_due_tracks(&self) -> bool {
        matches!(self, Self::Pending)
    }
}

/// Approval gate for a learner's submitted validation project. Ids are
/// human-assigned, not generator-backed.
#[derive(Clone, Debug, PartialEq, DeriveEntityModel, Serialize)]
#[sea_orm(table_name = "project_approval")]
pub struct Model {
    #[sea_orm(primary_key, auto_increment = false)]
    pub id: String,
    pub learner_id: Uuid,
    pub competency_level: String,
    pub training_request_id: String,
    pub status: Status,
    /// Sticky: set once to the first editor, never overwritten while set.
    pub assigned_to: Option<String>,
    pub requested_date: Date,
    pub response_due: Date,
    pub response_date: Option<Date>,
    pub project_details: Option<String>,
    pub rejection_reason: Option<String>,
}

#[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
pub enum Relation {
    #[sea_orm(
        belongs_to = "crate::training_request::Entity",
        from = "Column::TrainingRequestId",
        to = "crate::training_request::Column::Id"
    )]
    TrainingRequest,
}

impl Related<crate::training_request::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::TrainingRequest.def()
    }
}

impl ActiveModelBehavior for ActiveModel {}
