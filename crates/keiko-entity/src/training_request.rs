use sea_orm::entity::prelude::*;
use serde::{Deserialize, Serialize};

/// Where a learner stands with one competency level. The codes are stored
/// as-is; human labels are looked up at the boundary.
#[derive(Debug, Copy, Clone, PartialEq, Eq, EnumIter, DeriveActiveEnum, Serialize, Deserialize)]
#[sea_orm(rs_type = "i32", db_type = "Integer")]
pub enum Status {
    NotStarted = 0,
    LookingForTrainer = 1,
    InQueue = 2,
    NoBatchMatch = 3,
    InProgress = 4,
    SessionsCompleted = 5,
    OnHold = 6,
    DropOff = 7,
    TrainingCompleted = 8,
}

impl Status {
    /// A completed request is never reopened or reused.
    #[must_use]
    pub fn is_terminal(&self) -> bool {
        matches!(self, Self::TrainingCompleted)
    }

    #[must_use]
    pub fn in_batch(&self) -> bool {
        matches!(self, Self::InProgress)
    }
}

#[derive(Clone, Debug, PartialEq, DeriveEntityModel, Serialize)]
#[sea_orm(table_name = "training_request")]
pub struct Model {
    #[sea_orm(primary_key, auto_increment = false)]
    pub id: String,
    pub learner_id: Uuid,
    pub competency_level: String,
    pub status: Status,
    pub training_batch_id: Option<Uuid>,
    pub drop_off_reason: Option<String>,
}

#[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
pub enum Relation {
    #[sea_orm(
        belongs_to = "crate::batch::Entity",
        from = "Column::TrainingBatchId",
        to = "crate::batch::Column::Id"
    )]
    Batch,
    #[sea_orm(has_many = "crate::validation::project_approval::Entity")]
    ProjectApproval,
    #[sea_orm(has_many = "crate::validation::schedule_request::Entity")]
    ScheduleRequest,
}

impl Related<crate::batch::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::Batch.def()
    }
}

impl Related<crate::validation::project_approval::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::ProjectApproval.def()
    }
}

impl Related<crate::validation::schedule_request::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::ScheduleRequest.def()
    }
}

impl ActiveModelBehavior for ActiveModel {}
