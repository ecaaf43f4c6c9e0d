use sea_orm::entity::prelude::*;
use serde::{Deserialize, Serialize};

#[derive(Debug, Copy, Clone, PartialEq, Eq, EnumIter, DeriveActiveEnum, Serialize, Deserialize)]
#[sea_orm(rs_type = "i32", db_type = "Integer")]
pub enum Status {
    PendingValidation = 0,
    PendingRevalidation = 1,
    ValidationScheduled = 2,
    Fail = 3,
    Pass = 4,
}

impl Status {
    /// A session is still due while the request awaits or holds a booking.
    #[must_use]
    pub fn response_due_active(&self) -> bool {
        matches!(
            self,
            Self::PendingValidation | Self::PendingRevalidation | Self::ValidationScheduled
        )
    }

    /// Pass and Fail are the only outcomes that close the request.
    #[must_use]
    pub fn is_outcome(&self) -> bool {
        matches!(self, Self::Fail | Self::Pass)
    }
}

/// Booking and outcome record for a validation session. Ids come from the
/// sequence counter ("VSR07").
#[derive(Clone, Debug, PartialEq, DeriveEntityModel, Serialize)]
#[sea_orm(table_name = "schedule_request")]
pub struct Model {
    #[sea_orm(primary_key, auto_increment = false)]
    pub id: String,
    pub learner_id: Uuid,
    pub competency_level: String,
    pub training_request_id: String,
    pub status: Status,
    pub validator_ops: Option<String>,
    pub validator_trainer: Option<String>,
    /// Sticky: set once to the first editor, never overwritten while set.
    pub assigned_to: Option<String>,
    pub requested_date: Date,
    pub response_due: Date,
    pub response_date: Option<Date>,
    pub scheduled_date: Option<DateTime>,
    pub definite_answer: Option<bool>,
    pub follow_up_date: Option<Date>,
    pub no_follow_up_date: Option<Date>,
    pub description: Option<String>,
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
