pub mod attendance;
pub mod homework;
pub mod learner;
pub mod session;

use sea_orm::entity::prelude::*;
use serde::Serialize;

/// A scheduled group instruction unit: one trainer, a fixed number of
/// sessions and a fixed learner capacity.
#[derive(Clone, Debug, PartialEq, DeriveEntityModel, Serialize)]
#[sea_orm(table_name = "training_batch")]
pub struct Model {
    #[sea_orm(primary_key, auto_increment = false)]
    pub id: Uuid,
    pub competency_level: String,
    pub trainer: String,
    pub session_count: i32,
    pub capacity: i32,
    pub current_participant: i32,
    pub spot_left: i32,
    pub estimated_start: Option<Date>,
    pub batch_start_date: Option<Date>,
    pub batch_finish_date: Option<DateTime>,
}

impl Model {
    /// Finishing is terminal; a finished batch accepts no further mutation.
    #[must_use]
    pub fn is_finished(&self) -> bool {
        self.batch_finish_date.is_some()
    }
}

#[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
pub enum Relation {
    #[sea_orm(has_many = "session::Entity")]
    Session,
    #[sea_orm(has_many = "learner::Entity")]
    Learner,
    #[sea_orm(has_many = "attendance::Entity")]
    Attendance,
    #[sea_orm(has_many = "homework::Entity")]
    Homework,
}

impl Related<session::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::Session.def()
    }
}

impl Related<learner::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::Learner.def()
    }
}

impl Related<attendance::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::Attendance.def()
    }
}

impl Related<homework::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::Homework.def()
    }
}

impl ActiveModelBehavior for ActiveModel {}
