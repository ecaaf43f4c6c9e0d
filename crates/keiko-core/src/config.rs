//! Per-deployment workflow tuning supplied by the embedding application.

use keiko_entity::training_request;
use serde::{Deserialize, Serialize};

/// Training request statuses a batch is allowed to recruit from. Statuses
/// that already belong to a running batch or a finished journey are never
/// recruitable, so they have no spelling here.
#[derive(Serialize, Deserialize)]
#[serde(deny_unknown_fields, rename_all = "kebab-case")]
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum QueueStatus {
    NotStarted,
    LookingForTrainer,
    InQueue,
    NoBatchMatch,
    OnHold,
    DropOff,
}

impl From<QueueStatus> for training_request::Status {
    fn from(status: QueueStatus) -> Self {
        match status {
            QueueStatus::NotStarted => Self::NotStarted,
            QueueStatus::LookingForTrainer => Self::LookingForTrainer,
            QueueStatus::InQueue => Self::InQueue,
            QueueStatus::NoBatchMatch => Self::NoBatchMatch,
            QueueStatus::OnHold => Self::OnHold,
            QueueStatus::DropOff => Self::DropOff,
        }
    }
}

#[derive(Serialize, Deserialize)]
#[serde(deny_unknown_fields, rename_all = "kebab-case", default)]
#[derive(Debug, Clone)]
pub struct WorkflowConfig {
    /// Statuses that make a learner's open request eligible for batch
    /// assignment.
    pub queue_eligible: Vec<QueueStatus>,
    pub min_session_count: i32,
    pub max_session_count: i32,
}

impl Default for WorkflowConfig {
    fn default() -> Self {
        Self {
            queue_eligible: vec![
                QueueStatus::LookingForTrainer,
                QueueStatus::InQueue,
                QueueStatus::NoBatchMatch,
                QueueStatus::OnHold,
                QueueStatus::DropOff,
            ],
            min_session_count: 1,
            max_session_count: 6,
        }
    }
}

impl WorkflowConfig {
    pub fn queue_eligible_statuses(&self) -> Vec<training_request::Status> {
        self.queue_eligible.iter().map(|status| (*status).into()).collect()
    }

    pub fn session_count_in_bounds(&self, count: i32) -> bool {
        (self.min_session_count..=self.max_session_count).contains(&count)
    }
}
