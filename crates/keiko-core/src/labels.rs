//! Human-readable status labels for the presentation boundary.
//!
//! The engine stores and compares numeric status codes only. Labels are an
//! external concern: the embedding application deserializes a [`StatusLabels`]
//! table (or takes the defaults) and translates at the edge.

use serde::{Deserialize, Serialize};

/// One ordered label list. The position in the list is the status code.
#[derive(Serialize, Deserialize)]
#[serde(transparent)]
#[derive(Debug, Clone)]
pub struct LabelSet(Vec<String>);

impl LabelSet {
    pub fn label(&self, code: i32) -> Option<&str> {
        usize::try_from(code)
            .ok()
            .and_then(|index| self.0.get(index))
            .map(String::as_str)
    }

    pub fn code(&self, label: &str) -> Option<i32> {
        self.0
            .iter()
            .position(|entry| entry == label)
            .and_then(|index| i32::try_from(index).ok())
    }

    fn of(labels: &[&str]) -> Self {
        Self(labels.iter().map(|label| (*label).to_owned()).collect())
    }
}

#[derive(Serialize, Deserialize)]
#[serde(deny_unknown_fields, rename_all = "kebab-case", default)]
#[derive(Debug, Clone)]
pub struct StatusLabels {
    pub training_request: LabelSet,
    pub project_approval: LabelSet,
    pub schedule_request: LabelSet,
}

impl Default for StatusLabels {
    fn default() -> Self {
        Self {
            training_request: LabelSet::of(&[
                "Not started",
                "Looking for trainer",
                "In queue",
                "No batch match",
                "In progress",
                "Sessions completed",
                "On hold",
                "Drop off",
                "Training completed",
            ]),
            project_approval: LabelSet::of(&[
                "Pending",
                "Approved",
                "Rejected",
                "Resubmit for revalidation",
            ]),
            schedule_request: LabelSet::of(&[
                "Pending validation",
                "Pending revalidation",
                "Validation scheduled",
                "Fail",
                "Pass",
            ]),
        }
    }
}
