//! Pure transition guards. An edge fires exactly once, on the save that
//! moves a record into the triggering status; saving a record that is
//! already there stays silent.

use keiko_entity::validation::{project_approval, schedule_request};

/// A project approval turned Approved.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct ApprovalGranted;

#[must_use]
pub fn approval_edge(
    previous: project_approval::Status,
    new: project_approval::Status,
) -> Option<ApprovalGranted> {
    use project_approval::Status::Approved;
    (previous != Approved && new == Approved).then_some(ApprovalGranted)
}

/// A schedule request reached one of its two outcomes.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum ScheduleOutcome {
    Passed,
    Failed,
}

#[must_use]
pub fn schedule_edge(
    previous: schedule_request::Status,
    new: schedule_request::Status,
) -> Option<ScheduleOutcome> {
    use schedule_request::Status::{Fail, Pass};
    match (previous, new) {
        (Pass, Pass) | (Fail, Fail) => None,
        (_, Pass) => Some(ScheduleOutcome::Passed),
        (_, Fail) => Some(ScheduleOutcome::Failed),
        _ => None,
    }
}
