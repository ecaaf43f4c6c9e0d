use sea_orm::DbErr;
use strum::IntoStaticStr;
use thiserror::Error;

/// Everything a workflow operation can refuse with. Any error raised inside
/// an operation's transaction rolls back all of its writes.
#[derive(Debug, Error, IntoStaticStr)]
#[strum(serialize_all = "kebab-case")]
pub enum WorkflowError {
    /// Malformed or contradictory input.
    #[error("{0}")]
    Validation(String),

    /// A learner does not qualify for the requested placement.
    #[error("{0}")]
    Eligibility(String),

    #[error("{0}")]
    Capacity(String),

    /// Session ordering or attendance ordering was violated.
    #[error("{0}")]
    Sequence(String),

    /// Preconditions of a completion step are not met yet.
    #[error("{0}")]
    NotReady(String),

    #[error("{0}")]
    NotFound(String),

    #[error("not allowed to {action} {resource}")]
    Authorization {
        resource: &'static str,
        action: &'static str,
    },

    /// The id sequence could not produce a number; retry the operation.
    #[error("identifier generation failed for namespace {0}")]
    Generation(String),

    #[strum(serialize = "internal")]
    #[error("database error: {0}")]
    Database(#[from] DbErr),
}

impl WorkflowError {
    /// Stable kind string carried by the result envelope.
    #[must_use]
    pub fn kind(&self) -> &'static str {
        self.into()
    }
}
