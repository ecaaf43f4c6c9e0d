use crate::error::WorkflowError;
use strum::IntoStaticStr;

/// The caller on whose behalf an operation runs. Session resolution lives
/// in the embedding application; the engine only consumes the result.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Actor {
    /// Feeds assignee defaulting and the audit trail's `updated_by`.
    pub id: String,
    pub display_name: Option<String>,
}

impl Actor {
    #[must_use]
    pub fn new(id: impl Into<String>) -> Self {
        Self {
            id: id.into(),
            display_name: None,
        }
    }
}

#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, IntoStaticStr)]
#[strum(serialize_all = "kebab-case")]
pub enum Resource {
    TrainingRequest,
    TrainingBatch,
    ProjectApproval,
    ScheduleRequest,
    AuditTrail,
}

#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, IntoStaticStr)]
#[strum(serialize_all = "kebab-case")]
pub enum Action {
    Create,
    Read,
    Update,
    Delete,
}

/// Yes/no decision per (actor, resource, action). Implemented by the
/// embedding application's permission engine.
pub trait AccessPolicy: Send + Sync {
    fn allows(&self, actor: &Actor, resource: Resource, action: Action) -> bool;
}

/// An actor bound to the policy that judges them. Operations consult
/// [`Access::ensure`] before reading any entity, so a denied caller learns
/// nothing about the data.
#[derive(Clone, Copy)]
pub struct Access<'a> {
    pub actor: &'a Actor,
    pub policy: &'a dyn AccessPolicy,
}

impl Access<'_> {
    pub fn ensure(&self, resource: Resource, action: Action) -> Result<(), WorkflowError> {
        if self.policy.allows(self.actor, resource, action) {
            return Ok(());
        }
        tracing::debug!(
            actor = %self.actor.id,
            resource = <&str>::from(resource),
            action = <&str>::from(action),
            "permission denied"
        );
        Err(WorkflowError::Authorization {
            resource: resource.into(),
            action: action.into(),
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    struct Nobody;

    impl AccessPolicy for Nobody {
        fn allows(&self, _actor: &Actor, _resource: Resource, _action: Action) -> bool {
            false
        }
    }

    #[test]
    fn test_denied_access_names_resource_and_action() {
        let actor = Actor::new("ops");
        let access = Access {
            actor: &actor,
            policy: &Nobody,
        };

        let error = access
            .ensure(Resource::TrainingBatch, Action::Update)
            .expect_err("policy denies everything");
        assert_eq!(error.kind(), "authorization");
        assert_eq!(error.to_string(), "not allowed to update training-batch");
    }
}
