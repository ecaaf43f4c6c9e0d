//! Read access to the validation audit trail. Writing happens inside the
//! approval and schedule operations; nothing else may touch the trail.

use crate::access::{Access, Action, Resource};
use crate::error::WorkflowError;
use keiko_db::validation::audit;
use keiko_entity::validation::audit_log::{EntityKind, Model};
use sea_orm::ConnectionTrait;

/// Entries for one approval or schedule request, oldest first.
pub async fn history<C: ConnectionTrait>(
    conn: &C,
    access: Access<'_>,
    entity_kind: EntityKind,
    entity_id: &str,
) -> Result<Vec<Model>, WorkflowError> {
    access.ensure(Resource::AuditTrail, Action::Read)?;
    let entries = audit::Query::for_entity(conn, entity_kind, entity_id).await?;
    Ok(entries)
}
