use keiko_entity::validation::audit_log::{self, Entity as AuditLog, EntityKind, Model};
use sea_orm::{ColumnTrait, ConnectionTrait, DbErr, EntityTrait, QueryFilter, QueryOrder};
use std::error::Error;

pub struct Query;

impl Query {
    /// Entries for one entity, oldest first.
    pub async fn for_entity<C: ConnectionTrait>(
        conn: &C,
        entity_kind: EntityKind,
        entity_id: &str,
    ) -> Result<Vec<Model>, DbErr> {
        AuditLog::find()
            .filter(audit_log::Column::EntityKind.eq(entity_kind))
            .filter(audit_log::Column::EntityId.eq(entity_id))
            .order_by_asc(audit_log::Column::Id)
            .all(conn)
            .await
            .inspect_err(|error| {
                tracing::error!(error = error as &dyn Error, entity_id, "failed to load audit entries");
            })
    }
}
