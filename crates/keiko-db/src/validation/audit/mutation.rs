use chrono::Utc;
use keiko_entity::validation::audit_log::{self, Entity as AuditLog, EntityKind, Model};
use sea_orm::ActiveValue::{NotSet, Set};
use sea_orm::{ActiveModelTrait, ColumnTrait, ConnectionTrait, DbErr, EntityTrait, QueryFilter};
use std::error::Error;

pub struct Mutation;

impl Mutation {
    /// The trail is append-only; there is no update counterpart.
    pub async fn append<C: ConnectionTrait>(
        conn: &C,
        entity_kind: EntityKind,
        entity_id: &str,
        status: i32,
        assigned_to: Option<String>,
        detail: Option<String>,
        updated_by: &str,
    ) -> Result<Model, DbErr> {
        let entry = audit_log::ActiveModel {
            id: NotSet,
            entity_kind: Set(entity_kind),
            entity_id: Set(entity_id.to_owned()),
            status: Set(status),
            assigned_to: Set(assigned_to),
            detail: Set(detail),
            updated_by: Set(updated_by.to_owned()),
            logged_at: Set(Utc::now().naive_utc()),
        };

        entry.insert(conn).await.inspect_err(
            |error| tracing::error!(error = error as &dyn Error, entity_id, "failed to append audit entry"),
        )
    }

    /// Only the schedule-request delete cascade removes audit rows.
    pub async fn delete_for_entity<C: ConnectionTrait>(
        conn: &C,
        entity_kind: EntityKind,
        entity_id: &str,
    ) -> Result<u64, DbErr> {
        AuditLog::delete_many()
            .filter(audit_log::Column::EntityKind.eq(entity_kind))
            .filter(audit_log::Column::EntityId.eq(entity_id))
            .exec(conn)
            .await
            .map(|res| res.rows_affected)
    }
}
