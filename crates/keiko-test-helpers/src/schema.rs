//! Entity-derived schema bootstrap.
//!
//! Integration tests create their tables from the entity definitions
//! instead of a hand-written DDL file, so the test schema can never
//! drift from the shapes the queries expect.

use keiko_entity::{batch, sequence_counter, training_request, validation};
use sea_orm::{ConnectionTrait, DbErr, EntityTrait, Schema};

/// Creates every table of the workflow schema on the given connection.
///
/// Tables are created parents first. Referenced tables must exist
/// before a table with a foreign key onto them, and SQLite enforces
/// the constraints in the default test setup.
pub async fn create_all<C: ConnectionTrait>(conn: &C) -> Result<(), DbErr> {
    let schema = Schema::new(conn.get_database_backend());

    create(conn, &schema, batch::Entity).await?;
    create(conn, &schema, training_request::Entity).await?;
    create(conn, &schema, batch::session::Entity).await?;
    create(conn, &schema, batch::learner::Entity).await?;
    create(conn, &schema, batch::attendance::Entity).await?;
    create(conn, &schema, batch::homework::Entity).await?;
    create(conn, &schema, validation::project_approval::Entity).await?;
    create(conn, &schema, validation::schedule_request::Entity).await?;
    create(conn, &schema, validation::audit_log::Entity).await?;
    create(conn, &schema, sequence_counter::Entity).await?;

    Ok(())
}

async fn create<C, E>(conn: &C, schema: &Schema, entity: E) -> Result<(), DbErr>
where
    C: ConnectionTrait,
    E: EntityTrait,
{
    let backend = conn.get_database_backend();
    let statement = schema.create_table_from_entity(entity);
    conn.execute(backend.build(&statement)).await?;
    Ok(())
}
