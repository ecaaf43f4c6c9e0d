use keiko_core::access::{Access, AccessPolicy, Action, Actor, Resource};
use keiko_entity::training_request::{Model, Status};
use sea_orm::{Database, DatabaseConnection};
use uuid::Uuid;

/// Policy for tests that are not about permissions.
pub struct AllowAll;

impl AccessPolicy for AllowAll {
    fn allows(&self, _actor: &Actor, _resource: Resource, _action: Action) -> bool {
        true
    }
}

pub static ALLOW_ALL: AllowAll = AllowAll;

#[allow(dead_code)]
pub struct DenyAll;

impl AccessPolicy for DenyAll {
    fn allows(&self, _actor: &Actor, _resource: Resource, _action: Action) -> bool {
        false
    }
}

pub fn access(actor: &Actor) -> Access<'_> {
    Access {
        actor,
        policy: &ALLOW_ALL,
    }
}

pub async fn connect() -> DatabaseConnection {
    let conn = Database::connect("sqlite::memory:").await.unwrap();
    keiko_test_helpers::schema::create_all(&conn).await.unwrap();
    conn
}

#[allow(dead_code)]
pub async fn queued_request(
    conn: &DatabaseConnection,
    id: &str,
    learner_id: Uuid,
    competency_level: &str,
) -> Model {
    keiko_db::training_request::Mutation::create(conn, id, learner_id, competency_level, Status::InQueue)
        .await
        .unwrap()
}
