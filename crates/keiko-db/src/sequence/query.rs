use keiko_entity::sequence_counter::Entity as SequenceCounter;
use sea_orm::{ConnectionTrait, DbErr, EntityTrait};

pub struct Query;

impl Query {
    pub async fn current<C: ConnectionTrait>(conn: &C, namespace: &str) -> Result<Option<i32>, DbErr> {
        SequenceCounter::find_by_id(namespace)
            .one(conn)
            .await
            .map(|counter| counter.map(|c| c.running_number))
    }
}
