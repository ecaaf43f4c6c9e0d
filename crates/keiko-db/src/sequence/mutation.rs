use keiko_entity::sequence_counter::{self, Entity as SequenceCounter};
use sea_orm::sea_query::{Expr, OnConflict, Query};
use sea_orm::{ActiveValue, ConnectionTrait, DbErr, EntityTrait};

pub struct Mutation;

impl Mutation {
    /// Hands out the next id in a namespace: `next_id(conn, "vsr")` yields
    /// "VSR07" on the seventh call. Numbers below 100 are zero-padded to two
    /// digits, larger ones keep their natural width.
    pub async fn next_id<C: ConnectionTrait>(conn: &C, namespace: &str) -> Result<String, DbErr> {
        let number = Self::next_number(conn, namespace).await?;
        Ok(format!("{}{:02}", namespace.to_uppercase(), number))
    }

    /// Bumps the counter row with a single update-returning statement, so
    /// two concurrent callers can never observe the same number. A missing
    /// row after the seeding insert surfaces as `DbErr::RecordNotUpdated`.
    pub async fn next_number<C: ConnectionTrait>(conn: &C, namespace: &str) -> Result<i32, DbErr> {
        let seed = sequence_counter::ActiveModel {
            namespace: ActiveValue::Set(namespace.to_owned()),
            running_number: ActiveValue::Set(0),
        };
        let mut on_conflict = OnConflict::column(sequence_counter::Column::Namespace);
        on_conflict.do_nothing();
        SequenceCounter::insert(seed)
            .on_conflict(on_conflict)
            .do_nothing()
            .exec(conn)
            .await?;

        let mut bump = Query::update();
        bump.table(SequenceCounter)
            .value(
                sequence_counter::Column::RunningNumber,
                Expr::col(sequence_counter::Column::RunningNumber).add(1),
            )
            .and_where(Expr::col(sequence_counter::Column::Namespace).eq(namespace))
            .returning(Query::returning().columns([sequence_counter::Column::RunningNumber]));

        let statement = conn.get_database_backend().build(&bump);
        let row = conn
            .query_one(statement)
            .await?
            .ok_or(DbErr::RecordNotUpdated)?;
        row.try_get("", "running_number")
    }
}
