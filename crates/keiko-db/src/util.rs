use sea_orm::{DbErr, TransactionError};
use std::error::Error;

/// Collapses the two-sided `TransactionError` into the inner error type so
/// transactional mutations read like plain fallible calls.
pub trait FlattenTransactionResultExt<T> {
    fn flatten_res(self) -> T;
}

impl<T, E> FlattenTransactionResultExt<Result<T, E>> for Result<T, TransactionError<E>>
where
    E: From<DbErr> + Error,
{
    fn flatten_res(self) -> Result<T, E> {
        self.map_err(|err| match err {
            TransactionError::Connection(err) => err.into(),
            TransactionError::Transaction(err) => err,
        })
    }
}

pub trait InspectTransactionError<E> {
    #[must_use]
    fn inspect_transaction_err<F: FnOnce(&E)>(self, f: F) -> Self;
}

impl<T, E: Error> InspectTransactionError<E> for Result<T, TransactionError<E>> {
    fn inspect_transaction_err<F: FnOnce(&E)>(self, f: F) -> Self {
        if let Err(TransactionError::Transaction(err)) = &self {
            f(err);
        }
        self
    }
}

/// Promotes a missing row to `DbErr::RecordNotFound`, naming the record so
/// the message survives into logs unchanged.
pub trait RequireRecord<T> {
    fn require(self, what: &str) -> Result<T, DbErr>;
}

impl<T> RequireRecord<T> for Result<Option<T>, DbErr> {
    fn require(self, what: &str) -> Result<T, DbErr> {
        self?.ok_or_else(|| DbErr::RecordNotFound(format!("{what} not found")))
    }
}
