//! Translation of pool and Diesel failures into repository port errors.

use tracing::debug;

use super::pool::PoolError;

/// Fold a pool failure into the port's connection-error constructor.
pub(crate) fn pool_error_into<E, C>(error: PoolError, connection: C) -> E
where
    C: FnOnce(String) -> E,
{
    let (PoolError::Checkout { message } | PoolError::Build { message }) = error;
    connection(message)
}

/// Classify a Diesel failure and build the matching port error.
///
/// Driver detail stays in debug logs; the constructed errors carry stable
/// generic messages so storage internals never reach API clients.
pub(crate) fn diesel_error_into<E, Q, C>(
    error: diesel::result::Error,
    query: Q,
    connection: C,
) -> E
where
    Q: Fn(&'static str) -> E,
    C: Fn(&'static str) -> E,
{
    use diesel::result::{DatabaseErrorKind, Error as DieselError};

    log_diesel_failure(&error);

    match error {
        DieselError::NotFound => query("record not found"),
        DieselError::QueryBuilderError(_) => query("database query error"),
        DieselError::DatabaseError(DatabaseErrorKind::ClosedConnection, _) => {
            connection("database connection error")
        }
        _ => query("database error"),
    }
}

fn log_diesel_failure(error: &diesel::result::Error) {
    if let diesel::result::Error::DatabaseError(kind, info) = error {
        debug!(?kind, message = info.message(), "database operation failed");
    } else {
        debug!(error = %error, "database operation failed");
    }
}
