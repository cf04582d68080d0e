//! PostgreSQL-backed `UserRepository` implementation using Diesel ORM.

use async_trait::async_trait;
use diesel::prelude::*;
use diesel_async::RunQueryDsl;
use uuid::Uuid;

use crate::domain::ports::{NewUserRecord, UserRecord, UserRepository, UserRepositoryError};
use crate::domain::{Email, UserId};

use super::diesel_error_mapping::{diesel_error_into, pool_error_into};
use super::models::{NewUserRow, UserRow};
use super::pool::{DbPool, PoolError};
use super::schema::users;

/// Diesel-backed implementation of the `UserRepository` port.
#[derive(Clone)]
pub struct DieselUserRepository {
    pool: DbPool,
}

impl DieselUserRepository {
    /// Create a new repository with the given connection pool.
    pub fn new(pool: DbPool) -> Self {
        Self { pool }
    }
}

fn map_pool_error(error: PoolError) -> UserRepositoryError {
    pool_error_into(error, UserRepositoryError::connection)
}

fn map_diesel_error(error: diesel::result::Error) -> UserRepositoryError {
    diesel_error_into(
        error,
        UserRepositoryError::query,
        UserRepositoryError::connection,
    )
}

/// Unique violations on insert mean the email is taken; everything else maps
/// like any other Diesel failure.
fn map_insert_error(error: diesel::result::Error, email: &Email) -> UserRepositoryError {
    use diesel::result::{DatabaseErrorKind, Error as DieselError};

    if let DieselError::DatabaseError(DatabaseErrorKind::UniqueViolation, _) = &error {
        return UserRepositoryError::duplicate_email(email.as_ref());
    }
    map_diesel_error(error)
}

fn row_to_record(row: UserRow) -> Result<UserRecord, UserRepositoryError> {
    let email = Email::new(row.email)
        .map_err(|error| UserRepositoryError::query(format!("stored email invalid: {error}")))?;
    Ok(UserRecord {
        id: UserId::from_uuid(row.id),
        email,
        credential_digest: row.credential_digest,
        created_at: row.created_at,
    })
}

#[async_trait]
impl UserRepository for DieselUserRepository {
    async fn find_by_email(
        &self,
        email: &Email,
    ) -> Result<Option<UserRecord>, UserRepositoryError> {
        let mut conn = self.pool.get().await.map_err(map_pool_error)?;

        let row: Option<UserRow> = users::table
            .filter(users::email.eq(email.as_ref()))
            .select(UserRow::as_select())
            .first(&mut conn)
            .await
            .optional()
            .map_err(map_diesel_error)?;

        row.map(row_to_record).transpose()
    }

    async fn insert(&self, record: &NewUserRecord) -> Result<UserRecord, UserRepositoryError> {
        let mut conn = self.pool.get().await.map_err(map_pool_error)?;

        let row = NewUserRow {
            id: Uuid::new_v4(),
            email: record.email.as_ref(),
            credential_digest: &record.credential_digest,
        };

        let created: UserRow = diesel::insert_into(users::table)
            .values(&row)
            .returning(UserRow::as_returning())
            .get_result(&mut conn)
            .await
            .map_err(|error| map_insert_error(error, &record.email))?;

        row_to_record(created)
    }
}
