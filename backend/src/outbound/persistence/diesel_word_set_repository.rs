//! PostgreSQL-backed `WordSetRepository` implementation using Diesel ORM.

use async_trait::async_trait;
use diesel::prelude::*;
use diesel_async::{AsyncConnection as _, RunQueryDsl};
use diesel_async::scoped_futures::ScopedFutureExt as _;
use uuid::Uuid;

use crate::domain::ports::{WordSetRepository, WordSetRepositoryError};
use crate::domain::{NewWordSet, UserId, WordSet, WordSetId};

use super::diesel_error_mapping::{diesel_error_into, pool_error_into};
use super::models::{NewWordSetRow, WordSetNameUpdate, WordSetRow};
use super::pool::{DbPool, PoolError};
use super::schema::word_sets;

/// Diesel-backed implementation of the `WordSetRepository` port.
#[derive(Clone)]
pub struct DieselWordSetRepository {
    pool: DbPool,
}

impl DieselWordSetRepository {
    /// Create a new repository with the given connection pool.
    pub fn new(pool: DbPool) -> Self {
        Self { pool }
    }
}

fn map_pool_error(error: PoolError) -> WordSetRepositoryError {
    pool_error_into(error, WordSetRepositoryError::connection)
}

fn map_diesel_error(error: diesel::result::Error) -> WordSetRepositoryError {
    diesel_error_into(
        error,
        WordSetRepositoryError::query,
        WordSetRepositoryError::connection,
    )
}

#[async_trait]
impl WordSetRepository for DieselWordSetRepository {
    async fn find_visible_for_user(
        &self,
        user_id: &UserId,
    ) -> Result<Vec<WordSet>, WordSetRepositoryError> {
        let mut conn = self.pool.get().await.map_err(map_pool_error)?;

        let rows: Vec<WordSetRow> = word_sets::table
            .filter(
                word_sets::owner
                    .eq(user_id.as_uuid())
                    .or(word_sets::is_default.eq(true)),
            )
            .order(word_sets::created_at.asc())
            .select(WordSetRow::as_select())
            .load(&mut conn)
            .await
            .map_err(map_diesel_error)?;

        Ok(rows.into_iter().map(WordSet::from).collect())
    }

    async fn find_by_id(
        &self,
        set_id: &WordSetId,
    ) -> Result<Option<WordSet>, WordSetRepositoryError> {
        let mut conn = self.pool.get().await.map_err(map_pool_error)?;

        let row: Option<WordSetRow> = word_sets::table
            .filter(word_sets::id.eq(set_id.as_uuid()))
            .select(WordSetRow::as_select())
            .first(&mut conn)
            .await
            .optional()
            .map_err(map_diesel_error)?;

        Ok(row.map(WordSet::from))
    }

    async fn find_default_sets(&self) -> Result<Vec<WordSet>, WordSetRepositoryError> {
        let mut conn = self.pool.get().await.map_err(map_pool_error)?;

        let rows: Vec<WordSetRow> = word_sets::table
            .filter(word_sets::is_default.eq(true))
            .order(word_sets::created_at.asc())
            .select(WordSetRow::as_select())
            .load(&mut conn)
            .await
            .map_err(map_diesel_error)?;

        Ok(rows.into_iter().map(WordSet::from).collect())
    }

    async fn find_by_name_and_owner(
        &self,
        name: &str,
        owner: &UserId,
    ) -> Result<Option<WordSet>, WordSetRepositoryError> {
        let mut conn = self.pool.get().await.map_err(map_pool_error)?;

        let row: Option<WordSetRow> = word_sets::table
            .filter(
                word_sets::name
                    .eq(name)
                    .and(word_sets::owner.eq(owner.as_uuid())),
            )
            .select(WordSetRow::as_select())
            .first(&mut conn)
            .await
            .optional()
            .map_err(map_diesel_error)?;

        Ok(row.map(WordSet::from))
    }

    async fn create(&self, set: &NewWordSet) -> Result<WordSet, WordSetRepositoryError> {
        let mut conn = self.pool.get().await.map_err(map_pool_error)?;

        let row = NewWordSetRow {
            id: Uuid::new_v4(),
            name: &set.name,
            owner: set.owner.map(|owner| *owner.as_uuid()),
            is_default: set.is_default,
        };

        let created: WordSetRow = diesel::insert_into(word_sets::table)
            .values(&row)
            .returning(WordSetRow::as_returning())
            .get_result(&mut conn)
            .await
            .map_err(map_diesel_error)?;

        Ok(created.into())
    }

    async fn rename(
        &self,
        set_id: &WordSetId,
        owner: &UserId,
        name: &str,
    ) -> Result<Option<WordSet>, WordSetRepositoryError> {
        let mut conn = self.pool.get().await.map_err(map_pool_error)?;

        let update = WordSetNameUpdate {
            name,
            updated_at: chrono::Utc::now(),
        };

        let row: Option<WordSetRow> = diesel::update(
            word_sets::table.filter(
                word_sets::id
                    .eq(set_id.as_uuid())
                    .and(word_sets::owner.eq(owner.as_uuid())),
            ),
        )
        .set(&update)
        .returning(WordSetRow::as_returning())
        .get_result(&mut conn)
        .await
        .optional()
        .map_err(map_diesel_error)?;

        Ok(row.map(WordSet::from))
    }

    async fn delete(
        &self,
        set_id: &WordSetId,
        owner: &UserId,
    ) -> Result<Option<WordSet>, WordSetRepositoryError> {
        let mut conn = self.pool.get().await.map_err(map_pool_error)?;

        let row: Option<WordSetRow> = diesel::delete(
            word_sets::table.filter(
                word_sets::id
                    .eq(set_id.as_uuid())
                    .and(word_sets::owner.eq(owner.as_uuid())),
            ),
        )
        .returning(WordSetRow::as_returning())
        .get_result(&mut conn)
        .await
        .optional()
        .map_err(map_diesel_error)?;

        Ok(row.map(WordSet::from))
    }

    async fn upsert_default_set(&self, name: &str) -> Result<WordSet, WordSetRepositoryError> {
        let mut conn = self.pool.get().await.map_err(map_pool_error)?;

        // Keyed by the default flag so reseeding refreshes the existing set
        // instead of accumulating new ones.
        let row = conn
            .transaction::<WordSetRow, diesel::result::Error, _>(|conn| {
                async move {
                    let existing: Option<WordSetRow> = word_sets::table
                        .filter(word_sets::is_default.eq(true))
                        .order(word_sets::created_at.asc())
                        .select(WordSetRow::as_select())
                        .first(conn)
                        .await
                        .optional()?;

                    match existing {
                        Some(current) => {
                            diesel::update(word_sets::table.filter(word_sets::id.eq(current.id)))
                                .set(WordSetNameUpdate {
                                    name,
                                    updated_at: chrono::Utc::now(),
                                })
                                .returning(WordSetRow::as_returning())
                                .get_result(conn)
                                .await
                        }
                        None => {
                            diesel::insert_into(word_sets::table)
                                .values(NewWordSetRow {
                                    id: Uuid::new_v4(),
                                    name,
                                    owner: None,
                                    is_default: true,
                                })
                                .returning(WordSetRow::as_returning())
                                .get_result(conn)
                                .await
                        }
                    }
                }
                .scope_boxed()
            })
            .await
            .map_err(map_diesel_error)?;

        Ok(row.into())
    }
}

#[cfg(test)]
mod tests {
    //! Regression coverage for this module.

    use chrono::Utc;
    use rstest::rstest;

    use super::*;

    #[rstest]
    fn pool_error_maps_to_connection_error() {
        let repo_err = map_pool_error(PoolError::build("invalid URL"));

        assert!(matches!(repo_err, WordSetRepositoryError::Connection { .. }));
        assert!(repo_err.to_string().contains("invalid URL"));
    }

    #[rstest]
    fn rows_convert_to_domain_sets() {
        let now = Utc::now();
        let row = WordSetRow {
            id: Uuid::new_v4(),
            name: "3000 basic words".to_owned(),
            owner: None,
            is_default: true,
            created_at: now,
            updated_at: now,
        };

        let set = WordSet::from(row);

        assert_eq!(set.name, "3000 basic words");
        assert!(set.is_default);
        assert!(set.owner.is_none());
    }
}
