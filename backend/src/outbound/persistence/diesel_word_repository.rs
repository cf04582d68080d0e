//! PostgreSQL-backed `WordRepository` implementation using Diesel ORM.
//!
//! Translates visibility selectors and keyed mutations into SQL. No policy
//! lives here; the adapter runs exactly the query the selector describes.

use std::collections::HashSet;

use async_trait::async_trait;
use diesel::prelude::*;
use diesel_async::{AsyncConnection as _, RunQueryDsl};
use diesel_async::scoped_futures::ScopedFutureExt as _;
use uuid::Uuid;

use crate::domain::ingestion::DedupKey;
use crate::domain::ports::{WordRepository, WordRepositoryError};
use crate::domain::visibility::WordSelector;
use crate::domain::{NewWord, PopulatedWord, UserId, Word, WordId, WordPatch, WordSetId};

use super::diesel_error_mapping::{diesel_error_into, pool_error_into};
use super::models::{NewWordRow, WordChangeset, WordRow, WordSetRow};
use super::pool::{DbPool, PoolError};
use super::schema::{word_sets, words};

/// Rows per INSERT statement, kept well under the Postgres parameter limit.
const INSERT_CHUNK: usize = 1000;

/// Diesel-backed implementation of the `WordRepository` port.
#[derive(Clone)]
pub struct DieselWordRepository {
    pool: DbPool,
}

impl DieselWordRepository {
    /// Create a new repository with the given connection pool.
    pub fn new(pool: DbPool) -> Self {
        Self { pool }
    }
}

fn map_pool_error(error: PoolError) -> WordRepositoryError {
    pool_error_into(error, WordRepositoryError::connection)
}

fn map_diesel_error(error: diesel::result::Error) -> WordRepositoryError {
    diesel_error_into(
        error,
        WordRepositoryError::query,
        WordRepositoryError::connection,
    )
}

fn populate((word, set): (WordRow, WordSetRow)) -> PopulatedWord {
    PopulatedWord {
        word: word.into(),
        word_set_detail: set.into(),
    }
}

fn new_word_row(word: &NewWord) -> NewWordRow<'_> {
    NewWordRow {
        id: Uuid::new_v4(),
        english: &word.english,
        phonetic: word.phonetic.as_deref(),
        type_tag: word.type_tag.as_deref(),
        vietnamese: &word.vietnamese,
        word_set: *word.word_set.as_uuid(),
        owner: word.owner.map(|owner| *owner.as_uuid()),
        remembered: word.remembered,
    }
}

#[async_trait]
impl WordRepository for DieselWordRepository {
    async fn find_visible(
        &self,
        selector: &WordSelector,
    ) -> Result<Vec<PopulatedWord>, WordRepositoryError> {
        let mut conn = self.pool.get().await.map_err(map_pool_error)?;

        let rows: Vec<(WordRow, WordSetRow)> = match selector {
            WordSelector::OwnedOrDefault {
                owner,
                default_set_ids,
            } => {
                let default_ids: Vec<Uuid> =
                    default_set_ids.iter().map(|id| *id.as_uuid()).collect();
                words::table
                    .inner_join(word_sets::table)
                    .filter(
                        words::owner
                            .eq(owner.as_uuid())
                            .or(words::word_set.eq_any(default_ids)),
                    )
                    .order(words::created_at.asc())
                    .select((WordRow::as_select(), WordSetRow::as_select()))
                    .load(&mut conn)
                    .await
            }
            WordSelector::DefaultSet { set_id } => {
                words::table
                    .inner_join(word_sets::table)
                    .filter(words::word_set.eq(set_id.as_uuid()))
                    .order(words::created_at.asc())
                    .select((WordRow::as_select(), WordSetRow::as_select()))
                    .load(&mut conn)
                    .await
            }
            WordSelector::OwnedInSet { owner, set_id } => {
                words::table
                    .inner_join(word_sets::table)
                    .filter(
                        words::owner
                            .eq(owner.as_uuid())
                            .and(words::word_set.eq(set_id.as_uuid())),
                    )
                    .order(words::created_at.asc())
                    .select((WordRow::as_select(), WordSetRow::as_select()))
                    .load(&mut conn)
                    .await
            }
        }
        .map_err(map_diesel_error)?;

        Ok(rows.into_iter().map(populate).collect())
    }

    async fn find_with_set(
        &self,
        word_id: &WordId,
    ) -> Result<Option<PopulatedWord>, WordRepositoryError> {
        let mut conn = self.pool.get().await.map_err(map_pool_error)?;

        let row: Option<(WordRow, WordSetRow)> = words::table
            .inner_join(word_sets::table)
            .filter(words::id.eq(word_id.as_uuid()))
            .select((WordRow::as_select(), WordSetRow::as_select()))
            .first(&mut conn)
            .await
            .optional()
            .map_err(map_diesel_error)?;

        Ok(row.map(populate))
    }

    async fn find_existing_keys(
        &self,
        owner: &UserId,
        keys: &[DedupKey],
    ) -> Result<HashSet<DedupKey>, WordRepositoryError> {
        if keys.is_empty() {
            return Ok(HashSet::new());
        }
        let mut conn = self.pool.get().await.map_err(map_pool_error)?;

        // One query over the candidate columns; the exact pair match happens
        // in memory so no dynamic OR tree is needed.
        let set_ids: Vec<Uuid> = keys.iter().map(|key| *key.word_set.as_uuid()).collect();
        let terms: Vec<&str> = keys.iter().map(|key| key.english.as_str()).collect();

        let rows: Vec<(String, Uuid)> = words::table
            .filter(words::owner.eq(owner.as_uuid()))
            .filter(words::word_set.eq_any(set_ids))
            .filter(words::english.eq_any(terms))
            .select((words::english, words::word_set))
            .load(&mut conn)
            .await
            .map_err(map_diesel_error)?;

        let requested: HashSet<&DedupKey> = keys.iter().collect();
        Ok(rows
            .into_iter()
            .map(|(english, set_id)| DedupKey {
                english,
                word_set: WordSetId::from_uuid(set_id),
            })
            .filter(|key| requested.contains(key))
            .collect())
    }

    async fn insert_batch(&self, new_words: &[NewWord]) -> Result<Vec<Word>, WordRepositoryError> {
        if new_words.is_empty() {
            return Ok(Vec::new());
        }
        let mut conn = self.pool.get().await.map_err(map_pool_error)?;

        let rows: Vec<NewWordRow<'_>> = new_words.iter().map(new_word_row).collect();
        let mut inserted = Vec::with_capacity(rows.len());
        for chunk in rows.chunks(INSERT_CHUNK) {
            let persisted: Vec<WordRow> = diesel::insert_into(words::table)
                .values(chunk)
                .returning(WordRow::as_returning())
                .get_results(&mut conn)
                .await
                .map_err(map_diesel_error)?;
            inserted.extend(persisted.into_iter().map(Word::from));
        }
        Ok(inserted)
    }

    async fn update(
        &self,
        word_id: &WordId,
        owner: &UserId,
        patch: &WordPatch,
    ) -> Result<Option<Word>, WordRepositoryError> {
        let mut conn = self.pool.get().await.map_err(map_pool_error)?;

        let changeset = WordChangeset {
            english: patch.english.as_deref(),
            phonetic: patch.phonetic.as_deref(),
            type_tag: patch.type_tag.as_deref(),
            vietnamese: patch.vietnamese.as_deref(),
            remembered: patch.remembered,
            updated_at: chrono::Utc::now(),
        };

        let row: Option<WordRow> = diesel::update(
            words::table.filter(
                words::id
                    .eq(word_id.as_uuid())
                    .and(words::owner.eq(owner.as_uuid())),
            ),
        )
        .set(&changeset)
        .returning(WordRow::as_returning())
        .get_result(&mut conn)
        .await
        .optional()
        .map_err(map_diesel_error)?;

        Ok(row.map(Word::from))
    }

    async fn delete(
        &self,
        word_id: &WordId,
        owner: &UserId,
    ) -> Result<Option<Word>, WordRepositoryError> {
        let mut conn = self.pool.get().await.map_err(map_pool_error)?;

        let row: Option<WordRow> = diesel::delete(
            words::table.filter(
                words::id
                    .eq(word_id.as_uuid())
                    .and(words::owner.eq(owner.as_uuid())),
            ),
        )
        .returning(WordRow::as_returning())
        .get_result(&mut conn)
        .await
        .optional()
        .map_err(map_diesel_error)?;

        Ok(row.map(Word::from))
    }

    async fn delete_owned_in_set(
        &self,
        set_id: &WordSetId,
        owner: &UserId,
    ) -> Result<u64, WordRepositoryError> {
        let mut conn = self.pool.get().await.map_err(map_pool_error)?;

        let removed = diesel::delete(
            words::table.filter(
                words::word_set
                    .eq(set_id.as_uuid())
                    .and(words::owner.eq(owner.as_uuid())),
            ),
        )
        .execute(&mut conn)
        .await
        .map_err(map_diesel_error)?;

        Ok(removed as u64)
    }

    async fn replace_set_words(
        &self,
        set_id: &WordSetId,
        new_words: &[NewWord],
    ) -> Result<u64, WordRepositoryError> {
        let mut conn = self.pool.get().await.map_err(map_pool_error)?;

        let set_uuid = *set_id.as_uuid();
        let rows: Vec<NewWordRow<'_>> = new_words.iter().map(new_word_row).collect();

        let inserted = conn
            .transaction::<usize, diesel::result::Error, _>(|conn| {
                async move {
                    diesel::delete(words::table.filter(words::word_set.eq(set_uuid)))
                        .execute(conn)
                        .await?;
                    let mut total = 0;
                    for chunk in rows.chunks(INSERT_CHUNK) {
                        total += diesel::insert_into(words::table)
                            .values(chunk)
                            .execute(conn)
                            .await?;
                    }
                    Ok(total)
                }
                .scope_boxed()
            })
            .await
            .map_err(map_diesel_error)?;

        Ok(inserted as u64)
    }
}
