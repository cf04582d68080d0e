//! Port for word persistence.

use std::collections::HashSet;

use async_trait::async_trait;

use crate::domain::ingestion::DedupKey;
use crate::domain::visibility::WordSelector;
use crate::domain::{NewWord, PopulatedWord, UserId, Word, WordId, WordPatch, WordSetId};

/// Errors raised by word repository adapters.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum WordRepositoryError {
    /// Repository connection could not be established.
    #[error("word repository connection failed: {message}")]
    Connection { message: String },
    /// Query or mutation failed during execution.
    #[error("word repository query failed: {message}")]
    Query { message: String },
}

impl WordRepositoryError {
    /// Create a connection error with the given message.
    pub fn connection(message: impl Into<String>) -> Self {
        Self::Connection {
            message: message.into(),
        }
    }

    /// Create a query error with the given message.
    pub fn query(message: impl Into<String>) -> Self {
        Self::Query {
            message: message.into(),
        }
    }
}

/// Port for reading and mutating words.
///
/// Mutations are keyed by `(id, owner)` and return `None` when no owned
/// record matches, so adapters cannot distinguish missing from foreign.
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait WordRepository: Send + Sync {
    /// Read the words a selector permits, each with its parent set.
    async fn find_visible(
        &self,
        selector: &WordSelector,
    ) -> Result<Vec<PopulatedWord>, WordRepositoryError>;

    /// Find one word with its parent set, regardless of owner.
    async fn find_with_set(
        &self,
        word_id: &WordId,
    ) -> Result<Option<PopulatedWord>, WordRepositoryError>;

    /// Which of the given keys already exist among the owner's words.
    async fn find_existing_keys(
        &self,
        owner: &UserId,
        keys: &[DedupKey],
    ) -> Result<HashSet<DedupKey>, WordRepositoryError>;

    /// Insert a batch of words, returning the persisted records in order.
    async fn insert_batch(&self, words: &[NewWord]) -> Result<Vec<Word>, WordRepositoryError>;

    /// Apply a patch to the owner's word, returning the updated record.
    async fn update(
        &self,
        word_id: &WordId,
        owner: &UserId,
        patch: &WordPatch,
    ) -> Result<Option<Word>, WordRepositoryError>;

    /// Delete the owner's word, returning the removed record.
    async fn delete(
        &self,
        word_id: &WordId,
        owner: &UserId,
    ) -> Result<Option<Word>, WordRepositoryError>;

    /// Delete all of the owner's words in a set, returning the count.
    async fn delete_owned_in_set(
        &self,
        set_id: &WordSetId,
        owner: &UserId,
    ) -> Result<u64, WordRepositoryError>;

    /// Atomically replace the full contents of a set with new words.
    async fn replace_set_words(
        &self,
        set_id: &WordSetId,
        words: &[NewWord],
    ) -> Result<u64, WordRepositoryError>;
}

/// Fixture implementation for tests that do not exercise word persistence.
#[derive(Debug, Default, Clone, Copy)]
pub struct FixtureWordRepository;

#[async_trait]
impl WordRepository for FixtureWordRepository {
    async fn find_visible(
        &self,
        _selector: &WordSelector,
    ) -> Result<Vec<PopulatedWord>, WordRepositoryError> {
        Ok(Vec::new())
    }

    async fn find_with_set(
        &self,
        _word_id: &WordId,
    ) -> Result<Option<PopulatedWord>, WordRepositoryError> {
        Ok(None)
    }

    async fn find_existing_keys(
        &self,
        _owner: &UserId,
        _keys: &[DedupKey],
    ) -> Result<HashSet<DedupKey>, WordRepositoryError> {
        Ok(HashSet::new())
    }

    async fn insert_batch(&self, _words: &[NewWord]) -> Result<Vec<Word>, WordRepositoryError> {
        Ok(Vec::new())
    }

    async fn update(
        &self,
        _word_id: &WordId,
        _owner: &UserId,
        _patch: &WordPatch,
    ) -> Result<Option<Word>, WordRepositoryError> {
        Ok(None)
    }

    async fn delete(
        &self,
        _word_id: &WordId,
        _owner: &UserId,
    ) -> Result<Option<Word>, WordRepositoryError> {
        Ok(None)
    }

    async fn delete_owned_in_set(
        &self,
        _set_id: &WordSetId,
        _owner: &UserId,
    ) -> Result<u64, WordRepositoryError> {
        Ok(0)
    }

    async fn replace_set_words(
        &self,
        _set_id: &WordSetId,
        _words: &[NewWord],
    ) -> Result<u64, WordRepositoryError> {
        Ok(0)
    }
}
