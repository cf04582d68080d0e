//! Driving port for vocabulary mutations.

use async_trait::async_trait;

use crate::domain::{
    CandidateWord, Error, UserId, Word, WordId, WordPatch, WordSet, WordSetId,
};

/// Request to bulk-ingest candidate words for a user.
#[derive(Debug, Clone, PartialEq)]
pub struct IngestWordsRequest {
    pub user_id: UserId,
    pub candidates: Vec<CandidateWord>,
}

/// Outcome of a bulk ingest: persisted words plus rejected duplicates.
#[derive(Debug, Clone, PartialEq)]
pub struct IngestWordsResponse {
    pub added: Vec<Word>,
    pub duplicated: Vec<CandidateWord>,
}

/// Request to patch one of the user's words.
#[derive(Debug, Clone, PartialEq)]
pub struct UpdateWordRequest {
    pub user_id: UserId,
    pub word_id: WordId,
    pub patch: WordPatch,
}

/// Request to delete one of the user's words.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct DeleteWordRequest {
    pub user_id: UserId,
    pub word_id: WordId,
}

/// Request to flip a word's remembered flag to a specific value.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct SetRememberedRequest {
    pub user_id: UserId,
    pub word_id: WordId,
    pub remembered: bool,
}

/// Request to create a word set for a user.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CreateWordSetRequest {
    pub user_id: UserId,
    pub name: String,
}

/// Request to rename one of the user's sets.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RenameWordSetRequest {
    pub user_id: UserId,
    pub set_id: WordSetId,
    pub name: String,
}

/// Request to delete one of the user's sets and its words.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct DeleteWordSetRequest {
    pub user_id: UserId,
    pub set_id: WordSetId,
}

/// Outcome of a set deletion, including the cascade count.
#[derive(Debug, Clone, PartialEq)]
pub struct DeleteWordSetResponse {
    pub word_set: WordSet,
    pub words_removed: u64,
}

/// Use-case port for vocabulary mutations.
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait VocabularyCommand: Send + Sync {
    /// Bulk-ingest candidates, deduplicating against persisted words.
    async fn ingest_words(
        &self,
        request: IngestWordsRequest,
    ) -> Result<IngestWordsResponse, Error>;

    /// Patch one of the user's words.
    async fn update_word(&self, request: UpdateWordRequest) -> Result<Word, Error>;

    /// Delete one of the user's words.
    async fn delete_word(&self, request: DeleteWordRequest) -> Result<Word, Error>;

    /// Set a word's remembered flag.
    async fn set_remembered(&self, request: SetRememberedRequest) -> Result<Word, Error>;

    /// Create a set owned by the user.
    async fn create_word_set(&self, request: CreateWordSetRequest) -> Result<WordSet, Error>;

    /// Rename one of the user's sets.
    async fn rename_word_set(&self, request: RenameWordSetRequest) -> Result<WordSet, Error>;

    /// Delete one of the user's sets together with their words in it.
    async fn delete_word_set(
        &self,
        request: DeleteWordSetRequest,
    ) -> Result<DeleteWordSetResponse, Error>;
}

/// Fixture implementation for handlers that never reach the command path.
#[derive(Debug, Default, Clone, Copy)]
pub struct FixtureVocabularyCommand;

#[async_trait]
impl VocabularyCommand for FixtureVocabularyCommand {
    async fn ingest_words(
        &self,
        request: IngestWordsRequest,
    ) -> Result<IngestWordsResponse, Error> {
        Ok(IngestWordsResponse {
            added: Vec::new(),
            duplicated: request.candidates,
        })
    }

    async fn update_word(&self, _request: UpdateWordRequest) -> Result<Word, Error> {
        Err(Error::not_found("word not found"))
    }

    async fn delete_word(&self, _request: DeleteWordRequest) -> Result<Word, Error> {
        Err(Error::not_found("word not found"))
    }

    async fn set_remembered(&self, _request: SetRememberedRequest) -> Result<Word, Error> {
        Err(Error::not_found("word not found"))
    }

    async fn create_word_set(&self, _request: CreateWordSetRequest) -> Result<WordSet, Error> {
        Err(Error::internal("fixture cannot create word sets"))
    }

    async fn rename_word_set(&self, _request: RenameWordSetRequest) -> Result<WordSet, Error> {
        Err(Error::not_found("word set not found"))
    }

    async fn delete_word_set(
        &self,
        _request: DeleteWordSetRequest,
    ) -> Result<DeleteWordSetResponse, Error> {
        Err(Error::not_found("word set not found"))
    }
}
