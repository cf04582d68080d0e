//! Vocabulary domain services.
//!
//! Implements the vocabulary driving ports over the word and word set
//! repositories: visibility-filtered reads, bulk ingestion with
//! deduplication, and the owner-keyed mutations.

use std::sync::Arc;

use async_trait::async_trait;
use serde_json::json;

use crate::domain::ingestion::{DedupKey, partition_candidates};
use crate::domain::ports::{
    CreateWordSetRequest, DeleteWordRequest, DeleteWordSetRequest, DeleteWordSetResponse,
    IngestWordsRequest, IngestWordsResponse, ListWordSetsRequest, ListWordSetsResponse,
    ListWordsRequest, ListWordsResponse, RenameWordSetRequest, SetRememberedRequest,
    UpdateWordRequest, VocabularyCommand, VocabularyQuery, WordRepository, WordRepositoryError,
    WordSetRepository, WordSetRepositoryError,
};
use crate::domain::visibility::{ResolvedSetFilter, ensure_mutable, word_selector};
use crate::domain::{
    Error, NewWord, NewWordSet, UserId, Word, WordId, WordPatch, WordSet, WordSetId,
};

fn map_word_repository_error(error: WordRepositoryError) -> Error {
    match error {
        WordRepositoryError::Connection { message } => {
            Error::service_unavailable(format!("word repository unavailable: {message}"))
        }
        WordRepositoryError::Query { message } => {
            Error::internal(format!("word repository error: {message}"))
        }
    }
}

fn map_word_set_repository_error(error: WordSetRepositoryError) -> Error {
    match error {
        WordSetRepositoryError::Connection { message } => {
            Error::service_unavailable(format!("word set repository unavailable: {message}"))
        }
        WordSetRepositoryError::Query { message } => {
            Error::internal(format!("word set repository error: {message}"))
        }
    }
}

fn word_not_found(word_id: &WordId) -> Error {
    Error::not_found("word not found").with_details(json!({ "word": word_id }))
}

fn word_set_not_found(set_id: &WordSetId) -> Error {
    Error::not_found("word set not found").with_details(json!({ "wordSet": set_id }))
}

/// Vocabulary service implementing the query and command driving ports.
#[derive(Clone)]
pub struct VocabularyService<W, S> {
    words: Arc<W>,
    sets: Arc<S>,
}

impl<W, S> VocabularyService<W, S> {
    /// Create a new service over the word and word set repositories.
    pub fn new(words: Arc<W>, sets: Arc<S>) -> Self {
        Self { words, sets }
    }
}

impl<W, S> VocabularyService<W, S>
where
    W: WordRepository,
    S: WordSetRepository,
{
    async fn resolve_set(&self, set_id: &WordSetId) -> Result<Option<WordSet>, Error> {
        self.sets
            .find_by_id(set_id)
            .await
            .map_err(map_word_set_repository_error)
    }

    /// Resolve a mutation target set: missing and foreign sets both read as
    /// absent, default sets are rejected outright.
    async fn require_mutable_set(
        &self,
        set_id: &WordSetId,
        user_id: &UserId,
    ) -> Result<WordSet, Error> {
        let set = self
            .resolve_set(set_id)
            .await?
            .ok_or_else(|| word_set_not_found(set_id))?;
        ensure_mutable(&set)?;
        if set.owner != Some(*user_id) {
            return Err(word_set_not_found(set_id));
        }
        Ok(set)
    }

    /// Guard word mutations: the parent set of a default word is default, so
    /// this rejects edits to shared content before touching the keyed path.
    async fn guard_word_mutation(&self, word_id: &WordId) -> Result<(), Error> {
        let populated = self
            .words
            .find_with_set(word_id)
            .await
            .map_err(map_word_repository_error)?
            .ok_or_else(|| word_not_found(word_id))?;
        ensure_mutable(&populated.word_set_detail)
    }

    async fn apply_word_patch(
        &self,
        word_id: &WordId,
        user_id: &UserId,
        patch: &WordPatch,
    ) -> Result<Word, Error> {
        self.guard_word_mutation(word_id).await?;
        self.words
            .update(word_id, user_id, patch)
            .await
            .map_err(map_word_repository_error)?
            .ok_or_else(|| word_not_found(word_id))
    }
}

#[async_trait]
impl<W, S> VocabularyQuery for VocabularyService<W, S>
where
    W: WordRepository,
    S: WordSetRepository,
{
    async fn list_words(&self, request: ListWordsRequest) -> Result<ListWordsResponse, Error> {
        let default_sets = self
            .sets
            .find_default_sets()
            .await
            .map_err(map_word_set_repository_error)?;
        let default_set_ids: Vec<WordSetId> = default_sets.iter().map(|set| set.id).collect();

        let filter = match request.word_set {
            None => None,
            Some(set_id) => Some(ResolvedSetFilter {
                set_id,
                target: self.resolve_set(&set_id).await?,
            }),
        };

        let selector = word_selector(request.user_id, &default_set_ids, filter.as_ref());
        let words = self
            .words
            .find_visible(&selector)
            .await
            .map_err(map_word_repository_error)?;

        Ok(ListWordsResponse { words })
    }

    async fn list_word_sets(
        &self,
        request: ListWordSetsRequest,
    ) -> Result<ListWordSetsResponse, Error> {
        let word_sets = self
            .sets
            .find_visible_for_user(&request.user_id)
            .await
            .map_err(map_word_set_repository_error)?;

        Ok(ListWordSetsResponse { word_sets })
    }
}

#[async_trait]
impl<W, S> VocabularyCommand for VocabularyService<W, S>
where
    W: WordRepository,
    S: WordSetRepository,
{
    async fn ingest_words(
        &self,
        request: IngestWordsRequest,
    ) -> Result<IngestWordsResponse, Error> {
        let IngestWordsRequest {
            user_id,
            candidates,
        } = request;

        if candidates.is_empty() {
            return Ok(IngestWordsResponse {
                added: Vec::new(),
                duplicated: Vec::new(),
            });
        }

        for candidate in &candidates {
            candidate.validate()?;
        }

        // One failing target poisons the whole batch; nothing is written.
        let mut seen_sets: Vec<WordSetId> = Vec::new();
        for candidate in &candidates {
            if seen_sets.contains(&candidate.word_set) {
                continue;
            }
            seen_sets.push(candidate.word_set);
            self.require_mutable_set(&candidate.word_set, &user_id)
                .await?;
        }

        let keys: Vec<DedupKey> = candidates.iter().map(DedupKey::of_candidate).collect();
        let existing = self
            .words
            .find_existing_keys(&user_id, &keys)
            .await
            .map_err(map_word_repository_error)?;

        let (accepted, duplicated) = partition_candidates(candidates, &existing);
        if accepted.is_empty() {
            return Ok(IngestWordsResponse {
                added: Vec::new(),
                duplicated,
            });
        }

        let new_words: Vec<NewWord> = accepted
            .into_iter()
            .map(|candidate| NewWord::from_candidate(candidate, Some(user_id)))
            .collect();
        let added = self
            .words
            .insert_batch(&new_words)
            .await
            .map_err(map_word_repository_error)?;

        Ok(IngestWordsResponse { added, duplicated })
    }

    async fn update_word(&self, request: UpdateWordRequest) -> Result<Word, Error> {
        request.patch.validate()?;
        self.apply_word_patch(&request.word_id, &request.user_id, &request.patch)
            .await
    }

    async fn delete_word(&self, request: DeleteWordRequest) -> Result<Word, Error> {
        self.guard_word_mutation(&request.word_id).await?;
        self.words
            .delete(&request.word_id, &request.user_id)
            .await
            .map_err(map_word_repository_error)?
            .ok_or_else(|| word_not_found(&request.word_id))
    }

    async fn set_remembered(&self, request: SetRememberedRequest) -> Result<Word, Error> {
        let patch = WordPatch {
            remembered: Some(request.remembered),
            ..WordPatch::default()
        };
        self.apply_word_patch(&request.word_id, &request.user_id, &patch)
            .await
    }

    async fn create_word_set(&self, request: CreateWordSetRequest) -> Result<WordSet, Error> {
        let name = request.name.trim().to_owned();
        if name.is_empty() {
            return Err(Error::invalid_request("name must not be empty")
                .with_details(json!({ "field": "name" })));
        }

        let existing = self
            .sets
            .find_by_name_and_owner(&name, &request.user_id)
            .await
            .map_err(map_word_set_repository_error)?;
        if existing.is_some() {
            return Err(Error::conflict("word set name already in use")
                .with_details(json!({ "name": name })));
        }

        self.sets
            .create(&NewWordSet {
                name,
                owner: Some(request.user_id),
                is_default: false,
            })
            .await
            .map_err(map_word_set_repository_error)
    }

    async fn rename_word_set(&self, request: RenameWordSetRequest) -> Result<WordSet, Error> {
        let name = request.name.trim().to_owned();
        if name.is_empty() {
            return Err(Error::invalid_request("name must not be empty")
                .with_details(json!({ "field": "name" })));
        }

        let set = self
            .resolve_set(&request.set_id)
            .await?
            .ok_or_else(|| word_set_not_found(&request.set_id))?;
        ensure_mutable(&set)?;

        self.sets
            .rename(&request.set_id, &request.user_id, &name)
            .await
            .map_err(map_word_set_repository_error)?
            .ok_or_else(|| word_set_not_found(&request.set_id))
    }

    async fn delete_word_set(
        &self,
        request: DeleteWordSetRequest,
    ) -> Result<DeleteWordSetResponse, Error> {
        let set = self
            .resolve_set(&request.set_id)
            .await?
            .ok_or_else(|| word_set_not_found(&request.set_id))?;
        ensure_mutable(&set)?;

        let word_set = self
            .sets
            .delete(&request.set_id, &request.user_id)
            .await
            .map_err(map_word_set_repository_error)?
            .ok_or_else(|| word_set_not_found(&request.set_id))?;

        let words_removed = self
            .words
            .delete_owned_in_set(&request.set_id, &request.user_id)
            .await
            .map_err(map_word_repository_error)?;

        Ok(DeleteWordSetResponse {
            word_set,
            words_removed,
        })
    }
}

#[cfg(test)]
#[path = "vocabulary_service_tests.rs"]
mod tests;
