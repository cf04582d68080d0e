//! Driving port for vocabulary reads.

use async_trait::async_trait;

use crate::domain::{Error, PopulatedWord, UserId, WordSet, WordSetId};

/// Request to list the words a user may see.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ListWordsRequest {
    /// The requesting user.
    pub user_id: UserId,
    /// Optional set filter.
    pub word_set: Option<WordSetId>,
}

/// Response carrying visible words with their parent sets.
#[derive(Debug, Clone, PartialEq)]
pub struct ListWordsResponse {
    pub words: Vec<PopulatedWord>,
}

/// Request to list the sets a user may see.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ListWordSetsRequest {
    pub user_id: UserId,
}

/// Response carrying visible word sets.
#[derive(Debug, Clone, PartialEq)]
pub struct ListWordSetsResponse {
    pub word_sets: Vec<WordSet>,
}

/// Use-case port for vocabulary reads.
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait VocabularyQuery: Send + Sync {
    /// List words visible to the user, optionally narrowed to one set.
    async fn list_words(&self, request: ListWordsRequest) -> Result<ListWordsResponse, Error>;

    /// List the user's own sets and the shared defaults.
    async fn list_word_sets(
        &self,
        request: ListWordSetsRequest,
    ) -> Result<ListWordSetsResponse, Error>;
}

/// Fixture implementation returning empty results.
#[derive(Debug, Default, Clone, Copy)]
pub struct FixtureVocabularyQuery;

#[async_trait]
impl VocabularyQuery for FixtureVocabularyQuery {
    async fn list_words(&self, _request: ListWordsRequest) -> Result<ListWordsResponse, Error> {
        Ok(ListWordsResponse { words: Vec::new() })
    }

    async fn list_word_sets(
        &self,
        _request: ListWordSetsRequest,
    ) -> Result<ListWordSetsResponse, Error> {
        Ok(ListWordSetsResponse {
            word_sets: Vec::new(),
        })
    }
}
