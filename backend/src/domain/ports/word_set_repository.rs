//! Port for word set persistence.

use async_trait::async_trait;

use crate::domain::{NewWordSet, UserId, WordSet, WordSetId};

/// Errors raised by word set repository adapters.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum WordSetRepositoryError {
    /// Repository connection could not be established.
    #[error("word set repository connection failed: {message}")]
    Connection { message: String },
    /// Query or mutation failed during execution.
    #[error("word set repository query failed: {message}")]
    Query { message: String },
}

impl WordSetRepositoryError {
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

/// Port for reading and mutating word sets.
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait WordSetRepository: Send + Sync {
    /// Sets visible to a user: their own plus the shared defaults.
    async fn find_visible_for_user(
        &self,
        user_id: &UserId,
    ) -> Result<Vec<WordSet>, WordSetRepositoryError>;

    /// Find a set by id, regardless of owner.
    async fn find_by_id(
        &self,
        set_id: &WordSetId,
    ) -> Result<Option<WordSet>, WordSetRepositoryError>;

    /// All shared default sets.
    async fn find_default_sets(&self) -> Result<Vec<WordSet>, WordSetRepositoryError>;

    /// Find an owner's set by its exact name.
    async fn find_by_name_and_owner(
        &self,
        name: &str,
        owner: &UserId,
    ) -> Result<Option<WordSet>, WordSetRepositoryError>;

    /// Persist a new set.
    async fn create(&self, set: &NewWordSet) -> Result<WordSet, WordSetRepositoryError>;

    /// Rename the owner's set, returning the updated record.
    async fn rename(
        &self,
        set_id: &WordSetId,
        owner: &UserId,
        name: &str,
    ) -> Result<Option<WordSet>, WordSetRepositoryError>;

    /// Delete the owner's set, returning the removed record.
    async fn delete(
        &self,
        set_id: &WordSetId,
        owner: &UserId,
    ) -> Result<Option<WordSet>, WordSetRepositoryError>;

    /// Create or refresh the shared default set, keyed by the default flag.
    async fn upsert_default_set(&self, name: &str) -> Result<WordSet, WordSetRepositoryError>;
}

/// Fixture implementation for tests that do not exercise set persistence.
#[derive(Debug, Default, Clone, Copy)]
pub struct FixtureWordSetRepository;

#[async_trait]
impl WordSetRepository for FixtureWordSetRepository {
    async fn find_visible_for_user(
        &self,
        _user_id: &UserId,
    ) -> Result<Vec<WordSet>, WordSetRepositoryError> {
        Ok(Vec::new())
    }

    async fn find_by_id(
        &self,
        _set_id: &WordSetId,
    ) -> Result<Option<WordSet>, WordSetRepositoryError> {
        Ok(None)
    }

    async fn find_default_sets(&self) -> Result<Vec<WordSet>, WordSetRepositoryError> {
        Ok(Vec::new())
    }

    async fn find_by_name_and_owner(
        &self,
        _name: &str,
        _owner: &UserId,
    ) -> Result<Option<WordSet>, WordSetRepositoryError> {
        Ok(None)
    }

    async fn create(&self, set: &NewWordSet) -> Result<WordSet, WordSetRepositoryError> {
        let now = chrono::Utc::now();
        Ok(WordSet {
            id: WordSetId::random(),
            name: set.name.clone(),
            owner: set.owner,
            is_default: set.is_default,
            created_at: now,
            updated_at: now,
        })
    }

    async fn rename(
        &self,
        _set_id: &WordSetId,
        _owner: &UserId,
        _name: &str,
    ) -> Result<Option<WordSet>, WordSetRepositoryError> {
        Ok(None)
    }

    async fn delete(
        &self,
        _set_id: &WordSetId,
        _owner: &UserId,
    ) -> Result<Option<WordSet>, WordSetRepositoryError> {
        Ok(None)
    }

    async fn upsert_default_set(&self, name: &str) -> Result<WordSet, WordSetRepositoryError> {
        let now = chrono::Utc::now();
        Ok(WordSet {
            id: WordSetId::random(),
            name: name.to_owned(),
            owner: None,
            is_default: true,
            created_at: now,
            updated_at: now,
        })
    }
}

#[cfg(test)]
mod tests {
    //! Regression coverage for this module.

    use rstest::rstest;

    use super::*;

    #[rstest]
    #[tokio::test]
    async fn fixture_create_echoes_the_payload() {
        let repo = FixtureWordSetRepository;
        let owner = UserId::random();
        let created = repo
            .create(&NewWordSet {
                name: "animals".to_owned(),
                owner: Some(owner),
                is_default: false,
            })
            .await
            .expect("fixture create succeeds");
        assert_eq!(created.name, "animals");
        assert_eq!(created.owner, Some(owner));
    }

    #[rstest]
    #[tokio::test]
    async fn fixture_upsert_marks_the_set_default() {
        let repo = FixtureWordSetRepository;
        let set = repo
            .upsert_default_set("3000 basic words")
            .await
            .expect("fixture upsert succeeds");
        assert!(set.is_default);
        assert!(set.owner.is_none());
    }
}
