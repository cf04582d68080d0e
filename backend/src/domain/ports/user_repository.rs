//! Port for user account persistence.

use async_trait::async_trait;
use chrono::{DateTime, Utc};

use crate::domain::{Email, UserId};

/// Errors raised by user repository adapters.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum UserRepositoryError {
    /// Repository connection could not be established.
    #[error("user repository connection failed: {message}")]
    Connection { message: String },
    /// Query or mutation failed during execution.
    #[error("user repository query failed: {message}")]
    Query { message: String },
    /// The email is already registered.
    #[error("email already registered: {email}")]
    DuplicateEmail { email: String },
}

impl UserRepositoryError {
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

    /// Create a duplicate-email error for the given address.
    pub fn duplicate_email(email: impl Into<String>) -> Self {
        Self::DuplicateEmail {
            email: email.into(),
        }
    }
}

/// Stored account record, including the opaque credential digest.
///
/// Only the login adapter sees this shape; everything else works with the
/// digest-free [`crate::domain::User`].
#[derive(Debug, Clone, PartialEq)]
pub struct UserRecord {
    pub id: UserId,
    pub email: Email,
    pub credential_digest: String,
    pub created_at: DateTime<Utc>,
}

/// Insert payload for a new account.
#[derive(Debug, Clone, PartialEq)]
pub struct NewUserRecord {
    pub email: Email,
    pub credential_digest: String,
}

/// Port for account storage.
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait UserRepository: Send + Sync {
    /// Find an account by its exact email.
    async fn find_by_email(
        &self,
        email: &Email,
    ) -> Result<Option<UserRecord>, UserRepositoryError>;

    /// Persist a new account.
    async fn insert(&self, record: &NewUserRecord) -> Result<UserRecord, UserRepositoryError>;
}

/// Fixture implementation for tests that do not exercise account storage.
#[derive(Debug, Default, Clone, Copy)]
pub struct FixtureUserRepository;

#[async_trait]
impl UserRepository for FixtureUserRepository {
    async fn find_by_email(
        &self,
        _email: &Email,
    ) -> Result<Option<UserRecord>, UserRepositoryError> {
        Ok(None)
    }

    async fn insert(&self, record: &NewUserRecord) -> Result<UserRecord, UserRepositoryError> {
        Ok(UserRecord {
            id: UserId::random(),
            email: record.email.clone(),
            credential_digest: record.credential_digest.clone(),
            created_at: Utc::now(),
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
    async fn fixture_find_returns_none() {
        let repo = FixtureUserRepository;
        let email = Email::new("learner@example.com").expect("valid email");
        let found = repo
            .find_by_email(&email)
            .await
            .expect("fixture lookup succeeds");
        assert!(found.is_none());
    }

    #[rstest]
    fn duplicate_email_error_names_the_address() {
        let err = UserRepositoryError::duplicate_email("learner@example.com");
        assert!(err.to_string().contains("learner@example.com"));
    }
}
