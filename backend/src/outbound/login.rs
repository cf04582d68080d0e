//! Digest-based `LoginService` adapter built on the user repository port.
//!
//! Passwords are stored as SHA-256 hex digests. The digest is opaque to the
//! domain; swapping in a stronger KDF only touches this adapter.

use std::sync::Arc;

use async_trait::async_trait;
use sha2::{Digest, Sha256};
use tracing::info;

use crate::domain::ports::{
    Credentials, LoginService, NewUserRecord, UserRecord, UserRepository, UserRepositoryError,
};
use crate::domain::{Error, User};

/// `LoginService` backed by a user repository and a credential digest.
#[derive(Clone)]
pub struct DigestLoginService {
    users: Arc<dyn UserRepository>,
}

impl DigestLoginService {
    /// Create a new service over the given account storage.
    pub fn new(users: Arc<dyn UserRepository>) -> Self {
        Self { users }
    }
}

fn digest_password(password: &str) -> String {
    hex::encode(Sha256::digest(password.as_bytes()))
}

/// Constant-length comparison of hex digests.
fn digest_matches(stored: &str, supplied: &str) -> bool {
    let stored = stored.as_bytes();
    let supplied = supplied.as_bytes();
    if stored.len() != supplied.len() {
        return false;
    }
    stored
        .iter()
        .zip(supplied)
        .fold(0u8, |acc, (a, b)| acc | (a ^ b))
        == 0
}

fn map_repository_error(error: UserRepositoryError) -> Error {
    match error {
        UserRepositoryError::Connection { message } => {
            tracing::error!(message, "account storage unavailable");
            Error::service_unavailable("account storage unavailable")
        }
        UserRepositoryError::Query { message } => {
            tracing::error!(message, "account storage query failed");
            Error::internal("account storage failed")
        }
        UserRepositoryError::DuplicateEmail { .. } => Error::conflict("email already registered"),
    }
}

fn record_to_user(record: UserRecord) -> User {
    User {
        id: record.id,
        email: record.email,
        created_at: record.created_at,
    }
}

#[async_trait]
impl LoginService for DigestLoginService {
    async fn register(&self, credentials: Credentials) -> Result<User, Error> {
        let record = self
            .users
            .insert(&NewUserRecord {
                email: credentials.email,
                credential_digest: digest_password(&credentials.password),
            })
            .await
            .map_err(map_repository_error)?;

        info!(user_id = %record.id, "account registered");
        Ok(record_to_user(record))
    }

    async fn login(&self, credentials: Credentials) -> Result<User, Error> {
        let record = self
            .users
            .find_by_email(&credentials.email)
            .await
            .map_err(map_repository_error)?;

        // Unknown email and wrong password answer identically.
        let Some(record) = record else {
            return Err(Error::unauthorized("invalid credentials"));
        };
        if !digest_matches(
            &record.credential_digest,
            &digest_password(&credentials.password),
        ) {
            return Err(Error::unauthorized("invalid credentials"));
        }

        Ok(record_to_user(record))
    }
}

#[cfg(test)]
mod tests {
    //! Regression coverage for credential handling.

    use rstest::rstest;

    use super::*;
    use crate::domain::ErrorCode;
    use crate::domain::ports::MockUserRepository;
    use crate::domain::Email;

    fn credentials(password: &str) -> Credentials {
        Credentials {
            email: Email::new("learner@example.com").expect("valid email"),
            password: password.to_owned(),
        }
    }

    fn stored_record(password: &str) -> UserRecord {
        UserRecord {
            id: crate::domain::UserId::random(),
            email: Email::new("learner@example.com").expect("valid email"),
            credential_digest: digest_password(password),
            created_at: chrono::Utc::now(),
        }
    }

    #[rstest]
    fn digests_are_stable_hex() {
        let digest = digest_password("secret");
        assert_eq!(digest.len(), 64);
        assert_eq!(digest, digest_password("secret"));
        assert_ne!(digest, digest_password("Secret"));
    }

    #[rstest]
    #[tokio::test]
    async fn registration_stores_a_digest_not_the_password() {
        let mut users = MockUserRepository::new();
        users
            .expect_insert()
            .withf(|record| {
                record.credential_digest != "secret" && record.credential_digest.len() == 64
            })
            .returning(|record| {
                Ok(UserRecord {
                    id: crate::domain::UserId::random(),
                    email: record.email.clone(),
                    credential_digest: record.credential_digest.clone(),
                    created_at: chrono::Utc::now(),
                })
            });

        let service = DigestLoginService::new(std::sync::Arc::new(users));
        let user = service
            .register(credentials("secret"))
            .await
            .expect("registration succeeds");
        assert_eq!(user.email.as_ref(), "learner@example.com");
    }

    #[rstest]
    #[tokio::test]
    async fn duplicate_email_is_a_conflict() {
        let mut users = MockUserRepository::new();
        users.expect_insert().returning(|record| {
            Err(UserRepositoryError::duplicate_email(
                record.email.as_ref(),
            ))
        });

        let service = DigestLoginService::new(std::sync::Arc::new(users));
        let err = service
            .register(credentials("secret"))
            .await
            .expect_err("duplicate rejected");
        assert_eq!(err.code(), ErrorCode::Conflict);
    }

    #[rstest]
    #[tokio::test]
    async fn login_accepts_the_matching_password() {
        let mut users = MockUserRepository::new();
        users
            .expect_find_by_email()
            .returning(|_| Ok(Some(stored_record("secret"))));

        let service = DigestLoginService::new(std::sync::Arc::new(users));
        assert!(service.login(credentials("secret")).await.is_ok());
    }

    #[rstest]
    #[tokio::test]
    async fn unknown_email_and_wrong_password_answer_identically() {
        let mut missing = MockUserRepository::new();
        missing.expect_find_by_email().returning(|_| Ok(None));
        let missing_err = DigestLoginService::new(std::sync::Arc::new(missing))
            .login(credentials("secret"))
            .await
            .expect_err("unknown email rejected");

        let mut wrong = MockUserRepository::new();
        wrong
            .expect_find_by_email()
            .returning(|_| Ok(Some(stored_record("other"))));
        let wrong_err = DigestLoginService::new(std::sync::Arc::new(wrong))
            .login(credentials("secret"))
            .await
            .expect_err("wrong password rejected");

        assert_eq!(missing_err.code(), ErrorCode::Unauthorized);
        assert_eq!(missing_err.message(), wrong_err.message());
    }

    #[rstest]
    #[tokio::test]
    async fn storage_failures_do_not_leak_detail() {
        let mut users = MockUserRepository::new();
        users
            .expect_find_by_email()
            .returning(|_| Err(UserRepositoryError::connection("tcp refused at 10.0.0.3")));

        let service = DigestLoginService::new(std::sync::Arc::new(users));
        let err = service
            .login(credentials("secret"))
            .await
            .expect_err("storage failure surfaces");
        assert_eq!(err.code(), ErrorCode::ServiceUnavailable);
        assert!(!err.message().contains("10.0.0.3"));
    }
}
