//! Driving port for account registration and login.

use async_trait::async_trait;

use crate::domain::{Email, Error, User, UserId};

/// Credentials supplied at registration or login.
#[derive(Debug, Clone, PartialEq)]
pub struct Credentials {
    pub email: Email,
    pub password: String,
}

/// Use-case port for authentication flows.
///
/// Credential storage and hashing live behind this port; the domain only
/// sees validated emails and opaque passwords.
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait LoginService: Send + Sync {
    /// Create an account. Duplicate emails yield a `Conflict` error.
    async fn register(&self, credentials: Credentials) -> Result<User, Error>;

    /// Verify credentials. Any mismatch yields a uniform `Unauthorized`.
    async fn login(&self, credentials: Credentials) -> Result<User, Error>;
}

/// Fixture implementation accepting every credential pair.
#[derive(Debug, Default, Clone, Copy)]
pub struct FixtureLoginService;

#[async_trait]
impl LoginService for FixtureLoginService {
    async fn register(&self, credentials: Credentials) -> Result<User, Error> {
        Ok(User {
            id: UserId::random(),
            email: credentials.email,
            created_at: chrono::Utc::now(),
        })
    }

    async fn login(&self, credentials: Credentials) -> Result<User, Error> {
        Ok(User {
            id: UserId::random(),
            email: credentials.email,
            created_at: chrono::Utc::now(),
        })
    }
}
