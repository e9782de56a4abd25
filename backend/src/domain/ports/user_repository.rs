//! Port for account persistence.

use async_trait::async_trait;

use crate::domain::user::{Email, NewUser, StoredUser, User};

/// Errors raised by user repository adapters.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum UserRepositoryError {
    /// Repository connection could not be established.
    #[error("user repository connection failed: {message}")]
    Connection { message: String },
    /// Query or mutation failed during execution.
    #[error("user repository query failed: {message}")]
    Query { message: String },
    /// The email address is already registered.
    ///
    /// Raised by the unique constraint so the check-then-insert race in the
    /// accounts service still resolves to a duplicate, not a crash.
    #[error("email address is already registered")]
    DuplicateEmail,
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
}

/// Port for account writes and credential lookups.
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait UserRepository: Send + Sync {
    /// Persist a new account and return its public view.
    async fn insert(&self, user: &NewUser) -> Result<User, UserRepositoryError>;

    /// Find an account by email, including its password hash.
    async fn find_by_email(
        &self,
        email: &Email,
    ) -> Result<Option<StoredUser>, UserRepositoryError>;
}

/// Fixture repository for processes running without persistence configured.
#[derive(Debug, Default, Clone, Copy)]
pub struct FixtureUserRepository;

#[async_trait]
impl UserRepository for FixtureUserRepository {
    async fn insert(&self, _user: &NewUser) -> Result<User, UserRepositoryError> {
        Err(UserRepositoryError::query(
            "account persistence is not configured",
        ))
    }

    async fn find_by_email(
        &self,
        _email: &Email,
    ) -> Result<Option<StoredUser>, UserRepositoryError> {
        Ok(None)
    }
}
