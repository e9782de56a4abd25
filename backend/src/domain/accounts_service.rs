//! Account domain service: registration and password login.
//!
//! Credential material never leaves this service: passwords are hashed on
//! the way into the repository and the hash is compared on the way back.
//! Both "unknown email" and "wrong password" answer with the same message so
//! login failures do not reveal which accounts exist.

use std::sync::Arc;

use async_trait::async_trait;

use crate::domain::Error;
use crate::domain::ports::{
    AccessToken, AccountsService, LoginCredentials, PasswordHasher, PasswordHasherError,
    Registration, TokenService, TokenServiceError, UserRepository, UserRepositoryError,
};
use crate::domain::user::{AuthenticatedUser, NewUser, User};

const INVALID_CREDENTIALS: &str = "Invalid credentials";

fn map_repository_error(error: UserRepositoryError) -> Error {
    match error {
        UserRepositoryError::Connection { message } => {
            Error::service_unavailable(format!("user repository unavailable: {message}"))
        }
        UserRepositoryError::Query { message } => {
            Error::internal(format!("user repository error: {message}"))
        }
        UserRepositoryError::DuplicateEmail => {
            Error::conflict("user with this email already exists")
        }
    }
}

fn map_hasher_error(error: PasswordHasherError) -> Error {
    let PasswordHasherError::Hash { message } = error;
    Error::internal(format!("password hashing error: {message}"))
}

fn map_token_error(error: TokenServiceError) -> Error {
    Error::internal(format!("token issuance error: {error}"))
}

/// Accounts service implementing the registration and login driving port.
#[derive(Clone)]
pub struct AccountsServiceImpl<U, H, T> {
    users: Arc<U>,
    hasher: Arc<H>,
    tokens: Arc<T>,
}

impl<U, H, T> AccountsServiceImpl<U, H, T> {
    /// Create a new service over a user repository, hasher, and token issuer.
    pub fn new(users: Arc<U>, hasher: Arc<H>, tokens: Arc<T>) -> Self {
        Self {
            users,
            hasher,
            tokens,
        }
    }
}

#[async_trait]
impl<U, H, T> AccountsService for AccountsServiceImpl<U, H, T>
where
    U: UserRepository,
    H: PasswordHasher,
    T: TokenService,
{
    async fn register(&self, registration: Registration) -> Result<User, Error> {
        let existing = self
            .users
            .find_by_email(&registration.email)
            .await
            .map_err(map_repository_error)?;
        if existing.is_some() {
            return Err(Error::conflict("user with this email already exists"));
        }

        let password_hash = self
            .hasher
            .hash(&registration.password)
            .map_err(map_hasher_error)?;

        self.users
            .insert(&NewUser {
                email: registration.email,
                username: registration.username,
                password_hash,
            })
            .await
            .map_err(map_repository_error)
    }

    async fn login(&self, credentials: LoginCredentials) -> Result<AccessToken, Error> {
        let stored = self
            .users
            .find_by_email(&credentials.email)
            .await
            .map_err(map_repository_error)?
            .ok_or_else(|| Error::unauthorized(INVALID_CREDENTIALS))?;

        let valid = self
            .hasher
            .verify(&credentials.password, &stored.password_hash)
            .map_err(map_hasher_error)?;
        if !valid {
            return Err(Error::unauthorized(INVALID_CREDENTIALS));
        }

        let identity = AuthenticatedUser {
            user_id: *stored.user.id(),
            email: stored.user.email().clone(),
        };
        let access_token = self.tokens.issue(&identity).map_err(map_token_error)?;
        Ok(AccessToken { access_token })
    }
}
