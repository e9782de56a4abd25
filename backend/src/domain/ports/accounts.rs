//! Driving port for account registration and login.

use async_trait::async_trait;
use serde::Serialize;
use utoipa::ToSchema;

use crate::domain::Error;
use crate::domain::user::{Email, User, Username};

/// Validated registration payload.
#[derive(Debug, Clone, PartialEq)]
pub struct Registration {
    /// Unique account email.
    pub email: Email,
    /// Account name.
    pub username: Username,
    /// Plain-text password; hashed before it leaves the accounts service.
    pub password: String,
}

/// Validated login payload.
#[derive(Debug, Clone, PartialEq)]
pub struct LoginCredentials {
    /// Account email to authenticate.
    pub email: Email,
    /// Candidate password.
    pub password: String,
}

/// Bearer credential issued on successful login.
#[derive(Debug, Clone, PartialEq, Serialize, ToSchema)]
pub struct AccessToken {
    /// Signed bearer token for the `Authorization` header.
    pub access_token: String,
}

/// Domain use-case port for account registration and login.
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait AccountsService: Send + Sync {
    /// Register a new account and return its public view.
    async fn register(&self, registration: Registration) -> Result<User, Error>;

    /// Authenticate by email and password, issuing a bearer credential.
    async fn login(&self, credentials: LoginCredentials) -> Result<AccessToken, Error>;
}
