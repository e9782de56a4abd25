//! Port for bearer credential issuance and verification.
//!
//! This is the auth-gate boundary: the domain hands over a resolved identity
//! and receives an opaque token, or hands over a token and receives the
//! identity back. Token internals stay behind the adapter.

use crate::domain::user::AuthenticatedUser;

/// Errors raised by token service adapters.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum TokenServiceError {
    /// Token creation failed inside the backend.
    #[error("token issuance failed: {message}")]
    Issue { message: String },
    /// The credential is malformed, tampered with, or carries bad claims.
    #[error("invalid token: {message}")]
    Invalid { message: String },
    /// The credential has expired.
    #[error("token expired")]
    Expired,
}

impl TokenServiceError {
    /// Create an issuance error with the given message.
    pub fn issue(message: impl Into<String>) -> Self {
        Self::Issue {
            message: message.into(),
        }
    }

    /// Create an invalid-token error with the given message.
    pub fn invalid(message: impl Into<String>) -> Self {
        Self::Invalid {
            message: message.into(),
        }
    }
}

/// Port for issuing and verifying bearer credentials.
#[cfg_attr(test, mockall::automock)]
pub trait TokenService: Send + Sync {
    /// Issue a credential for the given identity.
    fn issue(&self, user: &AuthenticatedUser) -> Result<String, TokenServiceError>;

    /// Verify a credential and resolve the identity it carries.
    fn verify(&self, token: &str) -> Result<AuthenticatedUser, TokenServiceError>;
}
