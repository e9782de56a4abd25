//! Port for password hashing and verification.

/// Errors raised by password hasher adapters.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum PasswordHasherError {
    /// Hashing or verification failed inside the backend.
    #[error("password hashing failed: {message}")]
    Hash { message: String },
}

impl PasswordHasherError {
    /// Create a hash error with the given message.
    pub fn hash(message: impl Into<String>) -> Self {
        Self::Hash {
            message: message.into(),
        }
    }
}

/// Port for one-way password hashing.
///
/// The domain never inspects hash internals; it stores the returned opaque
/// string and later asks the same port to verify a candidate against it.
#[cfg_attr(test, mockall::automock)]
pub trait PasswordHasher: Send + Sync {
    /// Produce a salted hash of the password.
    fn hash(&self, password: &str) -> Result<String, PasswordHasherError>;

    /// Check a candidate password against a stored hash.
    fn verify(&self, password: &str, hash: &str) -> Result<bool, PasswordHasherError>;
}
