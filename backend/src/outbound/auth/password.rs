//! bcrypt adapter implementing the password hasher port.

use crate::domain::ports::{PasswordHasher, PasswordHasherError};

/// Work factor used for newly registered accounts.
const DEFAULT_COST: u32 = 10;

/// bcrypt-backed implementation of the password hasher port.
#[derive(Debug, Clone, Copy)]
pub struct BcryptPasswordHasher {
    cost: u32,
}

impl BcryptPasswordHasher {
    /// Create a hasher with the default work factor.
    pub fn new() -> Self {
        Self { cost: DEFAULT_COST }
    }

    /// Create a hasher with an explicit work factor.
    ///
    /// Lower factors are useful in tests; production should stay at the
    /// default.
    pub fn with_cost(cost: u32) -> Self {
        Self { cost }
    }
}

impl Default for BcryptPasswordHasher {
    fn default() -> Self {
        Self::new()
    }
}

impl PasswordHasher for BcryptPasswordHasher {
    fn hash(&self, password: &str) -> Result<String, PasswordHasherError> {
        bcrypt::hash(password, self.cost).map_err(|err| PasswordHasherError::hash(err.to_string()))
    }

    fn verify(&self, password: &str, hash: &str) -> Result<bool, PasswordHasherError> {
        bcrypt::verify(password, hash).map_err(|err| PasswordHasherError::hash(err.to_string()))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rstest::rstest;

    // bcrypt's minimum cost keeps these tests fast.
    fn hasher() -> BcryptPasswordHasher {
        BcryptPasswordHasher::with_cost(4)
    }

    #[rstest]
    fn hash_verifies_against_original_password() {
        let hasher = hasher();
        let hash = hasher.hash("correct horse battery staple").expect("hashable");

        assert!(
            hasher
                .verify("correct horse battery staple", &hash)
                .expect("verifiable")
        );
        assert!(!hasher.verify("wrong password", &hash).expect("verifiable"));
    }

    #[rstest]
    fn hashes_are_salted() {
        let hasher = hasher();
        let first = hasher.hash("same password").expect("hashable");
        let second = hasher.hash("same password").expect("hashable");
        assert_ne!(first, second);
    }

    #[rstest]
    fn malformed_hash_is_an_error() {
        let hasher = hasher();
        let err = hasher
            .verify("password", "not-a-bcrypt-hash")
            .expect_err("malformed hash");
        assert!(matches!(err, PasswordHasherError::Hash { .. }));
    }
}
