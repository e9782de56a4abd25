//! JWT adapter implementing the token service port.
//!
//! Tokens are signed HS256 with a shared secret. Claims carry the subject
//! (user id), the email, and issued-at/expiry timestamps; verification
//! enforces the expiry.

use std::time::Duration;

use chrono::Utc;
use jsonwebtoken::{Algorithm, DecodingKey, EncodingKey, Header, Validation, decode, encode};
use serde::{Deserialize, Serialize};

use crate::domain::ports::{TokenService, TokenServiceError};
use crate::domain::user::{AuthenticatedUser, Email, UserId};

#[derive(Debug, Serialize, Deserialize)]
struct Claims {
    sub: String,
    email: String,
    iat: i64,
    exp: i64,
}

/// HS256-signed JWT implementation of the token service port.
pub struct JwtTokenService {
    encoding: EncodingKey,
    decoding: DecodingKey,
    ttl: Duration,
}

impl JwtTokenService {
    /// Create a token service signing with the given secret and lifetime.
    pub fn new(secret: &[u8], ttl: Duration) -> Self {
        Self {
            encoding: EncodingKey::from_secret(secret),
            decoding: DecodingKey::from_secret(secret),
            ttl,
        }
    }
}

fn map_decode_error(err: jsonwebtoken::errors::Error) -> TokenServiceError {
    use jsonwebtoken::errors::ErrorKind;

    match err.kind() {
        ErrorKind::ExpiredSignature => TokenServiceError::Expired,
        _ => TokenServiceError::invalid(err.to_string()),
    }
}

impl TokenService for JwtTokenService {
    fn issue(&self, user: &AuthenticatedUser) -> Result<String, TokenServiceError> {
        let now = Utc::now().timestamp();
        let ttl = i64::try_from(self.ttl.as_secs())
            .map_err(|_| TokenServiceError::issue("token lifetime out of range"))?;
        let claims = Claims {
            sub: user.user_id.to_string(),
            email: user.email.to_string(),
            iat: now,
            exp: now + ttl,
        };

        encode(&Header::new(Algorithm::HS256), &claims, &self.encoding)
            .map_err(|err| TokenServiceError::issue(err.to_string()))
    }

    fn verify(&self, token: &str) -> Result<AuthenticatedUser, TokenServiceError> {
        let data = decode::<Claims>(token, &self.decoding, &Validation::new(Algorithm::HS256))
            .map_err(map_decode_error)?;

        let user_id = UserId::new(&data.claims.sub)
            .map_err(|err| TokenServiceError::invalid(format!("bad subject claim: {err}")))?;
        let email = Email::new(data.claims.email)
            .map_err(|err| TokenServiceError::invalid(format!("bad email claim: {err}")))?;

        Ok(AuthenticatedUser { user_id, email })
    }
}
