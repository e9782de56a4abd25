//! Bearer-token request extractor resolving the authenticated identity.
//!
//! Handlers that require authentication take a [`BearerIdentity`] parameter;
//! extraction verifies the `Authorization: Bearer <token>` credential through
//! the token service and yields the resolved [`AuthenticatedUser`]. Handlers
//! never see token internals.

use actix_web::http::header;
use actix_web::{FromRequest, HttpRequest, dev::Payload, web};
use futures_util::future::{Ready, ready};

use crate::domain::ports::TokenServiceError;
use crate::domain::user::AuthenticatedUser;
use crate::domain::Error;
use crate::inbound::http::state::HttpState;

/// Authenticated identity extracted from a verified bearer credential.
pub struct BearerIdentity(AuthenticatedUser);

impl BearerIdentity {
    /// Borrow the resolved identity.
    pub fn user(&self) -> &AuthenticatedUser {
        &self.0
    }

    /// Consume the extractor, yielding the resolved identity.
    pub fn into_inner(self) -> AuthenticatedUser {
        self.0
    }
}

fn map_token_error(error: TokenServiceError) -> Error {
    match error {
        TokenServiceError::Expired => Error::unauthorized("token expired"),
        TokenServiceError::Invalid { .. } => Error::unauthorized("invalid bearer token"),
        TokenServiceError::Issue { message } => {
            Error::internal(format!("token verification error: {message}"))
        }
    }
}

fn extract_identity(req: &HttpRequest) -> Result<AuthenticatedUser, Error> {
    let state = req
        .app_data::<web::Data<HttpState>>()
        .ok_or_else(|| Error::internal("http state is not configured"))?;

    let header = req
        .headers()
        .get(header::AUTHORIZATION)
        .ok_or_else(|| Error::unauthorized("missing bearer token"))?
        .to_str()
        .map_err(|_| Error::unauthorized("invalid authorization header"))?;

    let token = header
        .strip_prefix("Bearer ")
        .ok_or_else(|| Error::unauthorized("invalid authorization header"))?;

    state.tokens().verify(token).map_err(map_token_error)
}

impl FromRequest for BearerIdentity {
    type Error = Error;
    type Future = Ready<Result<Self, Self::Error>>;

    fn from_request(req: &HttpRequest, _payload: &mut Payload) -> Self::Future {
        ready(extract_identity(req).map(BearerIdentity))
    }
}
