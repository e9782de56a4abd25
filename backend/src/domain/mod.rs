//! Domain primitives, aggregates, services, and ports.
//!
//! Purpose: define strongly typed domain entities used by the API and
//! persistence layers, the services implementing the use-case ports, and the
//! ports themselves. Types stay immutable; invariants and serialisation
//! contracts live in each type's Rustdoc.

pub mod article;
pub mod error;
pub mod ports;
pub mod user;

mod accounts_service;
mod articles_service;

pub use self::accounts_service::AccountsServiceImpl;
pub use self::article::{
    Article, ArticleDraft, ArticleFilter, ArticleId, ArticlePatch, ArticleValidationError,
    NewArticle, Title,
};
pub use self::articles_service::{
    ARTICLE_CACHE_TTL, ARTICLES_LIST_KEY, ArticleService, article_cache_key, list_cache_key,
};
pub use self::error::{Error, ErrorCode};
pub use self::user::{
    AuthenticatedUser, Email, NewUser, StoredUser, User, UserId, UserValidationError, Username,
};

/// Convenient result alias for handlers and services.
pub type ApiResult<T> = Result<T, Error>;
