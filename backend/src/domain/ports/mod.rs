//! Domain ports and supporting types for the hexagonal boundary.

mod accounts;
mod article_cache;
mod article_repository;
mod articles_command;
mod articles_query;
mod password_hasher;
mod token_service;
mod user_repository;

#[cfg(test)]
pub use accounts::MockAccountsService;
pub use accounts::{AccessToken, AccountsService, LoginCredentials, Registration};
#[cfg(test)]
pub use article_cache::MockArticleCache;
pub use article_cache::{ArticleCache, ArticleCacheError, NoopArticleCache};
#[cfg(test)]
pub use article_repository::MockArticleRepository;
pub use article_repository::{
    ArticleRepository, ArticleRepositoryError, FixtureArticleRepository,
};
#[cfg(test)]
pub use articles_command::MockArticlesCommand;
pub use articles_command::ArticlesCommand;
#[cfg(test)]
pub use articles_query::MockArticlesQuery;
pub use articles_query::ArticlesQuery;
#[cfg(test)]
pub use password_hasher::MockPasswordHasher;
pub use password_hasher::{PasswordHasher, PasswordHasherError};
#[cfg(test)]
pub use token_service::MockTokenService;
pub use token_service::{TokenService, TokenServiceError};
#[cfg(test)]
pub use user_repository::MockUserRepository;
pub use user_repository::{FixtureUserRepository, UserRepository, UserRepositoryError};
