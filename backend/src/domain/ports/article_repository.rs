//! Port for article persistence with author joins.

use async_trait::async_trait;

use crate::domain::article::{Article, ArticleFilter, ArticleId, ArticlePatch, NewArticle};

/// Errors raised by article repository adapters.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum ArticleRepositoryError {
    /// Repository connection could not be established.
    #[error("article repository connection failed: {message}")]
    Connection { message: String },
    /// Query or mutation failed during execution.
    #[error("article repository query failed: {message}")]
    Query { message: String },
}

impl ArticleRepositoryError {
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

/// Port for article writes and author-joined reads.
///
/// Every read returns articles joined with their author so callers never
/// trigger a second lookup for ownership checks or serialisation.
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait ArticleRepository: Send + Sync {
    /// Persist a new article and return it joined with its author.
    async fn insert(&self, article: &NewArticle) -> Result<Article, ArticleRepositoryError>;

    /// Find an article by id, joined with its author.
    async fn find_with_author(
        &self,
        id: &ArticleId,
    ) -> Result<Option<Article>, ArticleRepositoryError>;

    /// Apply a partial update to an existing article.
    async fn update(
        &self,
        id: &ArticleId,
        patch: &ArticlePatch,
    ) -> Result<(), ArticleRepositoryError>;

    /// Hard-delete an article.
    async fn delete(&self, id: &ArticleId) -> Result<(), ArticleRepositoryError>;

    /// List articles matching the filter window, joined with their authors,
    /// together with the total match count ignoring the window.
    async fn list_with_authors(
        &self,
        filter: &ArticleFilter,
    ) -> Result<(Vec<Article>, u64), ArticleRepositoryError>;
}

/// Fixture repository for processes running without persistence configured.
///
/// Reads behave as an empty store; writes fail so misconfiguration surfaces
/// instead of silently dropping data.
#[derive(Debug, Default, Clone, Copy)]
pub struct FixtureArticleRepository;

#[async_trait]
impl ArticleRepository for FixtureArticleRepository {
    async fn insert(&self, _article: &NewArticle) -> Result<Article, ArticleRepositoryError> {
        Err(ArticleRepositoryError::query(
            "article persistence is not configured",
        ))
    }

    async fn find_with_author(
        &self,
        _id: &ArticleId,
    ) -> Result<Option<Article>, ArticleRepositoryError> {
        Ok(None)
    }

    async fn update(
        &self,
        _id: &ArticleId,
        _patch: &ArticlePatch,
    ) -> Result<(), ArticleRepositoryError> {
        Err(ArticleRepositoryError::query(
            "article persistence is not configured",
        ))
    }

    async fn delete(&self, _id: &ArticleId) -> Result<(), ArticleRepositoryError> {
        Err(ArticleRepositoryError::query(
            "article persistence is not configured",
        ))
    }

    async fn list_with_authors(
        &self,
        _filter: &ArticleFilter,
    ) -> Result<(Vec<Article>, u64), ArticleRepositoryError> {
        Ok((Vec::new(), 0))
    }
}
