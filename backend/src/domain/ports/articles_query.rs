//! Driving port for article reads.

use async_trait::async_trait;
use pagination::Page;

use crate::domain::Error;
use crate::domain::article::{Article, ArticleFilter, ArticleId};

/// Domain use-case port for reading articles.
///
/// Inbound adapters use this port so handlers never import persistence or
/// cache concerns.
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait ArticlesQuery: Send + Sync {
    /// Fetch a single article by id.
    async fn get_article(&self, id: &ArticleId) -> Result<Article, Error>;

    /// Fetch one page of articles matching the filter.
    async fn list_articles(&self, filter: ArticleFilter) -> Result<Page<Article>, Error>;
}
