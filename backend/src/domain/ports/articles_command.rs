//! Driving port for article writes.
//!
//! Every operation takes the authenticated identity explicitly; there is no
//! ambient request state to consult.

use async_trait::async_trait;

use crate::domain::Error;
use crate::domain::article::{Article, ArticleDraft, ArticleId, ArticlePatch};
use crate::domain::user::AuthenticatedUser;

/// Domain use-case port for creating, updating, and deleting articles.
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait ArticlesCommand: Send + Sync {
    /// Create an article authored by the authenticated caller.
    async fn create_article(
        &self,
        draft: ArticleDraft,
        author: &AuthenticatedUser,
    ) -> Result<Article, Error>;

    /// Apply a partial update; only the author may do this.
    async fn update_article(
        &self,
        id: &ArticleId,
        patch: ArticlePatch,
        requester: &AuthenticatedUser,
    ) -> Result<Article, Error>;

    /// Hard-delete an article; only the author may do this.
    async fn remove_article(
        &self,
        id: &ArticleId,
        requester: &AuthenticatedUser,
    ) -> Result<(), Error>;
}
