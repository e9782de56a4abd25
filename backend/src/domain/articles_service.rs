//! Article domain service: cache-aside reads and invalidating writes.
//!
//! Reads prefer the cache and fall back to the repository, populating the
//! cache with a fixed TTL on the way out. Writes go straight to the
//! repository and then synchronously invalidate the affected keys, so
//! readers observe either the latest committed state or a bounded-age copy.
//!
//! Invalidation is deliberately asymmetric: writes clear the single-article
//! key and the bare [`ARTICLES_LIST_KEY`], while parameterised list keys are
//! left to expire through their TTL. Concurrent writers race only on who
//! invalidates last; staleness is bounded by the TTL either way.
//!
//! A failing cache backend never fails a request: reads degrade to the
//! repository and invalidation failures are logged and skipped.

use std::sync::Arc;
use std::time::Duration;

use async_trait::async_trait;
use pagination::Page;
use serde::Serialize;
use serde::de::DeserializeOwned;
use tracing::warn;

use crate::domain::Error;
use crate::domain::article::{
    Article, ArticleDraft, ArticleFilter, ArticleId, ArticlePatch, NewArticle,
};
use crate::domain::ports::{
    ArticleCache, ArticleRepository, ArticleRepositoryError, ArticlesCommand, ArticlesQuery,
};
use crate::domain::user::AuthenticatedUser;

/// TTL applied to every article-related cache entry.
pub const ARTICLE_CACHE_TTL: Duration = Duration::from_millis(60_000);

/// Cache key cleared by every write for the unparameterised list.
///
/// Both key formats here are interoperability constants: any process sharing
/// the cache must derive them identically.
pub const ARTICLES_LIST_KEY: &str = "articles_list";

/// Cache key for a single article.
pub fn article_cache_key(id: &ArticleId) -> String {
    format!("article_{id}")
}

/// Cache key for one filtered, paginated list page.
pub fn list_cache_key(filter: &ArticleFilter) -> Result<String, Error> {
    let fingerprint = filter
        .cache_fingerprint()
        .map_err(|err| Error::internal(format!("failed to serialise list filter: {err}")))?;
    Ok(format!("{ARTICLES_LIST_KEY}_{fingerprint}"))
}

fn map_repository_error(error: ArticleRepositoryError) -> Error {
    match error {
        ArticleRepositoryError::Connection { message } => {
            Error::service_unavailable(format!("article repository unavailable: {message}"))
        }
        ArticleRepositoryError::Query { message } => {
            Error::internal(format!("article repository error: {message}"))
        }
    }
}

/// Article service implementing the query and command driving ports.
#[derive(Clone)]
pub struct ArticleService<R, C> {
    repository: Arc<R>,
    cache: Arc<C>,
}

impl<R, C> ArticleService<R, C>
where
    R: ArticleRepository,
    C: ArticleCache,
{
    /// Create a new service over a repository and a cache.
    pub fn new(repository: Arc<R>, cache: Arc<C>) -> Self {
        Self { repository, cache }
    }

    /// Read and decode a cached value, degrading to a miss on any failure.
    async fn cache_read<T: DeserializeOwned>(&self, key: &str) -> Option<T> {
        match self.cache.get(key).await {
            Ok(Some(raw)) => match serde_json::from_str(&raw) {
                Ok(value) => Some(value),
                Err(err) => {
                    warn!(key, error = %err, "discarding undecodable cache entry");
                    None
                }
            },
            Ok(None) => None,
            Err(err) => {
                warn!(key, error = %err, "article cache read failed; treating as miss");
                None
            }
        }
    }

    /// Encode and store a value under the fixed TTL; failures are logged.
    async fn cache_write<T: Serialize>(&self, key: &str, value: &T) {
        let raw = match serde_json::to_string(value) {
            Ok(raw) => raw,
            Err(err) => {
                warn!(key, error = %err, "failed to encode value for cache");
                return;
            }
        };
        if let Err(err) = self.cache.set(key, &raw, ARTICLE_CACHE_TTL).await {
            warn!(key, error = %err, "article cache write failed; entry skipped");
        }
    }

    /// Drop a cache entry; failures are logged and skipped so a cache outage
    /// cannot fail a committed write.
    async fn invalidate(&self, key: &str) {
        if let Err(err) = self.cache.delete(key).await {
            warn!(key, error = %err, "article cache invalidation failed; entry expires via TTL");
        }
    }

    async fn load_article(&self, id: &ArticleId) -> Result<Article, Error> {
        let key = article_cache_key(id);
        if let Some(article) = self.cache_read::<Article>(&key).await {
            return Ok(article);
        }

        let article = self
            .repository
            .find_with_author(id)
            .await
            .map_err(map_repository_error)?
            .ok_or_else(|| Error::not_found(format!("article {id} not found")))?;

        self.cache_write(&key, &article).await;
        Ok(article)
    }

    fn ensure_author(
        article: &Article,
        requester: &AuthenticatedUser,
        action: &str,
    ) -> Result<(), Error> {
        if article.author().id() != &requester.user_id {
            return Err(Error::forbidden(format!(
                "you can only {action} your own articles"
            )));
        }
        Ok(())
    }
}

#[async_trait]
impl<R, C> ArticlesQuery for ArticleService<R, C>
where
    R: ArticleRepository,
    C: ArticleCache,
{
    async fn get_article(&self, id: &ArticleId) -> Result<Article, Error> {
        self.load_article(id).await
    }

    async fn list_articles(&self, filter: ArticleFilter) -> Result<Page<Article>, Error> {
        let key = list_cache_key(&filter)?;
        if let Some(page) = self.cache_read::<Page<Article>>(&key).await {
            return Ok(page);
        }

        let (items, total) = self
            .repository
            .list_with_authors(&filter)
            .await
            .map_err(map_repository_error)?;
        let page = Page::new(items, total, filter.page());

        self.cache_write(&key, &page).await;
        Ok(page)
    }
}

#[async_trait]
impl<R, C> ArticlesCommand for ArticleService<R, C>
where
    R: ArticleRepository,
    C: ArticleCache,
{
    async fn create_article(
        &self,
        draft: ArticleDraft,
        author: &AuthenticatedUser,
    ) -> Result<Article, Error> {
        let article = self
            .repository
            .insert(&NewArticle {
                draft,
                author: author.user_id,
            })
            .await
            .map_err(map_repository_error)?;

        self.invalidate(ARTICLES_LIST_KEY).await;
        Ok(article)
    }

    async fn update_article(
        &self,
        id: &ArticleId,
        patch: ArticlePatch,
        requester: &AuthenticatedUser,
    ) -> Result<Article, Error> {
        let article = self.load_article(id).await?;
        Self::ensure_author(&article, requester, "update")?;

        self.repository
            .update(id, &patch)
            .await
            .map_err(map_repository_error)?;

        self.invalidate(&article_cache_key(id)).await;
        self.invalidate(ARTICLES_LIST_KEY).await;

        // Reload through the cache-aside path so the fresh row repopulates
        // the single-article key.
        self.load_article(id).await
    }

    async fn remove_article(
        &self,
        id: &ArticleId,
        requester: &AuthenticatedUser,
    ) -> Result<(), Error> {
        let article = self.load_article(id).await?;
        Self::ensure_author(&article, requester, "delete")?;

        self.repository
            .delete(id)
            .await
            .map_err(map_repository_error)?;

        self.invalidate(&article_cache_key(id)).await;
        self.invalidate(ARTICLES_LIST_KEY).await;
        Ok(())
    }
}

#[cfg(test)]
#[path = "articles_service_tests.rs"]
mod tests;
