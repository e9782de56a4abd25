//! Port for the key-value cache in front of article reads.

use std::time::Duration;

use async_trait::async_trait;

/// Errors surfaced by cache adapters.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum ArticleCacheError {
    /// Cache backend is unavailable or timing out.
    #[error("article cache backend failure: {message}")]
    Backend { message: String },
}

impl ArticleCacheError {
    /// Create a backend error with the given message.
    pub fn backend(message: impl Into<String>) -> Self {
        Self::Backend {
            message: message.into(),
        }
    }
}

/// Port for cache reads, TTL writes, and invalidation.
///
/// The cache holds opaque string payloads; serialisation is the caller's
/// concern. No consistency is guaranteed beyond what callers enforce through
/// invalidation and the entry TTL.
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait ArticleCache: Send + Sync {
    /// Read the payload stored under the key, if any.
    async fn get(&self, key: &str) -> Result<Option<String>, ArticleCacheError>;

    /// Store a payload under the key, expiring after `ttl`.
    async fn set(&self, key: &str, value: &str, ttl: Duration) -> Result<(), ArticleCacheError>;

    /// Drop the entry stored under the key, if any.
    async fn delete(&self, key: &str) -> Result<(), ArticleCacheError>;
}

/// Cache implementation that never holds anything.
///
/// Used when no cache backend is configured: every read misses and every
/// write succeeds silently, so the read path degrades to the entity store.
#[derive(Debug, Clone, Copy, Default)]
pub struct NoopArticleCache;

#[async_trait]
impl ArticleCache for NoopArticleCache {
    async fn get(&self, _key: &str) -> Result<Option<String>, ArticleCacheError> {
        Ok(None)
    }

    async fn set(
        &self,
        _key: &str,
        _value: &str,
        _ttl: Duration,
    ) -> Result<(), ArticleCacheError> {
        Ok(())
    }

    async fn delete(&self, _key: &str) -> Result<(), ArticleCacheError> {
        Ok(())
    }
}
