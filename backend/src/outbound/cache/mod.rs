//! Redis adapter implementing the article cache port.
//!
//! Uses a `bb8`-managed connection pool. Values are stored with `SET ... PX`
//! so the TTL is applied atomically with the write; invalidation is a plain
//! `DEL`. The adapter reports failures and leaves degradation policy to the
//! caller.

use std::time::Duration;

use async_trait::async_trait;
use bb8_redis::{RedisConnectionManager, bb8, redis};

use crate::domain::ports::{ArticleCache, ArticleCacheError};

/// Redis-backed implementation of the article cache port.
#[derive(Clone)]
pub struct RedisArticleCache {
    pool: bb8::Pool<RedisConnectionManager>,
}

impl RedisArticleCache {
    /// Create a cache client pooling connections against the given URL.
    ///
    /// Connections are established lazily, so an unreachable backend
    /// surfaces on first use rather than here.
    pub async fn connect(redis_url: &str) -> Result<Self, ArticleCacheError> {
        let manager = RedisConnectionManager::new(redis_url)
            .map_err(|err| ArticleCacheError::backend(err.to_string()))?;
        let pool = bb8::Pool::builder()
            .build(manager)
            .await
            .map_err(|err| ArticleCacheError::backend(err.to_string()))?;
        Ok(Self { pool })
    }

    async fn connection(
        &self,
    ) -> Result<bb8::PooledConnection<'_, RedisConnectionManager>, ArticleCacheError> {
        self.pool
            .get()
            .await
            .map_err(|err| ArticleCacheError::backend(err.to_string()))
    }
}

#[async_trait]
impl ArticleCache for RedisArticleCache {
    async fn get(&self, key: &str) -> Result<Option<String>, ArticleCacheError> {
        let mut conn = self.connection().await?;
        let value: Option<String> = redis::cmd("GET")
            .arg(key)
            .query_async(&mut *conn)
            .await
            .map_err(|err| ArticleCacheError::backend(err.to_string()))?;
        Ok(value)
    }

    async fn set(&self, key: &str, value: &str, ttl: Duration) -> Result<(), ArticleCacheError> {
        let mut conn = self.connection().await?;
        let _: () = redis::cmd("SET")
            .arg(key)
            .arg(value)
            .arg("PX")
            .arg(u64::try_from(ttl.as_millis()).unwrap_or(u64::MAX))
            .query_async(&mut *conn)
            .await
            .map_err(|err| ArticleCacheError::backend(err.to_string()))?;
        Ok(())
    }

    async fn delete(&self, key: &str) -> Result<(), ArticleCacheError> {
        let mut conn = self.connection().await?;
        let _: () = redis::cmd("DEL")
            .arg(key)
            .query_async(&mut *conn)
            .await
            .map_err(|err| ArticleCacheError::backend(err.to_string()))?;
        Ok(())
    }
}
