//! Backend entry-point: wires configuration, adapters, and the HTTP server.

use std::sync::Arc;

use actix_web::web;
use tracing::warn;
use tracing_subscriber::{EnvFilter, fmt};

use backend::inbound::http::health::HealthState;
use backend::outbound::auth::JwtTokenService;
use backend::outbound::cache::RedisArticleCache;
use backend::outbound::persistence::{DbPool, PoolConfig};
use backend::server::{AppConfig, ServerConfig, create_server};

/// Application bootstrap.
#[actix_web::main]
async fn main() -> std::io::Result<()> {
    if let Err(e) = fmt()
        .with_env_filter(EnvFilter::from_default_env())
        .json()
        .try_init()
    {
        warn!(error = %e, "tracing init failed");
    }

    let config = AppConfig::from_env()?;
    let tokens = Arc::new(JwtTokenService::new(
        config.jwt_secret.as_bytes(),
        config.jwt_ttl,
    ));
    let mut server_config = ServerConfig::new(config.bind_addr, tokens);

    match &config.database_url {
        Some(url) => {
            let pool = DbPool::new(PoolConfig::new(url))
                .await
                .map_err(|err| std::io::Error::other(err.to_string()))?;
            server_config = server_config.with_db_pool(pool);
        }
        None => warn!("DATABASE_URL not set; serving fixture data only"),
    }

    match &config.redis_url {
        Some(url) => {
            let cache = RedisArticleCache::connect(url)
                .await
                .map_err(|err| std::io::Error::other(err.to_string()))?;
            server_config = server_config.with_redis_cache(cache);
        }
        None => warn!("REDIS_URL not set; article reads go straight to the database"),
    }

    let health_state = web::Data::new(HealthState::new());
    create_server(health_state, server_config)?.await
}
