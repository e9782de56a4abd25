//! Application configuration loaded from the environment.

use std::env;
use std::io;
use std::net::SocketAddr;
use std::time::Duration;

use tracing::warn;
use uuid::Uuid;

const DEFAULT_BIND_ADDR: &str = "0.0.0.0:8080";
const DEFAULT_JWT_TTL_SECS: u64 = 3600;

/// Environment-derived application configuration.
///
/// Missing backend URLs are allowed: the server then runs with fixture
/// adapters, which is what tests and local smoke runs rely on. The JWT
/// secret is mandatory outside debug builds.
#[derive(Clone)]
pub struct AppConfig {
    /// Socket address the HTTP server binds to.
    pub bind_addr: SocketAddr,
    /// PostgreSQL connection URL, when persistence is configured.
    pub database_url: Option<String>,
    /// Redis connection URL, when the article cache is configured.
    pub redis_url: Option<String>,
    /// Shared secret used to sign bearer tokens.
    pub jwt_secret: String,
    /// Lifetime of issued bearer tokens.
    pub jwt_ttl: Duration,
}

impl AppConfig {
    /// Read the configuration from environment variables.
    ///
    /// # Errors
    ///
    /// Returns an error when `BIND_ADDR` cannot be parsed or when
    /// `JWT_SECRET` is absent in a release build without
    /// `JWT_ALLOW_EPHEMERAL=1`.
    pub fn from_env() -> io::Result<Self> {
        let bind_addr = env::var("BIND_ADDR")
            .unwrap_or_else(|_| DEFAULT_BIND_ADDR.to_owned())
            .parse::<SocketAddr>()
            .map_err(|err| io::Error::other(format!("invalid BIND_ADDR: {err}")))?;

        let jwt_secret = match env::var("JWT_SECRET") {
            Ok(secret) if !secret.trim().is_empty() => secret,
            _ => {
                let allow_dev = env::var("JWT_ALLOW_EPHEMERAL").ok().as_deref() == Some("1");
                if cfg!(debug_assertions) || allow_dev {
                    warn!("using ephemeral JWT secret (dev only); tokens die with the process");
                    Uuid::new_v4().to_string()
                } else {
                    return Err(io::Error::other(
                        "JWT_SECRET must be set (or JWT_ALLOW_EPHEMERAL=1 for throwaway runs)",
                    ));
                }
            }
        };

        let jwt_ttl = match env::var("JWT_TTL_SECS") {
            Ok(raw) => Duration::from_secs(
                raw.parse::<u64>()
                    .map_err(|err| io::Error::other(format!("invalid JWT_TTL_SECS: {err}")))?,
            ),
            Err(_) => Duration::from_secs(DEFAULT_JWT_TTL_SECS),
        };

        Ok(Self {
            bind_addr,
            database_url: env::var("DATABASE_URL").ok(),
            redis_url: env::var("REDIS_URL").ok(),
            jwt_secret,
            jwt_ttl,
        })
    }
}
