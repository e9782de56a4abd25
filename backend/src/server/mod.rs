//! Server construction and middleware wiring.

mod config;

pub use config::AppConfig;

use std::sync::Arc;

use actix_web::dev::{Server, ServiceFactory, ServiceRequest, ServiceResponse};
use actix_web::{App, HttpServer, web};
use std::net::SocketAddr;
#[cfg(debug_assertions)]
use utoipa::OpenApi;
#[cfg(debug_assertions)]
use utoipa_swagger_ui::SwaggerUi;

#[cfg(debug_assertions)]
use crate::doc::ApiDoc;
use crate::domain::ports::{
    AccountsService, ArticleCache, ArticleRepository, ArticlesCommand, ArticlesQuery,
    FixtureArticleRepository, FixtureUserRepository, NoopArticleCache, TokenService,
    UserRepository,
};
use crate::domain::{AccountsServiceImpl, ArticleService};
use crate::inbound::http::articles::{
    create_article, delete_article, get_article, list_articles, update_article,
};
use crate::inbound::http::auth::{login, register};
use crate::inbound::http::health::{HealthState, live, ready};
use crate::inbound::http::state::{HttpState, HttpStatePorts};
use crate::middleware::Trace;
use crate::outbound::auth::{BcryptPasswordHasher, JwtTokenService};
use crate::outbound::cache::RedisArticleCache;
use crate::outbound::persistence::{DbPool, DieselArticleRepository, DieselUserRepository};

/// Builder-style configuration for creating the HTTP server.
pub struct ServerConfig {
    bind_addr: SocketAddr,
    tokens: Arc<JwtTokenService>,
    db_pool: Option<DbPool>,
    redis_cache: Option<RedisArticleCache>,
}

impl ServerConfig {
    /// Construct a server configuration with the mandatory pieces.
    pub fn new(bind_addr: SocketAddr, tokens: Arc<JwtTokenService>) -> Self {
        Self {
            bind_addr,
            tokens,
            db_pool: None,
            redis_cache: None,
        }
    }

    /// Attach a database connection pool for the persistence adapters.
    ///
    /// Without one, the server falls back to fixture repositories: reads
    /// behave as an empty store and writes fail loudly.
    #[must_use]
    pub fn with_db_pool(mut self, pool: DbPool) -> Self {
        self.db_pool = Some(pool);
        self
    }

    /// Attach a Redis cache for the article read path.
    ///
    /// Without one, every read goes straight to the entity store.
    #[must_use]
    pub fn with_redis_cache(mut self, cache: RedisArticleCache) -> Self {
        self.redis_cache = Some(cache);
        self
    }
}

fn article_ports<R, C>(
    repository: Arc<R>,
    cache: Arc<C>,
) -> (Arc<dyn ArticlesQuery>, Arc<dyn ArticlesCommand>)
where
    R: ArticleRepository + 'static,
    C: ArticleCache + 'static,
{
    let service = Arc::new(ArticleService::new(repository, cache));
    (
        service.clone() as Arc<dyn ArticlesQuery>,
        service as Arc<dyn ArticlesCommand>,
    )
}

fn accounts_port<U>(users: Arc<U>, tokens: Arc<JwtTokenService>) -> Arc<dyn AccountsService>
where
    U: UserRepository + 'static,
{
    Arc::new(AccountsServiceImpl::new(
        users,
        Arc::new(BcryptPasswordHasher::new()),
        tokens,
    ))
}

/// Build the shared HTTP state, selecting real adapters where backends are
/// configured and fixtures otherwise.
fn build_http_state(config: &ServerConfig) -> web::Data<HttpState> {
    let (articles_query, articles_command) = match (&config.db_pool, &config.redis_cache) {
        (Some(pool), Some(cache)) => article_ports(
            Arc::new(DieselArticleRepository::new(pool.clone())),
            Arc::new(cache.clone()),
        ),
        (Some(pool), None) => article_ports(
            Arc::new(DieselArticleRepository::new(pool.clone())),
            Arc::new(NoopArticleCache),
        ),
        (None, _) => article_ports(Arc::new(FixtureArticleRepository), Arc::new(NoopArticleCache)),
    };

    let accounts = match &config.db_pool {
        Some(pool) => accounts_port(
            Arc::new(DieselUserRepository::new(pool.clone())),
            config.tokens.clone(),
        ),
        None => accounts_port(Arc::new(FixtureUserRepository), config.tokens.clone()),
    };

    web::Data::new(HttpState::new(HttpStatePorts {
        articles_query,
        articles_command,
        accounts,
        tokens: config.tokens.clone() as Arc<dyn TokenService>,
    }))
}

fn build_app(
    health_state: web::Data<HealthState>,
    http_state: web::Data<HttpState>,
) -> App<
    impl ServiceFactory<
        ServiceRequest,
        Config = (),
        Response = ServiceResponse,
        Error = actix_web::Error,
        InitError = (),
    >,
> {
    let app = App::new()
        .app_data(health_state)
        .app_data(http_state)
        .wrap(Trace)
        .service(register)
        .service(login)
        .service(create_article)
        .service(list_articles)
        .service(get_article)
        .service(update_article)
        .service(delete_article)
        .service(ready)
        .service(live);

    #[cfg(debug_assertions)]
    let app = app.service(SwaggerUi::new("/docs").url("/api-docs/openapi.json", ApiDoc::openapi()));

    app
}

/// Construct an Actix HTTP server using the provided health state and
/// configuration.
///
/// # Errors
///
/// Propagates [`std::io::Error`] when binding the socket fails.
pub fn create_server(
    health_state: web::Data<HealthState>,
    config: ServerConfig,
) -> std::io::Result<Server> {
    let server_health_state = health_state.clone();
    let http_state = build_http_state(&config);
    let bind_addr = config.bind_addr;

    let server = HttpServer::new(move || {
        build_app(server_health_state.clone(), http_state.clone())
    })
    .bind(bind_addr)?
    .run();

    health_state.mark_ready();
    Ok(server)
}
