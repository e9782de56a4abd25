//! OpenAPI document served by Swagger UI in debug builds.

use utoipa::OpenApi;

use crate::domain::article::Article;
use crate::domain::error::{Error, ErrorCode};
use crate::domain::ports::AccessToken;
use crate::domain::user::User;
use crate::inbound::http::articles::{
    CreateArticleRequest, DeleteAck, UpdateArticleRequest,
};
use crate::inbound::http::auth::{LoginRequest, RegisterRequest};
use pagination::Page;

/// Public OpenAPI surface used by Swagger UI and tooling.
#[derive(OpenApi)]
#[openapi(
    info(
        title = "Blog backend API",
        description = "User registration/login with JWT bearer auth and CRUD over articles with cached reads."
    ),
    paths(
        crate::inbound::http::auth::register,
        crate::inbound::http::auth::login,
        crate::inbound::http::articles::create_article,
        crate::inbound::http::articles::list_articles,
        crate::inbound::http::articles::get_article,
        crate::inbound::http::articles::update_article,
        crate::inbound::http::articles::delete_article,
        crate::inbound::http::health::ready,
        crate::inbound::http::health::live,
    ),
    components(schemas(
        Error,
        ErrorCode,
        User,
        Article,
        Page<Article>,
        AccessToken,
        CreateArticleRequest,
        UpdateArticleRequest,
        DeleteAck,
        RegisterRequest,
        LoginRequest,
    )),
    tags(
        (name = "auth", description = "Registration and login"),
        (name = "articles", description = "Article CRUD with cached reads"),
        (name = "health", description = "Liveness and readiness probes")
    )
)]
pub struct ApiDoc;
