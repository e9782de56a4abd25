//! Articles API handlers.
//!
//! ```text
//! POST   /articles            (auth) create
//! GET    /articles            list with pagination and filters
//! GET    /articles/{id}       single article
//! PUT    /articles/{id}       (auth) partial update
//! DELETE /articles/{id}       (auth) hard delete
//! ```

use actix_web::{HttpResponse, delete, get, post, put, web};
use chrono::{DateTime, Utc};
use pagination::{Page, PageRequest, PageRequestError};
use serde::{Deserialize, Serialize};
use serde_json::json;
use utoipa::{IntoParams, ToSchema};

use crate::domain::article::{
    Article, ArticleDraft, ArticleFilter, ArticleId, ArticlePatch, ArticleValidationError, Title,
};
use crate::domain::user::{UserId, UserValidationError};
use crate::domain::{ApiResult, Error};
use crate::inbound::http::bearer::BearerIdentity;
use crate::inbound::http::state::HttpState;

/// Request body for `POST /articles`.
#[derive(Debug, Deserialize, Serialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct CreateArticleRequest {
    /// Article headline.
    pub title: String,
    /// Article body text.
    pub description: String,
    /// Publication timestamp chosen by the author.
    pub publish_date: DateTime<Utc>,
}

/// Request body for `PUT /articles/{id}`; absent fields stay unchanged.
#[derive(Debug, Default, Deserialize, Serialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct UpdateArticleRequest {
    /// Replacement headline.
    pub title: Option<String>,
    /// Replacement body text.
    pub description: Option<String>,
    /// Replacement publication timestamp.
    pub publish_date: Option<DateTime<Utc>>,
}

/// Query parameters for `GET /articles`.
#[derive(Debug, Default, Deserialize, IntoParams)]
#[serde(rename_all = "camelCase")]
#[into_params(parameter_in = Query)]
pub struct ListArticlesParams {
    /// 1-based page number; defaults to 1.
    pub page: Option<u32>,
    /// Page size; defaults to 10.
    pub limit: Option<u32>,
    /// Restrict to articles by this author id.
    pub author: Option<String>,
    /// Inclusive lower publish-date bound (applied only with `toDate`).
    pub from_date: Option<DateTime<Utc>>,
    /// Inclusive upper publish-date bound (applied only with `fromDate`).
    pub to_date: Option<DateTime<Utc>>,
}

/// Acknowledgment returned by `DELETE /articles/{id}`.
#[derive(Debug, Serialize, Deserialize, ToSchema)]
pub struct DeleteAck {
    /// Human-readable confirmation.
    pub message: String,
}

fn map_article_validation_error(err: ArticleValidationError) -> Error {
    let (field, code) = match &err {
        ArticleValidationError::InvalidId => ("id", "invalid_id"),
        ArticleValidationError::EmptyTitle => ("title", "empty_title"),
        ArticleValidationError::TitleTooLong { .. } => ("title", "title_too_long"),
        ArticleValidationError::EmptyDescription => ("description", "empty_description"),
    };
    Error::invalid_request(err.to_string()).with_details(json!({ "field": field, "code": code }))
}

fn map_page_request_error(err: PageRequestError) -> Error {
    let field = match &err {
        PageRequestError::PageTooSmall => "page",
        PageRequestError::LimitTooSmall | PageRequestError::LimitTooLarge => "limit",
    };
    Error::invalid_request(err.to_string()).with_details(json!({ "field": field }))
}

fn map_author_validation_error(err: UserValidationError) -> Error {
    Error::invalid_request(format!("author filter: {err}"))
        .with_details(json!({ "field": "author" }))
}

fn parse_article_id(raw: &str) -> Result<ArticleId, Error> {
    ArticleId::new(raw).map_err(map_article_validation_error)
}

fn draft_from_request(request: CreateArticleRequest) -> Result<ArticleDraft, Error> {
    let title = Title::new(request.title).map_err(map_article_validation_error)?;
    ArticleDraft::new(title, request.description, request.publish_date)
        .map_err(map_article_validation_error)
}

fn patch_from_request(request: UpdateArticleRequest) -> Result<ArticlePatch, Error> {
    let title = request
        .title
        .map(Title::new)
        .transpose()
        .map_err(map_article_validation_error)?;
    if request
        .description
        .as_deref()
        .is_some_and(|description| description.trim().is_empty())
    {
        return Err(map_article_validation_error(
            ArticleValidationError::EmptyDescription,
        ));
    }
    Ok(ArticlePatch {
        title,
        description: request.description,
        publish_date: request.publish_date,
    })
}

fn filter_from_params(params: ListArticlesParams) -> Result<ArticleFilter, Error> {
    let page = PageRequest::new(params.page.unwrap_or(1), params.limit.unwrap_or(10))
        .map_err(map_page_request_error)?;
    let author = params
        .author
        .as_deref()
        .map(UserId::new)
        .transpose()
        .map_err(map_author_validation_error)?;
    Ok(ArticleFilter::new(
        page,
        author,
        params.from_date,
        params.to_date,
    ))
}

/// Create an article authored by the authenticated caller.
#[utoipa::path(
    post,
    path = "/articles",
    request_body = CreateArticleRequest,
    responses(
        (status = 201, description = "Article created", body = Article),
        (status = 400, description = "Invalid request", body = Error),
        (status = 401, description = "Missing or invalid credential", body = Error),
        (status = 500, description = "Internal server error", body = Error)
    ),
    tags = ["articles"],
    operation_id = "createArticle"
)]
#[post("/articles")]
pub async fn create_article(
    state: web::Data<HttpState>,
    identity: BearerIdentity,
    payload: web::Json<CreateArticleRequest>,
) -> ApiResult<HttpResponse> {
    let draft = draft_from_request(payload.into_inner())?;
    let article = state
        .articles_command()
        .create_article(draft, identity.user())
        .await?;
    Ok(HttpResponse::Created().json(article))
}

/// List articles with pagination and optional author/date filters.
#[utoipa::path(
    get,
    path = "/articles",
    params(ListArticlesParams),
    responses(
        (status = 200, description = "One page of articles", body = Page<Article>),
        (status = 400, description = "Invalid request", body = Error),
        (status = 500, description = "Internal server error", body = Error)
    ),
    tags = ["articles"],
    operation_id = "listArticles",
    security([])
)]
#[get("/articles")]
pub async fn list_articles(
    state: web::Data<HttpState>,
    params: web::Query<ListArticlesParams>,
) -> ApiResult<web::Json<Page<Article>>> {
    let filter = filter_from_params(params.into_inner())?;
    let page = state.articles_query().list_articles(filter).await?;
    Ok(web::Json(page))
}

/// Fetch a single article.
#[utoipa::path(
    get,
    path = "/articles/{id}",
    params(("id" = String, Path, description = "Article identifier")),
    responses(
        (status = 200, description = "The article", body = Article),
        (status = 400, description = "Invalid request", body = Error),
        (status = 404, description = "Article not found", body = Error),
        (status = 500, description = "Internal server error", body = Error)
    ),
    tags = ["articles"],
    operation_id = "getArticle",
    security([])
)]
#[get("/articles/{id}")]
pub async fn get_article(
    state: web::Data<HttpState>,
    path: web::Path<String>,
) -> ApiResult<web::Json<Article>> {
    let id = parse_article_id(&path.into_inner())?;
    let article = state.articles_query().get_article(&id).await?;
    Ok(web::Json(article))
}

/// Update an article; only its author may do this.
#[utoipa::path(
    put,
    path = "/articles/{id}",
    params(("id" = String, Path, description = "Article identifier")),
    request_body = UpdateArticleRequest,
    responses(
        (status = 200, description = "Updated article", body = Article),
        (status = 400, description = "Invalid request", body = Error),
        (status = 401, description = "Missing or invalid credential", body = Error),
        (status = 403, description = "Caller is not the author", body = Error),
        (status = 404, description = "Article not found", body = Error),
        (status = 500, description = "Internal server error", body = Error)
    ),
    tags = ["articles"],
    operation_id = "updateArticle"
)]
#[put("/articles/{id}")]
pub async fn update_article(
    state: web::Data<HttpState>,
    identity: BearerIdentity,
    path: web::Path<String>,
    payload: web::Json<UpdateArticleRequest>,
) -> ApiResult<web::Json<Article>> {
    let id = parse_article_id(&path.into_inner())?;
    let patch = patch_from_request(payload.into_inner())?;
    let article = state
        .articles_command()
        .update_article(&id, patch, identity.user())
        .await?;
    Ok(web::Json(article))
}

/// Delete an article; only its author may do this.
#[utoipa::path(
    delete,
    path = "/articles/{id}",
    params(("id" = String, Path, description = "Article identifier")),
    responses(
        (status = 200, description = "Deletion acknowledged", body = DeleteAck),
        (status = 400, description = "Invalid request", body = Error),
        (status = 401, description = "Missing or invalid credential", body = Error),
        (status = 403, description = "Caller is not the author", body = Error),
        (status = 404, description = "Article not found", body = Error),
        (status = 500, description = "Internal server error", body = Error)
    ),
    tags = ["articles"],
    operation_id = "deleteArticle"
)]
#[delete("/articles/{id}")]
pub async fn delete_article(
    state: web::Data<HttpState>,
    identity: BearerIdentity,
    path: web::Path<String>,
) -> ApiResult<web::Json<DeleteAck>> {
    let id = parse_article_id(&path.into_inner())?;
    state
        .articles_command()
        .remove_article(&id, identity.user())
        .await?;
    Ok(web::Json(DeleteAck {
        message: "Article successfully deleted".to_owned(),
    }))
}
