//! PostgreSQL-backed `ArticleRepository` implementation using Diesel.
//!
//! Every read joins `articles` with `users` explicitly so returned domain
//! articles always carry their author; there is no lazy loading.

use async_trait::async_trait;
use chrono::Utc;
use diesel::prelude::*;
use diesel_async::RunQueryDsl;
use uuid::Uuid;

use crate::domain::article::{Article, ArticleFilter, ArticleId, ArticlePatch, NewArticle, Title};
use crate::domain::ports::{ArticleRepository, ArticleRepositoryError};

use super::diesel_error_mapping::{map_basic_diesel_error, map_basic_pool_error};
use super::diesel_user_repository::row_to_user;
use super::models::{ArticleChangeset, ArticleRow, NewArticleRow, UserRow};
use super::pool::{DbPool, PoolError};
use super::schema::{articles, users};

/// Diesel-backed implementation of the article repository port.
#[derive(Clone)]
pub struct DieselArticleRepository {
    pool: DbPool,
}

impl DieselArticleRepository {
    /// Create a new repository with the given connection pool.
    pub fn new(pool: DbPool) -> Self {
        Self { pool }
    }
}

fn map_pool_error(error: PoolError) -> ArticleRepositoryError {
    map_basic_pool_error(error, ArticleRepositoryError::connection)
}

fn map_diesel_error(error: diesel::result::Error) -> ArticleRepositoryError {
    map_basic_diesel_error(
        error,
        ArticleRepositoryError::query,
        ArticleRepositoryError::connection,
    )
}

/// Convert a joined row pair into a validated domain article.
fn row_to_article(row: ArticleRow, author: UserRow) -> Result<Article, ArticleRepositoryError> {
    let ArticleRow {
        id,
        title,
        description,
        publish_date,
        author_id: _,
        created_at,
        updated_at,
    } = row;

    let author = row_to_user(author).map_err(ArticleRepositoryError::query)?;
    let title = Title::new(title).map_err(|err| ArticleRepositoryError::query(err.to_string()))?;

    Ok(Article::new(
        ArticleId::from_uuid(id),
        title,
        description,
        publish_date,
        author,
        created_at,
        updated_at,
    ))
}

type JoinedRow = (ArticleRow, UserRow);

#[async_trait]
impl ArticleRepository for DieselArticleRepository {
    async fn insert(&self, article: &NewArticle) -> Result<Article, ArticleRepositoryError> {
        let id = Uuid::new_v4();
        let now = Utc::now();
        {
            let mut conn = self.pool.get().await.map_err(map_pool_error)?;
            let row = NewArticleRow {
                id,
                title: article.draft.title.as_ref(),
                description: &article.draft.description,
                publish_date: article.draft.publish_date,
                author_id: *article.author.as_uuid(),
                created_at: now,
                updated_at: now,
            };

            diesel::insert_into(articles::table)
                .values(&row)
                .execute(&mut conn)
                .await
                .map_err(map_diesel_error)?;
        }

        self.find_with_author(&ArticleId::from_uuid(id))
            .await?
            .ok_or_else(|| ArticleRepositoryError::query("article row missing after insert"))
    }

    async fn find_with_author(
        &self,
        id: &ArticleId,
    ) -> Result<Option<Article>, ArticleRepositoryError> {
        let mut conn = self.pool.get().await.map_err(map_pool_error)?;

        let row = articles::table
            .inner_join(users::table)
            .filter(articles::id.eq(id.as_uuid()))
            .select((ArticleRow::as_select(), UserRow::as_select()))
            .first::<JoinedRow>(&mut conn)
            .await
            .optional()
            .map_err(map_diesel_error)?;

        row.map(|(article, author)| row_to_article(article, author))
            .transpose()
    }

    async fn update(
        &self,
        id: &ArticleId,
        patch: &ArticlePatch,
    ) -> Result<(), ArticleRepositoryError> {
        let mut conn = self.pool.get().await.map_err(map_pool_error)?;

        let changeset = ArticleChangeset {
            title: patch.title.as_ref().map(AsRef::as_ref),
            description: patch.description.as_deref(),
            publish_date: patch.publish_date,
            updated_at: Utc::now(),
        };

        diesel::update(articles::table.find(id.as_uuid()))
            .set(&changeset)
            .execute(&mut conn)
            .await
            .map(|_| ())
            .map_err(map_diesel_error)
    }

    async fn delete(&self, id: &ArticleId) -> Result<(), ArticleRepositoryError> {
        let mut conn = self.pool.get().await.map_err(map_pool_error)?;

        diesel::delete(articles::table.find(id.as_uuid()))
            .execute(&mut conn)
            .await
            .map(|_| ())
            .map_err(map_diesel_error)
    }

    async fn list_with_authors(
        &self,
        filter: &ArticleFilter,
    ) -> Result<(Vec<Article>, u64), ArticleRepositoryError> {
        let mut conn = self.pool.get().await.map_err(map_pool_error)?;

        let mut rows_query = articles::table
            .inner_join(users::table)
            .select((ArticleRow::as_select(), UserRow::as_select()))
            .into_boxed();
        let mut count_query = articles::table
            .inner_join(users::table)
            .select(diesel::dsl::count_star())
            .into_boxed();

        if let Some(author) = filter.author() {
            rows_query = rows_query.filter(articles::author_id.eq(*author.as_uuid()));
            count_query = count_query.filter(articles::author_id.eq(*author.as_uuid()));
        }
        if let Some((from, to)) = filter.date_range() {
            rows_query = rows_query.filter(articles::publish_date.between(from, to));
            count_query = count_query.filter(articles::publish_date.between(from, to));
        }

        let total: i64 = count_query
            .get_result(&mut conn)
            .await
            .map_err(map_diesel_error)?;

        let page = filter.page();
        let rows: Vec<JoinedRow> = rows_query
            .order((articles::publish_date.desc(), articles::id.desc()))
            .offset(page.offset() as i64)
            .limit(i64::from(page.limit()))
            .load(&mut conn)
            .await
            .map_err(map_diesel_error)?;

        let articles = rows
            .into_iter()
            .map(|(article, author)| row_to_article(article, author))
            .collect::<Result<Vec<_>, _>>()?;

        Ok((articles, total.max(0) as u64))
    }
}
