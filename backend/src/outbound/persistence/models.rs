//! Diesel row models for the persistence adapters.

use chrono::{DateTime, Utc};
use diesel::prelude::*;
use uuid::Uuid;

use super::schema::{articles, users};

/// Queryable user row.
#[derive(Debug, Clone, Queryable, Selectable)]
#[diesel(table_name = users)]
#[diesel(check_for_backend(diesel::pg::Pg))]
pub(crate) struct UserRow {
    pub id: Uuid,
    pub email: String,
    pub username: String,
    pub password_hash: String,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

/// Insertable user row.
#[derive(Debug, Insertable)]
#[diesel(table_name = users)]
pub(crate) struct NewUserRow<'a> {
    pub id: Uuid,
    pub email: &'a str,
    pub username: &'a str,
    pub password_hash: &'a str,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

/// Queryable article row.
#[derive(Debug, Clone, Queryable, Selectable)]
#[diesel(table_name = articles)]
#[diesel(check_for_backend(diesel::pg::Pg))]
pub(crate) struct ArticleRow {
    pub id: Uuid,
    pub title: String,
    pub description: String,
    pub publish_date: DateTime<Utc>,
    pub author_id: Uuid,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

/// Insertable article row.
#[derive(Debug, Insertable)]
#[diesel(table_name = articles)]
pub(crate) struct NewArticleRow<'a> {
    pub id: Uuid,
    pub title: &'a str,
    pub description: &'a str,
    pub publish_date: DateTime<Utc>,
    pub author_id: Uuid,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

/// Partial article update; `None` fields are left untouched.
///
/// `updated_at` is always present so every update advances the modification
/// timestamp and the changeset can never be empty.
#[derive(Debug, AsChangeset)]
#[diesel(table_name = articles)]
pub(crate) struct ArticleChangeset<'a> {
    pub title: Option<&'a str>,
    pub description: Option<&'a str>,
    pub publish_date: Option<DateTime<Utc>>,
    pub updated_at: DateTime<Utc>,
}
