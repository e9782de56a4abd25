//! Diesel table definitions for the PostgreSQL schema.
//!
//! These definitions must match the deployed schema exactly; Diesel uses
//! them for compile-time query validation and type-safe SQL generation.

diesel::table! {
    /// User accounts.
    users (id) {
        /// Primary key: UUID v4 identifier.
        id -> Uuid,
        /// Unique account email.
        email -> Varchar,
        /// Account name shown alongside articles.
        username -> Varchar,
        /// bcrypt hash of the account password.
        password_hash -> Varchar,
        /// Record creation timestamp.
        created_at -> Timestamptz,
        /// Last modification timestamp.
        updated_at -> Timestamptz,
    }
}

diesel::table! {
    /// Articles, each owned by exactly one user.
    articles (id) {
        /// Primary key: UUID v4 identifier.
        id -> Uuid,
        /// Article headline.
        title -> Varchar,
        /// Article body text.
        description -> Text,
        /// Caller-supplied publication timestamp.
        publish_date -> Timestamptz,
        /// Owning author; immutable after creation.
        author_id -> Uuid,
        /// Record creation timestamp.
        created_at -> Timestamptz,
        /// Last modification timestamp.
        updated_at -> Timestamptz,
    }
}

diesel::joinable!(articles -> users (author_id));

diesel::allow_tables_to_appear_in_same_query!(articles, users);
