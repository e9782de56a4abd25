//! Diesel PostgreSQL adapters implementing the persistence ports.

mod diesel_article_repository;
mod diesel_error_mapping;
mod diesel_user_repository;
mod models;
mod pool;
pub(crate) mod schema;

pub use diesel_article_repository::DieselArticleRepository;
pub use diesel_user_repository::DieselUserRepository;
pub use pool::{DbPool, PoolConfig, PoolError};
