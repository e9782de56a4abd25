//! PostgreSQL-backed `UserRepository` implementation using Diesel.

use async_trait::async_trait;
use diesel::prelude::*;
use diesel_async::RunQueryDsl;
use uuid::Uuid;

use crate::domain::ports::{UserRepository, UserRepositoryError};
use crate::domain::user::{Email, NewUser, StoredUser, User, UserId, Username};

use super::diesel_error_mapping::{map_basic_diesel_error, map_basic_pool_error};
use super::models::{NewUserRow, UserRow};
use super::pool::{DbPool, PoolError};
use super::schema::users;

/// Diesel-backed implementation of the user repository port.
#[derive(Clone)]
pub struct DieselUserRepository {
    pool: DbPool,
}

impl DieselUserRepository {
    /// Create a new repository with the given connection pool.
    pub fn new(pool: DbPool) -> Self {
        Self { pool }
    }
}

fn map_pool_error(error: PoolError) -> UserRepositoryError {
    map_basic_pool_error(error, UserRepositoryError::connection)
}

fn map_diesel_error(error: diesel::result::Error) -> UserRepositoryError {
    map_basic_diesel_error(
        error,
        UserRepositoryError::query,
        UserRepositoryError::connection,
    )
}

/// Insert failures additionally surface the email unique constraint, so the
/// check-then-insert race in the accounts service resolves to a duplicate.
fn map_insert_error(error: diesel::result::Error) -> UserRepositoryError {
    use diesel::result::{DatabaseErrorKind, Error as DieselError};

    if let DieselError::DatabaseError(DatabaseErrorKind::UniqueViolation, _) = &error {
        return UserRepositoryError::DuplicateEmail;
    }
    map_diesel_error(error)
}

/// Convert a database row into a validated domain user.
pub(crate) fn row_to_user(row: UserRow) -> Result<User, String> {
    let UserRow {
        id,
        email,
        username,
        password_hash: _,
        created_at,
        updated_at,
    } = row;

    let email = Email::new(email).map_err(|err| err.to_string())?;
    let username = Username::new(username).map_err(|err| err.to_string())?;
    Ok(User::new(
        UserId::from_uuid(id),
        email,
        username,
        created_at,
        updated_at,
    ))
}

fn row_to_stored_user(row: UserRow) -> Result<StoredUser, UserRepositoryError> {
    let password_hash = row.password_hash.clone();
    let user = row_to_user(row).map_err(UserRepositoryError::query)?;
    Ok(StoredUser {
        user,
        password_hash,
    })
}

#[async_trait]
impl UserRepository for DieselUserRepository {
    async fn insert(&self, user: &NewUser) -> Result<User, UserRepositoryError> {
        let mut conn = self.pool.get().await.map_err(map_pool_error)?;
        let now = chrono::Utc::now();
        let row = NewUserRow {
            id: Uuid::new_v4(),
            email: user.email.as_ref(),
            username: user.username.as_ref(),
            password_hash: &user.password_hash,
            created_at: now,
            updated_at: now,
        };

        let inserted: UserRow = diesel::insert_into(users::table)
            .values(&row)
            .returning(UserRow::as_returning())
            .get_result(&mut conn)
            .await
            .map_err(map_insert_error)?;

        row_to_user(inserted).map_err(UserRepositoryError::query)
    }

    async fn find_by_email(
        &self,
        email: &Email,
    ) -> Result<Option<StoredUser>, UserRepositoryError> {
        let mut conn = self.pool.get().await.map_err(map_pool_error)?;

        let row = users::table
            .filter(users::email.eq(email.as_ref()))
            .select(UserRow::as_select())
            .first::<UserRow>(&mut conn)
            .await
            .optional()
            .map_err(map_diesel_error)?;

        row.map(row_to_stored_user).transpose()
    }
}
