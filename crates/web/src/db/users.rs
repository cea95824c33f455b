//! User repository for database operations.

use chrono::{DateTime, Utc};
use sqlx::{FromRow, PgPool};

use quill_core::types::{Email, UserId, Username};

use super::{RepositoryError, map_unique_violation};
use crate::models::user::User;

/// Fields for creating an account.
#[derive(Debug)]
pub struct NewUser<'a> {
    pub username: &'a Username,
    pub first_name: &'a str,
    pub last_name: &'a str,
    pub email: &'a Email,
    pub password_hash: &'a str,
}

/// Editable profile fields.
#[derive(Debug)]
pub struct ProfileUpdate<'a> {
    pub username: &'a Username,
    pub first_name: &'a str,
    pub last_name: &'a str,
    pub email: &'a Email,
}

#[derive(Debug, FromRow)]
struct UserRow {
    id: i32,
    username: String,
    first_name: String,
    last_name: String,
    email: String,
    created_at: DateTime<Utc>,
}

impl TryFrom<UserRow> for User {
    type Error = RepositoryError;

    fn try_from(r: UserRow) -> Result<Self, Self::Error> {
        let username = Username::parse(&r.username).map_err(|e| {
            RepositoryError::DataCorruption(format!("invalid username in database: {e}"))
        })?;
        let email = Email::parse(&r.email).map_err(|e| {
            RepositoryError::DataCorruption(format!("invalid email in database: {e}"))
        })?;

        Ok(Self {
            id: UserId::new(r.id),
            username,
            first_name: r.first_name,
            last_name: r.last_name,
            email,
            created_at: r.created_at,
        })
    }
}

const USER_SELECT: &str =
    "SELECT id, username, first_name, last_name, email, created_at FROM blog.users";

/// Repository for user database operations.
pub struct UserRepository<'a> {
    pool: &'a PgPool,
}

impl<'a> UserRepository<'a> {
    /// Create a new user repository.
    #[must_use]
    pub const fn new(pool: &'a PgPool) -> Self {
        Self { pool }
    }

    /// Get a user by their username.
    ///
    /// # Errors
    ///
    /// Returns `RepositoryError::Database` if the query fails.
    /// Returns `RepositoryError::DataCorruption` if stored data is invalid.
    pub async fn get_by_username(
        &self,
        username: &Username,
    ) -> Result<Option<User>, RepositoryError> {
        let sql = format!("{USER_SELECT} WHERE username = $1");
        let row = sqlx::query_as::<_, UserRow>(&sql)
            .bind(username.as_str())
            .fetch_optional(self.pool)
            .await?;

        row.map(User::try_from).transpose()
    }

    /// Get a user by their ID.
    ///
    /// # Errors
    ///
    /// Returns `RepositoryError::Database` if the query fails.
    /// Returns `RepositoryError::DataCorruption` if stored data is invalid.
    pub async fn get_by_id(&self, id: UserId) -> Result<Option<User>, RepositoryError> {
        let sql = format!("{USER_SELECT} WHERE id = $1");
        let row = sqlx::query_as::<_, UserRow>(&sql)
            .bind(id.as_i32())
            .fetch_optional(self.pool)
            .await?;

        row.map(User::try_from).transpose()
    }

    /// Create a new account.
    ///
    /// # Errors
    ///
    /// Returns `RepositoryError::Conflict` if the username is taken.
    /// Returns `RepositoryError::Database` for other database errors.
    pub async fn create(&self, new_user: &NewUser<'_>) -> Result<User, RepositoryError> {
        let row = sqlx::query_as::<_, UserRow>(
            r"
            INSERT INTO blog.users (username, first_name, last_name, email, password_hash)
            VALUES ($1, $2, $3, $4, $5)
            RETURNING id, username, first_name, last_name, email, created_at
            ",
        )
        .bind(new_user.username.as_str())
        .bind(new_user.first_name)
        .bind(new_user.last_name)
        .bind(new_user.email.as_str())
        .bind(new_user.password_hash)
        .fetch_one(self.pool)
        .await
        .map_err(|e| map_unique_violation(e, "username already exists"))?;

        User::try_from(row)
    }

    /// Update a user's profile fields.
    ///
    /// # Errors
    ///
    /// Returns `RepositoryError::Conflict` if the new username is taken.
    /// Returns `RepositoryError::NotFound` if the user doesn't exist.
    /// Returns `RepositoryError::Database` for other database errors.
    pub async fn update_profile(
        &self,
        id: UserId,
        update: &ProfileUpdate<'_>,
    ) -> Result<User, RepositoryError> {
        let row = sqlx::query_as::<_, UserRow>(
            r"
            UPDATE blog.users
            SET username = $1, first_name = $2, last_name = $3, email = $4
            WHERE id = $5
            RETURNING id, username, first_name, last_name, email, created_at
            ",
        )
        .bind(update.username.as_str())
        .bind(update.first_name)
        .bind(update.last_name)
        .bind(update.email.as_str())
        .bind(id.as_i32())
        .fetch_optional(self.pool)
        .await
        .map_err(|e| map_unique_violation(e, "username already exists"))?;

        match row {
            Some(row) => User::try_from(row),
            None => Err(RepositoryError::NotFound),
        }
    }

    /// Get a user and their password hash by username.
    ///
    /// Returns `None` if the user doesn't exist.
    ///
    /// # Errors
    ///
    /// Returns `RepositoryError::Database` if the query fails.
    /// Returns `RepositoryError::DataCorruption` if stored data is invalid.
    pub async fn get_password_hash(
        &self,
        username: &Username,
    ) -> Result<Option<(User, String)>, RepositoryError> {
        let row = sqlx::query_as::<_, UserWithHashRow>(
            r"
            SELECT id, username, first_name, last_name, email, created_at, password_hash
            FROM blog.users
            WHERE username = $1
            ",
        )
        .bind(username.as_str())
        .fetch_optional(self.pool)
        .await?;

        let Some(r) = row else {
            return Ok(None);
        };

        let password_hash = r.password_hash.clone();
        let user = User::try_from(UserRow {
            id: r.id,
            username: r.username,
            first_name: r.first_name,
            last_name: r.last_name,
            email: r.email,
            created_at: r.created_at,
        })?;

        Ok(Some((user, password_hash)))
    }
}

#[derive(Debug, FromRow)]
struct UserWithHashRow {
    id: i32,
    username: String,
    first_name: String,
    last_name: String,
    email: String,
    created_at: DateTime<Utc>,
    password_hash: String,
}
