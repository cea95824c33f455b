//! Database operations for the `quill` `PostgreSQL` database.
//!
//! # Tables (schema `blog`)
//!
//! - `users` - Accounts and password hashes
//! - `categories` - Post categories, addressed by slug
//! - `locations` - Places posts can be tagged with
//! - `posts` - Blog posts with category/location/image metadata
//! - `comments` - Flat comment threads per post
//!
//! Session storage lives in the `tower_sessions` schema.
//!
//! # Migrations
//!
//! Migrations are stored in `crates/web/migrations/` and run via:
//! ```bash
//! cargo run -p quill-cli -- migrate
//! ```
//!
//! Queries use sqlx's runtime query API rather than the compile-time macros,
//! so builds do not require a live database or offline query cache.

pub mod categories;
pub mod comments;
pub mod locations;
pub mod posts;
pub mod users;

use std::time::Duration;

use secrecy::ExposeSecret;
use sqlx::PgPool;
use sqlx::postgres::PgPoolOptions;
use thiserror::Error;

pub use categories::CategoryRepository;
pub use comments::CommentRepository;
pub use locations::LocationRepository;
pub use posts::{FeedScope, NewPost, PostRepository};
pub use users::{NewUser, ProfileUpdate, UserRepository};

/// Errors that can occur during repository operations.
#[derive(Debug, Error)]
pub enum RepositoryError {
    /// Database error from sqlx.
    #[error("database error: {0}")]
    Database(#[from] sqlx::Error),

    /// Data in the database is corrupted or invalid.
    #[error("data corruption: {0}")]
    DataCorruption(String),

    /// Requested entity was not found.
    #[error("not found")]
    NotFound,

    /// Constraint violation (e.g., unique username).
    #[error("constraint violation: {0}")]
    Conflict(String),
}

/// Create a `PostgreSQL` connection pool with sensible defaults.
///
/// # Arguments
///
/// * `database_url` - `PostgreSQL` connection string (wrapped in `SecretString`)
///
/// # Errors
///
/// Returns `sqlx::Error` if the connection cannot be established.
pub async fn create_pool(database_url: &secrecy::SecretString) -> Result<PgPool, sqlx::Error> {
    PgPoolOptions::new()
        .max_connections(10)
        .min_connections(2)
        .acquire_timeout(Duration::from_secs(10))
        .connect(database_url.expose_secret())
        .await
}

/// Map a unique-constraint violation to `Conflict`, everything else to `Database`.
fn map_unique_violation(e: sqlx::Error, message: &str) -> RepositoryError {
    if let sqlx::Error::Database(ref db_err) = e
        && db_err.is_unique_violation()
    {
        return RepositoryError::Conflict(message.to_owned());
    }
    RepositoryError::Database(e)
}
