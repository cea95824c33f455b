//! Location repository for database operations.

use chrono::{DateTime, Utc};
use sqlx::{FromRow, PgPool};

use quill_core::types::LocationId;

use super::RepositoryError;
use crate::models::location::Location;
use crate::models::post::Publication;

#[derive(Debug, FromRow)]
struct LocationRow {
    id: i32,
    name: String,
    is_published: bool,
    created_at: DateTime<Utc>,
}

impl From<LocationRow> for Location {
    fn from(r: LocationRow) -> Self {
        Self {
            id: LocationId::new(r.id),
            name: r.name,
            publication: Publication {
                is_published: r.is_published,
                created_at: r.created_at,
            },
        }
    }
}

/// Repository for location database operations.
pub struct LocationRepository<'a> {
    pool: &'a PgPool,
}

impl<'a> LocationRepository<'a> {
    /// Create a new location repository.
    #[must_use]
    pub const fn new(pool: &'a PgPool) -> Self {
        Self { pool }
    }

    /// List published locations for the post editor dropdown.
    ///
    /// # Errors
    ///
    /// Returns `RepositoryError::Database` if the query fails.
    pub async fn list_published(&self) -> Result<Vec<Location>, RepositoryError> {
        let rows = sqlx::query_as::<_, LocationRow>(
            r"
            SELECT id, name, is_published, created_at
            FROM blog.locations
            WHERE is_published
            ORDER BY name
            ",
        )
        .fetch_all(self.pool)
        .await?;

        Ok(rows.into_iter().map(Location::from).collect())
    }
}
