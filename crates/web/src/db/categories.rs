//! Category repository for database operations.

use chrono::{DateTime, Utc};
use sqlx::{FromRow, PgPool};

use quill_core::types::{CategoryId, Slug};

use super::RepositoryError;
use crate::models::category::Category;
use crate::models::post::Publication;

#[derive(Debug, FromRow)]
struct CategoryRow {
    id: i32,
    title: String,
    description: String,
    slug: String,
    is_published: bool,
    created_at: DateTime<Utc>,
}

impl TryFrom<CategoryRow> for Category {
    type Error = RepositoryError;

    fn try_from(r: CategoryRow) -> Result<Self, Self::Error> {
        let slug = Slug::parse(&r.slug).map_err(|e| {
            RepositoryError::DataCorruption(format!("invalid category slug in database: {e}"))
        })?;

        Ok(Self {
            id: CategoryId::new(r.id),
            title: r.title,
            description: r.description,
            slug,
            publication: Publication {
                is_published: r.is_published,
                created_at: r.created_at,
            },
        })
    }
}

const CATEGORY_SELECT: &str =
    "SELECT id, title, description, slug, is_published, created_at FROM blog.categories";

/// Repository for category database operations.
pub struct CategoryRepository<'a> {
    pool: &'a PgPool,
}

impl<'a> CategoryRepository<'a> {
    /// Create a new category repository.
    #[must_use]
    pub const fn new(pool: &'a PgPool) -> Self {
        Self { pool }
    }

    /// Resolve a published category by slug. Hidden categories resolve to `None`.
    ///
    /// # Errors
    ///
    /// Returns `RepositoryError::Database` if the query fails.
    /// Returns `RepositoryError::DataCorruption` if stored data is invalid.
    pub async fn get_published_by_slug(
        &self,
        slug: &Slug,
    ) -> Result<Option<Category>, RepositoryError> {
        let sql = format!("{CATEGORY_SELECT} WHERE slug = $1 AND is_published");
        let row = sqlx::query_as::<_, CategoryRow>(&sql)
            .bind(slug.as_str())
            .fetch_optional(self.pool)
            .await?;

        row.map(Category::try_from).transpose()
    }

    /// List published categories for the post editor dropdown.
    ///
    /// # Errors
    ///
    /// Returns `RepositoryError::Database` if the query fails.
    /// Returns `RepositoryError::DataCorruption` if stored data is invalid.
    pub async fn list_published(&self) -> Result<Vec<Category>, RepositoryError> {
        let sql = format!("{CATEGORY_SELECT} WHERE is_published ORDER BY title");
        let rows = sqlx::query_as::<_, CategoryRow>(&sql)
            .fetch_all(self.pool)
            .await?;

        rows.into_iter().map(Category::try_from).collect()
    }
}
