//! Post repository: feeds, detail lookups, and the editor CRUD.
//!
//! Feed visibility lives here as SQL. The `FeedScope` enum picks the WHERE
//! clause: the public feed and category feeds only show published, dated-in-
//! the-past posts in published categories, while a profile feed shows an
//! owner everything they wrote.

use chrono::{DateTime, Utc};
use sqlx::{FromRow, PgPool};

use quill_core::types::{CategoryId, LocationId, PostId, Slug, UserId, Username};

use super::RepositoryError;
use crate::models::post::{AuthorRef, CategoryRef, LocationRef, Post, Publication};

/// Which slice of posts a feed query returns.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FeedScope {
    /// The front page: every publicly visible post.
    Public,
    /// Publicly visible posts in one category.
    Category(CategoryId),
    /// Posts by one author. Owners see everything they wrote,
    /// everyone else only the publicly visible subset.
    Profile {
        user: UserId,
        viewer_is_owner: bool,
    },
}

/// Fields for creating or fully replacing a post.
#[derive(Debug, Clone)]
pub struct NewPost {
    pub title: String,
    pub text: String,
    pub pub_date: DateTime<Utc>,
    pub is_published: bool,
    pub category_id: Option<CategoryId>,
    pub location_id: Option<LocationId>,
    /// `None` on update means "keep the existing image".
    pub image_path: Option<String>,
}

/// Raw row shape for the post SELECT with its joins.
#[derive(Debug, FromRow)]
struct PostRow {
    id: i32,
    title: String,
    text: String,
    pub_date: DateTime<Utc>,
    is_published: bool,
    created_at: DateTime<Utc>,
    image_path: Option<String>,
    author_id: i32,
    author_username: String,
    category_id: Option<i32>,
    category_title: Option<String>,
    category_slug: Option<String>,
    category_is_published: Option<bool>,
    location_id: Option<i32>,
    location_name: Option<String>,
    comment_count: i64,
}

impl TryFrom<PostRow> for Post {
    type Error = RepositoryError;

    fn try_from(r: PostRow) -> Result<Self, Self::Error> {
        let author_username = Username::parse(&r.author_username).map_err(|e| {
            RepositoryError::DataCorruption(format!("invalid username in database: {e}"))
        })?;

        let category = match (
            r.category_id,
            r.category_title,
            r.category_slug,
            r.category_is_published,
        ) {
            (Some(id), Some(title), Some(slug), Some(is_published)) => {
                let slug = Slug::parse(&slug).map_err(|e| {
                    RepositoryError::DataCorruption(format!("invalid category slug: {e}"))
                })?;
                Some(CategoryRef {
                    id: CategoryId::new(id),
                    title,
                    slug,
                    is_published,
                })
            }
            _ => None,
        };

        let location = match (r.location_id, r.location_name) {
            (Some(id), Some(name)) => Some(LocationRef {
                id: LocationId::new(id),
                name,
            }),
            _ => None,
        };

        Ok(Self {
            id: PostId::new(r.id),
            title: r.title,
            text: r.text,
            pub_date: r.pub_date,
            publication: Publication {
                is_published: r.is_published,
                created_at: r.created_at,
            },
            author: AuthorRef {
                id: UserId::new(r.author_id),
                username: author_username,
            },
            category,
            location,
            image_path: r.image_path,
            comment_count: r.comment_count,
        })
    }
}

/// Shared SELECT for all post queries: author join, optional category and
/// location joins, and a comment count subquery.
const POST_SELECT: &str = r"
    SELECT p.id, p.title, p.text, p.pub_date, p.is_published, p.created_at,
           p.image_path,
           u.id AS author_id, u.username AS author_username,
           c.id AS category_id, c.title AS category_title,
           c.slug AS category_slug, c.is_published AS category_is_published,
           l.id AS location_id, l.name AS location_name,
           (SELECT COUNT(*) FROM blog.comments cm WHERE cm.post_id = p.id)
               AS comment_count
    FROM blog.posts p
    JOIN blog.users u ON u.id = p.author_id
    LEFT JOIN blog.categories c ON c.id = p.category_id
    LEFT JOIN blog.locations l ON l.id = p.location_id
";

impl FeedScope {
    /// WHERE clause for this scope. Scopes that take a parameter bind it as `$1`.
    const fn where_clause(&self) -> &'static str {
        match self {
            Self::Public => {
                "WHERE p.is_published AND c.is_published AND p.pub_date <= NOW()"
            }
            Self::Category(_) => {
                "WHERE p.is_published AND p.category_id = $1 AND p.pub_date <= NOW()"
            }
            Self::Profile {
                viewer_is_owner: true,
                ..
            } => "WHERE p.author_id = $1",
            Self::Profile {
                viewer_is_owner: false,
                ..
            } => {
                "WHERE p.author_id = $1 AND p.is_published \
                 AND c.is_published AND p.pub_date <= NOW()"
            }
        }
    }

    const fn bind_param(&self) -> Option<i32> {
        match self {
            Self::Public => None,
            Self::Category(id) => Some(id.as_i32()),
            Self::Profile { user, .. } => Some(user.as_i32()),
        }
    }
}

/// Repository for post database operations.
pub struct PostRepository<'a> {
    pool: &'a PgPool,
}

impl<'a> PostRepository<'a> {
    /// Create a new post repository.
    #[must_use]
    pub const fn new(pool: &'a PgPool) -> Self {
        Self { pool }
    }

    /// Count the posts a feed scope would return.
    ///
    /// # Errors
    ///
    /// Returns `RepositoryError::Database` if the query fails.
    pub async fn count(&self, scope: &FeedScope) -> Result<i64, RepositoryError> {
        let sql = format!(
            "SELECT COUNT(*) FROM blog.posts p \
             LEFT JOIN blog.categories c ON c.id = p.category_id \
             {}",
            scope.where_clause()
        );

        let mut query = sqlx::query_scalar::<_, i64>(&sql);
        if let Some(param) = scope.bind_param() {
            query = query.bind(param);
        }

        Ok(query.fetch_one(self.pool).await?)
    }

    /// Fetch one page of a feed, newest first.
    ///
    /// # Errors
    ///
    /// Returns `RepositoryError::Database` if the query fails.
    /// Returns `RepositoryError::DataCorruption` if joined data is invalid.
    pub async fn feed(
        &self,
        scope: &FeedScope,
        limit: i64,
        offset: i64,
    ) -> Result<Vec<Post>, RepositoryError> {
        // LIMIT/OFFSET binds come after the optional scope parameter
        let (limit_param, offset_param) = if scope.bind_param().is_some() {
            ("$2", "$3")
        } else {
            ("$1", "$2")
        };
        let sql = format!(
            "{POST_SELECT} {} ORDER BY p.pub_date DESC, p.id DESC \
             LIMIT {limit_param} OFFSET {offset_param}",
            scope.where_clause()
        );

        let mut query = sqlx::query_as::<_, PostRow>(&sql);
        if let Some(param) = scope.bind_param() {
            query = query.bind(param);
        }
        let rows = query.bind(limit).bind(offset).fetch_all(self.pool).await?;

        rows.into_iter().map(Post::try_from).collect()
    }

    /// Get a single post by ID with all joined metadata.
    ///
    /// Visibility is not checked here; callers decide who may see the post.
    ///
    /// # Errors
    ///
    /// Returns `RepositoryError::Database` if the query fails.
    /// Returns `RepositoryError::DataCorruption` if joined data is invalid.
    pub async fn get(&self, id: PostId) -> Result<Option<Post>, RepositoryError> {
        let sql = format!("{POST_SELECT} WHERE p.id = $1");

        let row = sqlx::query_as::<_, PostRow>(&sql)
            .bind(id.as_i32())
            .fetch_optional(self.pool)
            .await?;

        row.map(Post::try_from).transpose()
    }

    /// Create a post and return its new ID.
    ///
    /// # Errors
    ///
    /// Returns `RepositoryError::Database` if the insert fails.
    pub async fn create(&self, author: UserId, post: &NewPost) -> Result<PostId, RepositoryError> {
        let id = sqlx::query_scalar::<_, i32>(
            r"
            INSERT INTO blog.posts
                (title, text, pub_date, is_published, author_id,
                 category_id, location_id, image_path)
            VALUES ($1, $2, $3, $4, $5, $6, $7, $8)
            RETURNING id
            ",
        )
        .bind(&post.title)
        .bind(&post.text)
        .bind(post.pub_date)
        .bind(post.is_published)
        .bind(author.as_i32())
        .bind(post.category_id.map(|c| c.as_i32()))
        .bind(post.location_id.map(|l| l.as_i32()))
        .bind(post.image_path.as_deref())
        .fetch_one(self.pool)
        .await?;

        Ok(PostId::new(id))
    }

    /// Replace a post's editable fields.
    ///
    /// A `None` image keeps the one already stored.
    ///
    /// # Errors
    ///
    /// Returns `RepositoryError::NotFound` if the post doesn't exist.
    /// Returns `RepositoryError::Database` for other database errors.
    pub async fn update(&self, id: PostId, post: &NewPost) -> Result<(), RepositoryError> {
        let result = sqlx::query(
            r"
            UPDATE blog.posts
            SET title = $1, text = $2, pub_date = $3, is_published = $4,
                category_id = $5, location_id = $6,
                image_path = COALESCE($7, image_path)
            WHERE id = $8
            ",
        )
        .bind(&post.title)
        .bind(&post.text)
        .bind(post.pub_date)
        .bind(post.is_published)
        .bind(post.category_id.map(|c| c.as_i32()))
        .bind(post.location_id.map(|l| l.as_i32()))
        .bind(post.image_path.as_deref())
        .bind(id.as_i32())
        .execute(self.pool)
        .await?;

        if result.rows_affected() == 0 {
            return Err(RepositoryError::NotFound);
        }

        Ok(())
    }

    /// Delete a post. Comments go with it via ON DELETE CASCADE.
    ///
    /// # Errors
    ///
    /// Returns `RepositoryError::NotFound` if the post doesn't exist.
    /// Returns `RepositoryError::Database` for other database errors.
    pub async fn delete(&self, id: PostId) -> Result<(), RepositoryError> {
        let result = sqlx::query("DELETE FROM blog.posts WHERE id = $1")
            .bind(id.as_i32())
            .execute(self.pool)
            .await?;

        if result.rows_affected() == 0 {
            return Err(RepositoryError::NotFound);
        }

        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_public_scope_requires_published_category() {
        let clause = FeedScope::Public.where_clause();
        assert!(clause.contains("p.is_published"));
        assert!(clause.contains("c.is_published"));
        assert!(clause.contains("p.pub_date <= NOW()"));
    }

    #[test]
    fn test_owner_profile_scope_is_unfiltered() {
        let scope = FeedScope::Profile {
            user: UserId::new(1),
            viewer_is_owner: true,
        };
        assert_eq!(scope.where_clause(), "WHERE p.author_id = $1");
    }

    #[test]
    fn test_visitor_profile_scope_applies_public_filter() {
        let scope = FeedScope::Profile {
            user: UserId::new(1),
            viewer_is_owner: false,
        };
        let clause = scope.where_clause();
        assert!(clause.contains("p.author_id = $1"));
        assert!(clause.contains("c.is_published"));
    }

    #[test]
    fn test_scope_bind_params() {
        assert_eq!(FeedScope::Public.bind_param(), None);
        assert_eq!(
            FeedScope::Category(CategoryId::new(7)).bind_param(),
            Some(7)
        );
        let scope = FeedScope::Profile {
            user: UserId::new(3),
            viewer_is_owner: false,
        };
        assert_eq!(scope.bind_param(), Some(3));
    }
}
