//! Comment repository for database operations.

use chrono::{DateTime, Utc};
use sqlx::{FromRow, PgPool};

use quill_core::types::{CommentId, PostId, UserId, Username};

use super::RepositoryError;
use crate::models::comment::Comment;
use crate::models::post::AuthorRef;

#[derive(Debug, FromRow)]
struct CommentRow {
    id: i32,
    post_id: i32,
    text: String,
    created_at: DateTime<Utc>,
    author_id: i32,
    author_username: String,
}

impl TryFrom<CommentRow> for Comment {
    type Error = RepositoryError;

    fn try_from(r: CommentRow) -> Result<Self, Self::Error> {
        let username = Username::parse(&r.author_username).map_err(|e| {
            RepositoryError::DataCorruption(format!("invalid username in database: {e}"))
        })?;

        Ok(Self {
            id: CommentId::new(r.id),
            post_id: PostId::new(r.post_id),
            author: AuthorRef {
                id: UserId::new(r.author_id),
                username,
            },
            text: r.text,
            created_at: r.created_at,
        })
    }
}

const COMMENT_SELECT: &str = r"
    SELECT cm.id, cm.post_id, cm.text, cm.created_at,
           u.id AS author_id, u.username AS author_username
    FROM blog.comments cm
    JOIN blog.users u ON u.id = cm.author_id
";

/// Repository for comment database operations.
pub struct CommentRepository<'a> {
    pool: &'a PgPool,
}

impl<'a> CommentRepository<'a> {
    /// Create a new comment repository.
    #[must_use]
    pub const fn new(pool: &'a PgPool) -> Self {
        Self { pool }
    }

    /// List a post's comments, oldest first.
    ///
    /// # Errors
    ///
    /// Returns `RepositoryError::Database` if the query fails.
    /// Returns `RepositoryError::DataCorruption` if stored data is invalid.
    pub async fn list_for_post(&self, post_id: PostId) -> Result<Vec<Comment>, RepositoryError> {
        let sql = format!(
            "{COMMENT_SELECT} WHERE cm.post_id = $1 ORDER BY cm.created_at ASC, cm.id ASC"
        );
        let rows = sqlx::query_as::<_, CommentRow>(&sql)
            .bind(post_id.as_i32())
            .fetch_all(self.pool)
            .await?;

        rows.into_iter().map(Comment::try_from).collect()
    }

    /// Get a single comment by ID.
    ///
    /// # Errors
    ///
    /// Returns `RepositoryError::Database` if the query fails.
    /// Returns `RepositoryError::DataCorruption` if stored data is invalid.
    pub async fn get(&self, id: CommentId) -> Result<Option<Comment>, RepositoryError> {
        let sql = format!("{COMMENT_SELECT} WHERE cm.id = $1");
        let row = sqlx::query_as::<_, CommentRow>(&sql)
            .bind(id.as_i32())
            .fetch_optional(self.pool)
            .await?;

        row.map(Comment::try_from).transpose()
    }

    /// Add a comment to a post.
    ///
    /// # Errors
    ///
    /// Returns `RepositoryError::Database` if the insert fails.
    /// Returns `RepositoryError::DataCorruption` if stored data is invalid.
    pub async fn create(
        &self,
        post_id: PostId,
        author: UserId,
        text: &str,
    ) -> Result<Comment, RepositoryError> {
        let id = sqlx::query_scalar::<_, i32>(
            r"
            INSERT INTO blog.comments (post_id, author_id, text)
            VALUES ($1, $2, $3)
            RETURNING id
            ",
        )
        .bind(post_id.as_i32())
        .bind(author.as_i32())
        .bind(text)
        .fetch_one(self.pool)
        .await?;

        match self.get(CommentId::new(id)).await? {
            Some(comment) => Ok(comment),
            None => Err(RepositoryError::DataCorruption(
                "comment vanished after insert".to_owned(),
            )),
        }
    }

    /// Replace a comment's text.
    ///
    /// # Errors
    ///
    /// Returns `RepositoryError::NotFound` if the comment doesn't exist.
    /// Returns `RepositoryError::Database` for other database errors.
    pub async fn update_text(&self, id: CommentId, text: &str) -> Result<(), RepositoryError> {
        let result = sqlx::query("UPDATE blog.comments SET text = $1 WHERE id = $2")
            .bind(text)
            .bind(id.as_i32())
            .execute(self.pool)
            .await?;

        if result.rows_affected() == 0 {
            return Err(RepositoryError::NotFound);
        }

        Ok(())
    }

    /// Delete a comment.
    ///
    /// # Errors
    ///
    /// Returns `RepositoryError::NotFound` if the comment doesn't exist.
    /// Returns `RepositoryError::Database` for other database errors.
    pub async fn delete(&self, id: CommentId) -> Result<(), RepositoryError> {
        let result = sqlx::query("DELETE FROM blog.comments WHERE id = $1")
            .bind(id.as_i32())
            .execute(self.pool)
            .await?;

        if result.rows_affected() == 0 {
            return Err(RepositoryError::NotFound);
        }

        Ok(())
    }
}
