//! Comment domain model.

use chrono::{DateTime, Utc};
use quill_core::types::{CommentId, PostId};
use serde::Serialize;

use super::post::AuthorRef;

/// A comment attached to a post.
#[derive(Debug, Clone, Serialize)]
pub struct Comment {
    pub id: CommentId,
    pub post_id: PostId,
    pub author: AuthorRef,
    pub text: String,
    pub created_at: DateTime<Utc>,
}
