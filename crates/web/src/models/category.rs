//! Category domain model.

use quill_core::types::{CategoryId, Slug};
use serde::Serialize;

use super::post::Publication;

/// A topic grouping for posts, addressed by slug.
#[derive(Debug, Clone, Serialize)]
pub struct Category {
    pub id: CategoryId,
    pub title: String,
    pub description: String,
    pub slug: Slug,
    pub publication: Publication,
}
