//! Post domain model and the public-visibility rule.

use chrono::{DateTime, Utc};
use quill_core::types::{CategoryId, LocationId, PostId, Slug, UserId, Username};
use serde::Serialize;

/// Publication bookkeeping shared by posts, categories, and locations.
#[derive(Debug, Clone, Serialize)]
pub struct Publication {
    pub is_published: bool,
    pub created_at: DateTime<Utc>,
}

/// Minimal author view joined into posts and comments.
#[derive(Debug, Clone, Serialize)]
pub struct AuthorRef {
    pub id: UserId,
    pub username: Username,
}

/// Category data joined into a post.
#[derive(Debug, Clone, Serialize)]
pub struct CategoryRef {
    pub id: CategoryId,
    pub title: String,
    pub slug: Slug,
    pub is_published: bool,
}

/// Location data joined into a post.
#[derive(Debug, Clone, Serialize)]
pub struct LocationRef {
    pub id: LocationId,
    pub name: String,
}

/// A blog post with its joined metadata.
#[derive(Debug, Clone, Serialize)]
pub struct Post {
    pub id: PostId,
    pub title: String,
    pub text: String,
    pub pub_date: DateTime<Utc>,
    pub publication: Publication,
    pub author: AuthorRef,
    pub category: Option<CategoryRef>,
    pub location: Option<LocationRef>,
    pub image_path: Option<String>,
    pub comment_count: i64,
}

impl Post {
    /// Whether this post is visible to readers other than its author.
    ///
    /// A post is public when it is published, belongs to a published
    /// category, and its publication date is not in the future. A post
    /// without a category is never public.
    #[must_use]
    pub fn is_publicly_visible(&self, now: DateTime<Utc>) -> bool {
        self.publication.is_published
            && self.category.as_ref().is_some_and(|c| c.is_published)
            && self.pub_date <= now
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;
    use chrono::TimeZone;

    fn sample_post(
        is_published: bool,
        category_published: Option<bool>,
        pub_date: DateTime<Utc>,
    ) -> Post {
        Post {
            id: PostId::new(1),
            title: "Title".to_string(),
            text: "Body".to_string(),
            pub_date,
            publication: Publication {
                is_published,
                created_at: Utc.with_ymd_and_hms(2024, 1, 1, 0, 0, 0).unwrap(),
            },
            author: AuthorRef {
                id: UserId::new(1),
                username: Username::parse("author").unwrap(),
            },
            category: category_published.map(|is_published| CategoryRef {
                id: CategoryId::new(1),
                title: "Travel".to_string(),
                slug: Slug::parse("travel").unwrap(),
                is_published,
            }),
            location: None,
            image_path: None,
            comment_count: 0,
        }
    }

    fn now() -> DateTime<Utc> {
        Utc.with_ymd_and_hms(2024, 6, 1, 12, 0, 0).unwrap()
    }

    fn past() -> DateTime<Utc> {
        Utc.with_ymd_and_hms(2024, 5, 1, 0, 0, 0).unwrap()
    }

    #[test]
    fn test_published_post_in_published_category_is_visible() {
        let post = sample_post(true, Some(true), past());
        assert!(post.is_publicly_visible(now()));
    }

    #[test]
    fn test_unpublished_post_is_hidden() {
        let post = sample_post(false, Some(true), past());
        assert!(!post.is_publicly_visible(now()));
    }

    #[test]
    fn test_post_in_hidden_category_is_hidden() {
        let post = sample_post(true, Some(false), past());
        assert!(!post.is_publicly_visible(now()));
    }

    #[test]
    fn test_post_without_category_is_hidden() {
        let post = sample_post(true, None, past());
        assert!(!post.is_publicly_visible(now()));
    }

    #[test]
    fn test_future_post_is_hidden() {
        let future = Utc.with_ymd_and_hms(2024, 7, 1, 0, 0, 0).unwrap();
        let post = sample_post(true, Some(true), future);
        assert!(!post.is_publicly_visible(now()));
    }

    #[test]
    fn test_post_dated_exactly_now_is_visible() {
        let post = sample_post(true, Some(true), now());
        assert!(post.is_publicly_visible(now()));
    }
}
