//! Category page handlers.

use askama::Template;
use askama_web::WebTemplate;
use axum::extract::{Path, Query, State};
use tracing::instrument;

use quill_core::types::Slug;

use crate::db::{CategoryRepository, FeedScope, PostRepository};
use crate::error::AppError;
use crate::filters;
use crate::middleware::OptionalAuth;
use crate::models::CurrentUser;
use crate::pagination::{PAGE_SIZE, Page, Paginator};
use crate::routes::posts::{PageQuery, PostView};
use crate::state::AppState;

/// Category feed template.
#[derive(Template, WebTemplate)]
#[template(path = "blog/category.html")]
pub struct CategoryTemplate {
    pub title: String,
    pub description: String,
    pub posts: Vec<PostView>,
    pub page: Page,
    pub current_user: Option<CurrentUser>,
}

/// Display the feed for one category.
///
/// Unknown slugs, malformed slugs, and hidden categories all 404.
///
/// # Errors
///
/// Returns `AppError::NotFound` if the category doesn't resolve.
#[instrument(skip(state, user))]
pub async fn show(
    State(state): State<AppState>,
    OptionalAuth(user): OptionalAuth,
    Path(slug): Path<String>,
    Query(query): Query<PageQuery>,
) -> Result<CategoryTemplate, AppError> {
    let slug =
        Slug::parse(&slug).map_err(|_| AppError::NotFound(format!("category {slug}")))?;
    let category = CategoryRepository::new(state.pool())
        .get_published_by_slug(&slug)
        .await?
        .ok_or_else(|| AppError::NotFound(format!("category {slug}")))?;

    let posts = PostRepository::new(state.pool());
    let scope = FeedScope::Category(category.id);

    let total = posts.count(&scope).await?;
    let page = Paginator::new(total, PAGE_SIZE).resolve(query.page.as_deref());
    let posts = posts.feed(&scope, page.limit, page.offset).await?;

    Ok(CategoryTemplate {
        title: category.title,
        description: category.description,
        posts: posts.iter().map(PostView::from).collect(),
        page,
        current_user: user,
    })
}
