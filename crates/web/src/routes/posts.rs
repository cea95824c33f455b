//! Post route handlers: the front-page feed, post detail, and the editor.

use askama::Template;
use askama_web::WebTemplate;
use axum::{
    extract::{Multipart, Path, Query, State},
    response::{IntoResponse, Redirect, Response},
};
use chrono::Utc;
use serde::Deserialize;
use tracing::instrument;

use quill_core::types::PostId;

use crate::db::{
    CategoryRepository, CommentRepository, FeedScope, LocationRepository, NewPost, PostRepository,
};
use crate::error::AppError;
use crate::filters;
use crate::forms::{FieldError, ImageUpload, PostFormInput};
use crate::middleware::{OptionalAuth, RequireAuth};
use crate::models::{Comment, CurrentUser, Post};
use crate::pagination::{PAGE_SIZE, Page, Paginator};
use crate::routes::guards;
use crate::state::AppState;

/// Query parameter for feed pagination. Kept as a raw string so bad input
/// can fall back to page 1 instead of rejecting the request.
#[derive(Debug, Deserialize)]
pub struct PageQuery {
    pub page: Option<String>,
}

/// Query parameters for error display after a redirect.
#[derive(Debug, Deserialize)]
pub struct MessageQuery {
    pub error: Option<String>,
}

// =============================================================================
// View Types
// =============================================================================

/// Category link rendered on post cards.
#[derive(Clone)]
pub struct CategoryLink {
    pub title: String,
    pub slug: String,
}

/// Post view for templates.
#[derive(Clone)]
pub struct PostView {
    pub id: i32,
    pub title: String,
    pub text: String,
    pub pub_date: chrono::DateTime<Utc>,
    pub author_id: i32,
    pub author_username: String,
    pub is_published: bool,
    pub category: Option<CategoryLink>,
    pub location_name: Option<String>,
    pub image_path: Option<String>,
    pub comment_count: i64,
}

impl From<&Post> for PostView {
    fn from(post: &Post) -> Self {
        Self {
            id: post.id.as_i32(),
            title: post.title.clone(),
            text: post.text.clone(),
            pub_date: post.pub_date,
            author_id: post.author.id.as_i32(),
            author_username: post.author.username.to_string(),
            is_published: post.publication.is_published,
            category: post.category.as_ref().map(|c| CategoryLink {
                title: c.title.clone(),
                slug: c.slug.to_string(),
            }),
            location_name: post.location.as_ref().map(|l| l.name.clone()),
            image_path: post.image_path.clone(),
            comment_count: post.comment_count,
        }
    }
}

/// Comment view for the detail page.
#[derive(Clone)]
pub struct CommentView {
    pub id: i32,
    pub author_id: i32,
    pub author_username: String,
    pub text: String,
    pub created_at: chrono::DateTime<Utc>,
}

impl From<&Comment> for CommentView {
    fn from(comment: &Comment) -> Self {
        Self {
            id: comment.id.as_i32(),
            author_id: comment.author.id.as_i32(),
            author_username: comment.author.username.to_string(),
            text: comment.text.clone(),
            created_at: comment.created_at,
        }
    }
}

// =============================================================================
// Templates
// =============================================================================

/// Front page feed template.
#[derive(Template, WebTemplate)]
#[template(path = "blog/index.html")]
pub struct IndexTemplate {
    pub posts: Vec<PostView>,
    pub page: Page,
    pub current_user: Option<CurrentUser>,
}

/// Post detail template.
#[derive(Template, WebTemplate)]
#[template(path = "blog/detail.html")]
pub struct DetailTemplate {
    pub post: PostView,
    pub comments: Vec<CommentView>,
    pub is_owner: bool,
    pub current_user: Option<CurrentUser>,
    pub comment_error: Option<String>,
}

/// Option rendered in the editor's category dropdown.
#[derive(Clone)]
pub struct CategoryOption {
    pub id: i32,
    pub title: String,
}

/// Option rendered in the editor's location dropdown.
#[derive(Clone)]
pub struct LocationOption {
    pub id: i32,
    pub name: String,
}

/// Editable field values echoed back into the editor form.
#[derive(Clone, Default)]
pub struct EditorForm {
    pub title: String,
    pub text: String,
    pub pub_date: String,
    pub is_published: bool,
    pub category_id: Option<i32>,
    pub location_id: Option<i32>,
}

impl EditorForm {
    /// Whether the given category should be pre-selected in the dropdown.
    #[must_use]
    pub fn category_selected(&self, id: i32) -> bool {
        self.category_id == Some(id)
    }

    /// Whether the given location should be pre-selected in the dropdown.
    #[must_use]
    pub fn location_selected(&self, id: i32) -> bool {
        self.location_id == Some(id)
    }
}

impl From<&PostFormInput> for EditorForm {
    fn from(input: &PostFormInput) -> Self {
        Self {
            title: input.title.clone(),
            text: input.text.clone(),
            pub_date: input.pub_date.clone(),
            is_published: input.is_published,
            category_id: input.category_id,
            location_id: input.location_id,
        }
    }
}

/// Post editor template, shared by create and edit.
#[derive(Template, WebTemplate)]
#[template(path = "blog/editor.html")]
pub struct EditorTemplate {
    pub heading: String,
    pub action: String,
    pub form: EditorForm,
    pub categories: Vec<CategoryOption>,
    pub locations: Vec<LocationOption>,
    pub errors: Vec<FieldError>,
    pub current_image: Option<String>,
    pub current_user: Option<CurrentUser>,
}

/// Post deletion confirmation template.
#[derive(Template, WebTemplate)]
#[template(path = "blog/confirm_delete.html")]
pub struct ConfirmDeleteTemplate {
    pub post: PostView,
    pub current_user: Option<CurrentUser>,
}

// =============================================================================
// Feed and Detail
// =============================================================================

/// Display the public front-page feed.
///
/// # Errors
///
/// Returns `AppError::Database` if a query fails.
#[instrument(skip(state, user))]
pub async fn index(
    State(state): State<AppState>,
    OptionalAuth(user): OptionalAuth,
    Query(query): Query<PageQuery>,
) -> Result<IndexTemplate, AppError> {
    let posts = PostRepository::new(state.pool());
    let scope = FeedScope::Public;

    let total = posts.count(&scope).await?;
    let page = Paginator::new(total, PAGE_SIZE).resolve(query.page.as_deref());
    let posts = posts.feed(&scope, page.limit, page.offset).await?;

    Ok(IndexTemplate {
        posts: posts.iter().map(PostView::from).collect(),
        page,
        current_user: user,
    })
}

/// Display a single post with its comments.
///
/// Hidden posts (unpublished, future-dated, uncategorized, or in a hidden
/// category) 404 for everyone except their author.
///
/// # Errors
///
/// Returns `AppError::NotFound` if the post doesn't exist or isn't visible.
#[instrument(skip(state, user))]
pub async fn show(
    State(state): State<AppState>,
    OptionalAuth(user): OptionalAuth,
    Path(id): Path<i32>,
    Query(query): Query<MessageQuery>,
) -> Result<DetailTemplate, AppError> {
    let post_id = PostId::new(id);
    let post = PostRepository::new(state.pool())
        .get(post_id)
        .await?
        .ok_or_else(|| AppError::NotFound(format!("post {id}")))?;

    let is_owner = user.as_ref().is_some_and(|u| u.id == post.author.id);
    if !is_owner && !post.is_publicly_visible(Utc::now()) {
        return Err(AppError::NotFound(format!("post {id}")));
    }

    let comments = CommentRepository::new(state.pool())
        .list_for_post(post_id)
        .await?;

    Ok(DetailTemplate {
        post: PostView::from(&post),
        comments: comments.iter().map(CommentView::from).collect(),
        is_owner,
        current_user: user,
        comment_error: query.error,
    })
}

// =============================================================================
// Editor
// =============================================================================

/// Load the dropdown options for the editor.
async fn editor_options(
    state: &AppState,
) -> Result<(Vec<CategoryOption>, Vec<LocationOption>), AppError> {
    let categories = CategoryRepository::new(state.pool())
        .list_published()
        .await?
        .into_iter()
        .map(|c| CategoryOption {
            id: c.id.as_i32(),
            title: c.title,
        })
        .collect();
    let locations = LocationRepository::new(state.pool())
        .list_published()
        .await?
        .into_iter()
        .map(|l| LocationOption {
            id: l.id.as_i32(),
            name: l.name,
        })
        .collect();

    Ok((categories, locations))
}

/// Display the new-post editor.
///
/// # Errors
///
/// Returns `AppError::Database` if loading dropdown options fails.
#[instrument(skip(state, user))]
pub async fn new_form(
    State(state): State<AppState>,
    RequireAuth(user): RequireAuth,
) -> Result<EditorTemplate, AppError> {
    let (categories, locations) = editor_options(&state).await?;

    Ok(EditorTemplate {
        heading: "New post".to_string(),
        action: "/posts/new".to_string(),
        form: EditorForm {
            pub_date: Utc::now().format("%Y-%m-%dT%H:%M").to_string(),
            is_published: true,
            ..EditorForm::default()
        },
        categories,
        locations,
        errors: Vec::new(),
        current_image: None,
        current_user: Some(user),
    })
}

/// Handle new-post form submission.
///
/// # Errors
///
/// Returns `AppError::BadRequest` if the multipart body is malformed.
#[instrument(skip(state, user, multipart))]
pub async fn create(
    State(state): State<AppState>,
    RequireAuth(user): RequireAuth,
    multipart: Multipart,
) -> Result<Response, AppError> {
    let input = read_post_form(multipart).await?;

    let validated = match input.validate() {
        Ok(v) => v,
        Err(errors) => {
            let (categories, locations) = editor_options(&state).await?;
            return Ok(EditorTemplate {
                heading: "New post".to_string(),
                action: "/posts/new".to_string(),
                form: EditorForm::from(&input),
                categories,
                locations,
                errors,
                current_image: None,
                current_user: Some(user),
            }
            .into_response());
        }
    };

    let image_path = store_image(&state, input.image.as_ref()).await?;

    let new_post = NewPost {
        title: validated.title,
        text: validated.text,
        pub_date: validated.pub_date,
        is_published: validated.is_published,
        category_id: validated.category_id,
        location_id: validated.location_id,
        image_path,
    };
    let post_id = PostRepository::new(state.pool())
        .create(user.id, &new_post)
        .await?;

    tracing::info!(post_id = %post_id, author = %user.username, "Post created");

    Ok(Redirect::to(&format!("/profile/{}", user.username)).into_response())
}

/// Display the edit editor pre-filled with a post's current values.
///
/// # Errors
///
/// Returns `AppError::NotFound` if the post doesn't exist.
#[instrument(skip(state, user))]
pub async fn edit_form(
    State(state): State<AppState>,
    RequireAuth(user): RequireAuth,
    Path(id): Path<i32>,
) -> Result<Response, AppError> {
    let post_id = PostId::new(id);
    let post = PostRepository::new(state.pool())
        .get(post_id)
        .await?
        .ok_or_else(|| AppError::NotFound(format!("post {id}")))?;

    if let Err(denied) = guards::require_author(post.author.id, user.id, post.id) {
        return Ok(denied.into_response());
    }

    let (categories, locations) = editor_options(&state).await?;

    Ok(EditorTemplate {
        heading: "Edit post".to_string(),
        action: format!("/posts/{id}/edit"),
        form: EditorForm {
            title: post.title.clone(),
            text: post.text.clone(),
            pub_date: post.pub_date.format("%Y-%m-%dT%H:%M").to_string(),
            is_published: post.publication.is_published,
            category_id: post.category.as_ref().map(|c| c.id.as_i32()),
            location_id: post.location.as_ref().map(|l| l.id.as_i32()),
        },
        categories,
        locations,
        errors: Vec::new(),
        current_image: post.image_path.clone(),
        current_user: Some(user),
    }
    .into_response())
}

/// Handle edit form submission.
///
/// # Errors
///
/// Returns `AppError::NotFound` if the post doesn't exist.
/// Returns `AppError::BadRequest` if the multipart body is malformed.
#[instrument(skip(state, user, multipart))]
pub async fn update(
    State(state): State<AppState>,
    RequireAuth(user): RequireAuth,
    Path(id): Path<i32>,
    multipart: Multipart,
) -> Result<Response, AppError> {
    let post_id = PostId::new(id);
    let posts = PostRepository::new(state.pool());
    let post = posts
        .get(post_id)
        .await?
        .ok_or_else(|| AppError::NotFound(format!("post {id}")))?;

    if let Err(denied) = guards::require_author(post.author.id, user.id, post.id) {
        return Ok(denied.into_response());
    }

    let input = read_post_form(multipart).await?;

    let validated = match input.validate() {
        Ok(v) => v,
        Err(errors) => {
            let (categories, locations) = editor_options(&state).await?;
            return Ok(EditorTemplate {
                heading: "Edit post".to_string(),
                action: format!("/posts/{id}/edit"),
                form: EditorForm::from(&input),
                categories,
                locations,
                errors,
                current_image: post.image_path.clone(),
                current_user: Some(user),
            }
            .into_response());
        }
    };

    // None keeps the stored image
    let image_path = store_image(&state, input.image.as_ref()).await?;

    posts
        .update(
            post_id,
            &NewPost {
                title: validated.title,
                text: validated.text,
                pub_date: validated.pub_date,
                is_published: validated.is_published,
                category_id: validated.category_id,
                location_id: validated.location_id,
                image_path,
            },
        )
        .await?;

    Ok(Redirect::to(&format!("/posts/{id}")).into_response())
}

/// Display the delete confirmation page.
///
/// # Errors
///
/// Returns `AppError::NotFound` if the post doesn't exist.
#[instrument(skip(state, user))]
pub async fn confirm_delete(
    State(state): State<AppState>,
    RequireAuth(user): RequireAuth,
    Path(id): Path<i32>,
) -> Result<Response, AppError> {
    let post = PostRepository::new(state.pool())
        .get(PostId::new(id))
        .await?
        .ok_or_else(|| AppError::NotFound(format!("post {id}")))?;

    if let Err(denied) = guards::require_author(post.author.id, user.id, post.id) {
        return Ok(denied.into_response());
    }

    Ok(ConfirmDeleteTemplate {
        post: PostView::from(&post),
        current_user: Some(user),
    }
    .into_response())
}

/// Handle post deletion.
///
/// # Errors
///
/// Returns `AppError::NotFound` if the post doesn't exist.
#[instrument(skip(state, user))]
pub async fn delete(
    State(state): State<AppState>,
    RequireAuth(user): RequireAuth,
    Path(id): Path<i32>,
) -> Result<Response, AppError> {
    let post_id = PostId::new(id);
    let posts = PostRepository::new(state.pool());
    let post = posts
        .get(post_id)
        .await?
        .ok_or_else(|| AppError::NotFound(format!("post {id}")))?;

    if let Err(denied) = guards::require_author(post.author.id, user.id, post.id) {
        return Ok(denied.into_response());
    }

    posts.delete(post_id).await?;
    tracing::info!(post_id = %post_id, author = %user.username, "Post deleted");

    Ok(Redirect::to(&format!("/profile/{}", user.username)).into_response())
}

// =============================================================================
// Multipart Helpers
// =============================================================================

/// Assemble a `PostFormInput` from the editor's multipart body.
async fn read_post_form(mut multipart: Multipart) -> Result<PostFormInput, AppError> {
    let mut input = PostFormInput::default();

    while let Some(field) = multipart
        .next_field()
        .await
        .map_err(|e| AppError::BadRequest(format!("invalid form data: {e}")))?
    {
        let Some(name) = field.name().map(ToOwned::to_owned) else {
            continue;
        };

        if name == "image" {
            let file_name = field.file_name().map(ToOwned::to_owned);
            let data = field
                .bytes()
                .await
                .map_err(|e| AppError::BadRequest(format!("invalid upload: {e}")))?;
            // Browsers submit an empty file part when nothing was picked
            if let Some(file_name) = file_name
                && !file_name.is_empty()
                && !data.is_empty()
            {
                input.image = Some(ImageUpload {
                    file_name,
                    data: data.to_vec(),
                });
            }
            continue;
        }

        let value = field
            .text()
            .await
            .map_err(|e| AppError::BadRequest(format!("invalid form data: {e}")))?;

        match name.as_str() {
            "title" => input.title = value,
            "text" => input.text = value,
            "pub_date" => input.pub_date = value,
            "is_published" => input.is_published = value == "on" || value == "true",
            "category_id" => input.category_id = value.parse().ok(),
            "location_id" => input.location_id = value.parse().ok(),
            _ => {}
        }
    }

    Ok(input)
}

/// Store an uploaded image, if any, returning its media-relative path.
async fn store_image(
    state: &AppState,
    image: Option<&ImageUpload>,
) -> Result<Option<String>, AppError> {
    let Some(image) = image else {
        return Ok(None);
    };

    let path = state
        .media()
        .save_image(&image.file_name, &image.data)
        .await
        .map_err(|e| match e {
            crate::services::media::MediaError::UnsupportedType(name) => {
                AppError::BadRequest(format!("unsupported image type: {name}"))
            }
            crate::services::media::MediaError::Io(e) => {
                AppError::Internal(format!("failed to store upload: {e}"))
            }
        })?;

    Ok(Some(path))
}
