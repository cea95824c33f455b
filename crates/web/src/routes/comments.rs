//! Comment route handlers.
//!
//! Comments are created from the post detail page and edited or deleted on
//! their own small pages. Only the comment's author may change it; everyone
//! else is bounced back to the post.

use askama::Template;
use askama_web::WebTemplate;
use axum::{
    Form,
    extract::{Path, State},
    response::{IntoResponse, Redirect, Response},
};
use tracing::instrument;

use quill_core::types::{CommentId, PostId};

use crate::db::{CommentRepository, PostRepository};
use crate::error::AppError;
use crate::filters;
use crate::forms::CommentFormData;
use crate::middleware::RequireAuth;
use crate::models::CurrentUser;
use crate::routes::guards;
use crate::routes::posts::CommentView;
use crate::state::AppState;

// =============================================================================
// Templates
// =============================================================================

/// Comment edit page template.
#[derive(Template, WebTemplate)]
#[template(path = "blog/comment_edit.html")]
pub struct CommentEditTemplate {
    pub comment: CommentView,
    pub post_id: i32,
    pub error: Option<String>,
    pub current_user: Option<CurrentUser>,
}

/// Comment deletion confirmation template.
#[derive(Template, WebTemplate)]
#[template(path = "blog/comment_confirm_delete.html")]
pub struct CommentConfirmDeleteTemplate {
    pub comment: CommentView,
    pub post_id: i32,
    pub current_user: Option<CurrentUser>,
}

// =============================================================================
// Handlers
// =============================================================================

/// Add a comment to a post.
///
/// Invalid input redirects back to the detail page with an error message
/// rather than rendering a separate form page.
///
/// # Errors
///
/// Returns `AppError::NotFound` if the post doesn't exist.
#[instrument(skip(state, user, form))]
pub async fn create(
    State(state): State<AppState>,
    RequireAuth(user): RequireAuth,
    Path(post_id): Path<i32>,
    Form(form): Form<CommentFormData>,
) -> Result<Response, AppError> {
    let post = PostRepository::new(state.pool())
        .get(PostId::new(post_id))
        .await?
        .ok_or_else(|| AppError::NotFound(format!("post {post_id}")))?;

    let text = match form.validate() {
        Ok(text) => text,
        Err(_) => {
            return Ok(
                Redirect::to(&format!("/posts/{post_id}?error=empty_comment")).into_response()
            );
        }
    };

    CommentRepository::new(state.pool())
        .create(post.id, user.id, &text)
        .await?;

    Ok(Redirect::to(&format!("/posts/{post_id}")).into_response())
}

/// Display the comment edit form.
///
/// # Errors
///
/// Returns `AppError::NotFound` if the comment doesn't exist.
#[instrument(skip(state, user))]
pub async fn edit_form(
    State(state): State<AppState>,
    RequireAuth(user): RequireAuth,
    Path(id): Path<i32>,
) -> Result<Response, AppError> {
    let comment = CommentRepository::new(state.pool())
        .get(CommentId::new(id))
        .await?
        .ok_or_else(|| AppError::NotFound(format!("comment {id}")))?;

    if let Err(denied) = guards::require_author(comment.author.id, user.id, comment.post_id) {
        return Ok(denied.into_response());
    }

    Ok(CommentEditTemplate {
        post_id: comment.post_id.as_i32(),
        comment: CommentView::from(&comment),
        error: None,
        current_user: Some(user),
    }
    .into_response())
}

/// Handle comment edit form submission.
///
/// # Errors
///
/// Returns `AppError::NotFound` if the comment doesn't exist.
#[instrument(skip(state, user, form))]
pub async fn update(
    State(state): State<AppState>,
    RequireAuth(user): RequireAuth,
    Path(id): Path<i32>,
    Form(form): Form<CommentFormData>,
) -> Result<Response, AppError> {
    let comments = CommentRepository::new(state.pool());
    let comment = comments
        .get(CommentId::new(id))
        .await?
        .ok_or_else(|| AppError::NotFound(format!("comment {id}")))?;

    if let Err(denied) = guards::require_author(comment.author.id, user.id, comment.post_id) {
        return Ok(denied.into_response());
    }

    let text = match form.validate() {
        Ok(text) => text,
        Err(error) => {
            return Ok(CommentEditTemplate {
                post_id: comment.post_id.as_i32(),
                comment: CommentView::from(&comment),
                error: Some(error),
                current_user: Some(user),
            }
            .into_response());
        }
    };

    comments.update_text(comment.id, &text).await?;

    Ok(Redirect::to(&format!("/posts/{}", comment.post_id)).into_response())
}

/// Display the comment deletion confirmation page.
///
/// # Errors
///
/// Returns `AppError::NotFound` if the comment doesn't exist.
#[instrument(skip(state, user))]
pub async fn confirm_delete(
    State(state): State<AppState>,
    RequireAuth(user): RequireAuth,
    Path(id): Path<i32>,
) -> Result<Response, AppError> {
    let comment = CommentRepository::new(state.pool())
        .get(CommentId::new(id))
        .await?
        .ok_or_else(|| AppError::NotFound(format!("comment {id}")))?;

    if let Err(denied) = guards::require_author(comment.author.id, user.id, comment.post_id) {
        return Ok(denied.into_response());
    }

    Ok(CommentConfirmDeleteTemplate {
        post_id: comment.post_id.as_i32(),
        comment: CommentView::from(&comment),
        current_user: Some(user),
    }
    .into_response())
}

/// Handle comment deletion.
///
/// # Errors
///
/// Returns `AppError::NotFound` if the comment doesn't exist.
#[instrument(skip(state, user))]
pub async fn delete(
    State(state): State<AppState>,
    RequireAuth(user): RequireAuth,
    Path(id): Path<i32>,
) -> Result<Response, AppError> {
    let comments = CommentRepository::new(state.pool());
    let comment = comments
        .get(CommentId::new(id))
        .await?
        .ok_or_else(|| AppError::NotFound(format!("comment {id}")))?;

    if let Err(denied) = guards::require_author(comment.author.id, user.id, comment.post_id) {
        return Ok(denied.into_response());
    }

    comments.delete(comment.id).await?;

    Ok(Redirect::to(&format!("/posts/{}", comment.post_id)).into_response())
}
