//! Profile page handlers: author feeds and profile editing.

use askama::Template;
use askama_web::WebTemplate;
use axum::{
    Form,
    extract::{Path, Query, State},
    response::{IntoResponse, Redirect, Response},
};
use tracing::instrument;

use quill_core::types::Username;

use crate::db::{FeedScope, PostRepository, ProfileUpdate, RepositoryError, UserRepository};
use crate::error::AppError;
use crate::filters;
use crate::forms::{FieldError, ProfileFormData};
use crate::middleware::{OptionalAuth, RequireAuth, set_current_user};
use crate::models::CurrentUser;
use crate::pagination::{PAGE_SIZE, Page, Paginator};
use crate::routes::posts::{PageQuery, PostView};
use crate::state::AppState;
use tower_sessions::Session;

// =============================================================================
// Templates
// =============================================================================

/// Profile page template: author details plus their post feed.
#[derive(Template, WebTemplate)]
#[template(path = "blog/profile.html")]
pub struct ProfileTemplate {
    pub username: String,
    pub display_name: String,
    pub is_owner: bool,
    pub posts: Vec<PostView>,
    pub page: Page,
    pub current_user: Option<CurrentUser>,
}

/// Profile edit form template.
#[derive(Template, WebTemplate)]
#[template(path = "profile/edit.html")]
pub struct ProfileEditTemplate {
    /// The session user's current username; the form posts back here.
    pub username: String,
    /// Echoed form value, which may differ from `username` after a failed save.
    pub form_username: String,
    pub first_name: String,
    pub last_name: String,
    pub email: String,
    pub errors: Vec<FieldError>,
    pub current_user: Option<CurrentUser>,
}

// =============================================================================
// Handlers
// =============================================================================

/// Display a user's profile and post feed.
///
/// Owners see all of their posts including drafts and scheduled ones;
/// visitors only see the publicly visible subset.
///
/// # Errors
///
/// Returns `AppError::NotFound` if no such user exists.
#[instrument(skip(state, viewer))]
pub async fn show(
    State(state): State<AppState>,
    OptionalAuth(viewer): OptionalAuth,
    Path(username): Path<String>,
    Query(query): Query<PageQuery>,
) -> Result<ProfileTemplate, AppError> {
    let username = Username::parse(&username)
        .map_err(|_| AppError::NotFound(format!("user {username}")))?;
    let user = UserRepository::new(state.pool())
        .get_by_username(&username)
        .await?
        .ok_or_else(|| AppError::NotFound(format!("user {username}")))?;

    let is_owner = viewer.as_ref().is_some_and(|v| v.id == user.id);
    let scope = FeedScope::Profile {
        user: user.id,
        viewer_is_owner: is_owner,
    };

    let posts = PostRepository::new(state.pool());
    let total = posts.count(&scope).await?;
    let page = Paginator::new(total, PAGE_SIZE).resolve(query.page.as_deref());
    let posts = posts.feed(&scope, page.limit, page.offset).await?;

    Ok(ProfileTemplate {
        username: user.username.to_string(),
        display_name: user.display_name(),
        is_owner,
        posts: posts.iter().map(PostView::from).collect(),
        page,
        current_user: viewer,
    })
}

/// Display the profile edit form.
///
/// Users can only edit their own profile; a mismatched username redirects
/// to that profile instead.
///
/// # Errors
///
/// Returns `AppError::Database` if loading the profile fails.
#[instrument(skip(state, user))]
pub async fn edit_form(
    State(state): State<AppState>,
    RequireAuth(user): RequireAuth,
    Path(username): Path<String>,
) -> Result<Response, AppError> {
    if user.username.as_str() != username {
        return Ok(Redirect::to(&format!("/profile/{username}")).into_response());
    }

    let profile = UserRepository::new(state.pool())
        .get_by_id(user.id)
        .await?
        .ok_or_else(|| AppError::NotFound(format!("user {username}")))?;

    Ok(ProfileEditTemplate {
        username: profile.username.to_string(),
        form_username: profile.username.to_string(),
        first_name: profile.first_name,
        last_name: profile.last_name,
        email: profile.email.to_string(),
        errors: Vec::new(),
        current_user: Some(user),
    }
    .into_response())
}

/// Handle profile edit form submission.
///
/// # Errors
///
/// Returns `AppError::Database` if the update fails.
#[instrument(skip(state, session, user, form))]
pub async fn update(
    State(state): State<AppState>,
    session: Session,
    RequireAuth(user): RequireAuth,
    Path(username): Path<String>,
    Form(form): Form<ProfileFormData>,
) -> Result<Response, AppError> {
    if user.username.as_str() != username {
        return Ok(Redirect::to(&format!("/profile/{username}")).into_response());
    }

    let validated = match form.validate() {
        Ok(v) => v,
        Err(errors) => {
            return Ok(ProfileEditTemplate {
                username: user.username.to_string(),
                form_username: form.username,
                first_name: form.first_name,
                last_name: form.last_name,
                email: form.email,
                errors,
                current_user: Some(user),
            }
            .into_response());
        }
    };

    let updated = UserRepository::new(state.pool())
        .update_profile(
            user.id,
            &ProfileUpdate {
                username: &validated.username,
                first_name: &validated.first_name,
                last_name: &validated.last_name,
                email: &validated.email,
            },
        )
        .await;

    let updated = match updated {
        Ok(u) => u,
        Err(RepositoryError::Conflict(_)) => {
            return Ok(ProfileEditTemplate {
                username: user.username.to_string(),
                form_username: form.username,
                first_name: form.first_name,
                last_name: form.last_name,
                email: form.email,
                errors: vec![FieldError {
                    field: "username",
                    message: "This username is already taken".to_string(),
                }],
                current_user: Some(user),
            }
            .into_response());
        }
        Err(e) => return Err(e.into()),
    };

    // The username may have changed; refresh the session copy
    let refreshed = CurrentUser {
        id: updated.id,
        username: updated.username.clone(),
    };
    if let Err(e) = set_current_user(&session, &refreshed).await {
        tracing::error!("Failed to refresh session after profile update: {e}");
    }

    Ok(Redirect::to(&format!("/profile/{}", updated.username)).into_response())
}
