//! HTTP route handlers for the blog.
//!
//! # Route Structure
//!
//! ```text
//! GET  /                        - Public feed (paginated)
//! GET  /health                  - Health check
//!
//! # Posts
//! GET  /posts/new               - Post editor (requires auth)
//! POST /posts/new               - Create post
//! GET  /posts/{id}              - Post detail with comments
//! GET  /posts/{id}/edit         - Edit editor (author only)
//! POST /posts/{id}/edit         - Update post
//! GET  /posts/{id}/delete       - Delete confirmation (author only)
//! POST /posts/{id}/delete       - Delete post
//! POST /posts/{id}/comment      - Add a comment (requires auth)
//!
//! # Comments
//! GET  /comments/{id}/edit      - Comment edit form (author only)
//! POST /comments/{id}/edit      - Update comment
//! GET  /comments/{id}/delete    - Delete confirmation (author only)
//! POST /comments/{id}/delete    - Delete comment
//!
//! # Categories
//! GET  /category/{slug}         - Category feed (paginated)
//!
//! # Profiles
//! GET  /profile/{username}      - Author feed (paginated)
//! GET  /profile/{username}/edit - Profile edit form (owner only)
//! POST /profile/{username}/edit - Update profile
//!
//! # Auth
//! GET  /auth/login              - Login page
//! POST /auth/login              - Login action
//! GET  /auth/register           - Register page
//! POST /auth/register           - Register action
//! POST /auth/logout             - Logout action
//! ```

pub mod auth;
pub mod categories;
pub mod comments;
pub mod guards;
pub mod posts;
pub mod profiles;

use axum::{
    Router,
    routing::{get, post},
};

use crate::state::AppState;

/// Create the post routes router.
pub fn post_routes() -> Router<AppState> {
    Router::new()
        .route("/new", get(posts::new_form).post(posts::create))
        .route("/{id}", get(posts::show))
        .route("/{id}/edit", get(posts::edit_form).post(posts::update))
        .route(
            "/{id}/delete",
            get(posts::confirm_delete).post(posts::delete),
        )
        .route("/{id}/comment", post(comments::create))
}

/// Create the comment routes router.
pub fn comment_routes() -> Router<AppState> {
    Router::new()
        .route(
            "/{id}/edit",
            get(comments::edit_form).post(comments::update),
        )
        .route(
            "/{id}/delete",
            get(comments::confirm_delete).post(comments::delete),
        )
}

/// Create the profile routes router.
pub fn profile_routes() -> Router<AppState> {
    Router::new()
        .route("/{username}", get(profiles::show))
        .route(
            "/{username}/edit",
            get(profiles::edit_form).post(profiles::update),
        )
}

/// Create the auth routes router.
pub fn auth_routes() -> Router<AppState> {
    Router::new()
        .route("/login", get(auth::login_page).post(auth::login))
        .route("/register", get(auth::register_page).post(auth::register))
        .route("/logout", post(auth::logout))
}

/// Create all routes for the blog.
pub fn routes() -> Router<AppState> {
    Router::new()
        // Public feed
        .route("/", get(posts::index))
        // Post routes
        .nest("/posts", post_routes())
        // Comment routes
        .nest("/comments", comment_routes())
        // Category feeds
        .route("/category/{slug}", get(categories::show))
        // Profile routes
        .nest("/profile", profile_routes())
        // Auth routes
        .nest("/auth", auth_routes())
}
