//! Domain models shared across repositories, routes, and templates.

pub mod category;
pub mod comment;
pub mod location;
pub mod post;
pub mod user;

pub use category::Category;
pub use comment::Comment;
pub use location::Location;
pub use post::{AuthorRef, CategoryRef, LocationRef, Post, Publication};
pub use user::User;

use quill_core::types::{UserId, Username};
use serde::{Deserialize, Serialize};

/// Session storage keys.
pub mod session_keys {
    pub const CURRENT_USER: &str = "current_user";
}

/// The authenticated user stored in the session.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CurrentUser {
    pub id: UserId,
    pub username: Username,
}
