//! Authorship checks for editing routes.
//!
//! Posts and comments can only be changed by their author. A failed check
//! is a soft deny: instead of a 403 page, the request is redirected back to
//! the post it concerns.

use axum::response::{IntoResponse, Redirect, Response};

use quill_core::types::{PostId, UserId};

/// Returned when the current user does not own the resource they're editing.
#[derive(Debug, PartialEq, Eq)]
pub struct OwnershipDenied {
    redirect_to: String,
}

impl IntoResponse for OwnershipDenied {
    fn into_response(self) -> Response {
        Redirect::to(&self.redirect_to).into_response()
    }
}

/// Require that `current` is the author of the post (or of a comment on it).
///
/// # Errors
///
/// Returns `OwnershipDenied` redirecting to the post's detail page when the
/// current user is not the owner.
pub fn require_author(
    owner: UserId,
    current: UserId,
    post_id: PostId,
) -> Result<(), OwnershipDenied> {
    if owner == current {
        Ok(())
    } else {
        Err(OwnershipDenied {
            redirect_to: format!("/posts/{post_id}"),
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_owner_passes() {
        assert!(require_author(UserId::new(1), UserId::new(1), PostId::new(9)).is_ok());
    }

    #[test]
    fn test_non_owner_is_redirected_to_post() {
        let denied =
            require_author(UserId::new(1), UserId::new(2), PostId::new(9)).unwrap_err();
        assert_eq!(
            denied,
            OwnershipDenied {
                redirect_to: "/posts/9".to_string()
            }
        );
    }
}
