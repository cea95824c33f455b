//! User domain model.

use chrono::{DateTime, Utc};
use quill_core::types::{Email, UserId, Username};
use serde::Serialize;

/// A registered account.
#[derive(Debug, Clone, Serialize)]
pub struct User {
    pub id: UserId,
    pub username: Username,
    pub first_name: String,
    pub last_name: String,
    pub email: Email,
    pub created_at: DateTime<Utc>,
}

impl User {
    /// Display name for profile pages: full name when set, username otherwise.
    #[must_use]
    pub fn display_name(&self) -> String {
        let full = format!("{} {}", self.first_name.trim(), self.last_name.trim());
        let full = full.trim();
        if full.is_empty() {
            self.username.to_string()
        } else {
            full.to_string()
        }
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;
    use chrono::TimeZone;

    fn user(first: &str, last: &str) -> User {
        User {
            id: UserId::new(1),
            username: Username::parse("jane_doe").unwrap(),
            first_name: first.to_string(),
            last_name: last.to_string(),
            email: Email::parse("jane@example.com").unwrap(),
            created_at: Utc.with_ymd_and_hms(2024, 1, 1, 0, 0, 0).unwrap(),
        }
    }

    #[test]
    fn test_display_name_prefers_full_name() {
        assert_eq!(user("Jane", "Doe").display_name(), "Jane Doe");
    }

    #[test]
    fn test_display_name_falls_back_to_username() {
        assert_eq!(user("", "").display_name(), "jane_doe");
    }

    #[test]
    fn test_display_name_partial() {
        assert_eq!(user("Jane", "").display_name(), "Jane");
    }
}
