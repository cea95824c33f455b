//! Form payloads and server-side validation.
//!
//! Each form deserializes the raw request body (urlencoded or multipart) and
//! exposes a `validate()` that either produces typed values or a list of
//! per-field errors for re-rendering the form.

use chrono::{DateTime, NaiveDateTime, Utc};
use quill_core::types::{CategoryId, Email, LocationId, Username};
use serde::Deserialize;

/// A single validation failure tied to a form field.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FieldError {
    pub field: &'static str,
    pub message: String,
}

impl FieldError {
    fn new(field: &'static str, message: impl Into<String>) -> Self {
        Self {
            field,
            message: message.into(),
        }
    }
}

const TITLE_MAX_LENGTH: usize = 256;

/// Datetime-local inputs submit `YYYY-MM-DDTHH:MM`; values are treated as UTC.
const PUB_DATE_FORMAT: &str = "%Y-%m-%dT%H:%M";

/// An uploaded image file from a multipart form.
#[derive(Debug, Clone)]
pub struct ImageUpload {
    pub file_name: String,
    pub data: Vec<u8>,
}

/// Raw post editor input, assembled from multipart fields.
#[derive(Debug, Default, Clone)]
pub struct PostFormInput {
    pub title: String,
    pub text: String,
    pub pub_date: String,
    pub is_published: bool,
    pub category_id: Option<i32>,
    pub location_id: Option<i32>,
    pub image: Option<ImageUpload>,
}

/// A post form that passed validation.
#[derive(Debug, Clone)]
pub struct ValidatedPost {
    pub title: String,
    pub text: String,
    pub pub_date: DateTime<Utc>,
    pub is_published: bool,
    pub category_id: Option<CategoryId>,
    pub location_id: Option<LocationId>,
}

impl PostFormInput {
    /// Validate the form, returning the typed payload or every failure found.
    ///
    /// # Errors
    ///
    /// Returns one `FieldError` per invalid field so the editor can show all
    /// problems at once.
    pub fn validate(&self) -> Result<ValidatedPost, Vec<FieldError>> {
        let mut errors = Vec::new();

        let title = self.title.trim();
        if title.is_empty() {
            errors.push(FieldError::new("title", "Title is required"));
        } else if title.len() > TITLE_MAX_LENGTH {
            errors.push(FieldError::new(
                "title",
                format!("Title must be at most {TITLE_MAX_LENGTH} characters"),
            ));
        }

        let text = self.text.trim();
        if text.is_empty() {
            errors.push(FieldError::new("text", "Text is required"));
        }

        let pub_date = match parse_pub_date(&self.pub_date) {
            Some(dt) => Some(dt),
            None => {
                errors.push(FieldError::new(
                    "pub_date",
                    "Enter a valid date and time (YYYY-MM-DDTHH:MM)",
                ));
                None
            }
        };

        if !errors.is_empty() {
            return Err(errors);
        }

        // pub_date is Some here: a parse failure pushed an error above
        let Some(pub_date) = pub_date else {
            return Err(vec![FieldError::new("pub_date", "Invalid publication date")]);
        };

        Ok(ValidatedPost {
            title: title.to_string(),
            text: text.to_string(),
            pub_date,
            is_published: self.is_published,
            category_id: self.category_id.map(CategoryId::new),
            location_id: self.location_id.map(LocationId::new),
        })
    }
}

/// Parse a `datetime-local` value as a UTC timestamp.
fn parse_pub_date(raw: &str) -> Option<DateTime<Utc>> {
    let trimmed = raw.trim();
    let naive = NaiveDateTime::parse_from_str(trimmed, PUB_DATE_FORMAT)
        .or_else(|_| NaiveDateTime::parse_from_str(trimmed, "%Y-%m-%dT%H:%M:%S"))
        .ok()?;
    Some(naive.and_utc())
}

/// Comment form body.
#[derive(Debug, Deserialize)]
pub struct CommentFormData {
    pub text: String,
}

impl CommentFormData {
    /// Returns the trimmed comment text.
    ///
    /// # Errors
    ///
    /// Returns an error message when the text is empty after trimming.
    pub fn validate(&self) -> Result<String, String> {
        let text = self.text.trim();
        if text.is_empty() {
            return Err("Comment text is required".to_string());
        }
        Ok(text.to_string())
    }
}

const NAME_MAX_LENGTH: usize = 150;

/// Profile edit form body.
#[derive(Debug, Default, Deserialize)]
pub struct ProfileFormData {
    pub username: String,
    #[serde(default)]
    pub first_name: String,
    #[serde(default)]
    pub last_name: String,
    pub email: String,
}

/// A profile form that passed validation.
#[derive(Debug, Clone)]
pub struct ValidatedProfile {
    pub username: Username,
    pub first_name: String,
    pub last_name: String,
    pub email: Email,
}

impl ProfileFormData {
    /// # Errors
    ///
    /// Returns one `FieldError` per invalid field.
    pub fn validate(&self) -> Result<ValidatedProfile, Vec<FieldError>> {
        let mut errors = Vec::new();

        let username = match self.username.trim().parse::<Username>() {
            Ok(u) => Some(u),
            Err(e) => {
                errors.push(FieldError::new("username", e.to_string()));
                None
            }
        };

        let email = match self.email.trim().parse::<Email>() {
            Ok(e) => Some(e),
            Err(e) => {
                errors.push(FieldError::new("email", e.to_string()));
                None
            }
        };

        let first_name = self.first_name.trim();
        if first_name.len() > NAME_MAX_LENGTH {
            errors.push(FieldError::new("first_name", "First name is too long"));
        }
        let last_name = self.last_name.trim();
        if last_name.len() > NAME_MAX_LENGTH {
            errors.push(FieldError::new("last_name", "Last name is too long"));
        }

        match (username, email) {
            (Some(username), Some(email)) if errors.is_empty() => Ok(ValidatedProfile {
                username,
                first_name: first_name.to_string(),
                last_name: last_name.to_string(),
                email,
            }),
            _ => Err(errors),
        }
    }
}

/// Login form body.
#[derive(Debug, Deserialize)]
pub struct LoginFormData {
    pub username: String,
    pub password: String,
}

/// Registration form body.
#[derive(Debug, Deserialize)]
pub struct RegisterFormData {
    pub username: String,
    #[serde(default)]
    pub first_name: String,
    #[serde(default)]
    pub last_name: String,
    pub email: String,
    pub password: String,
    pub password_confirm: String,
}

impl RegisterFormData {
    /// Checks only the cross-field constraint; the auth service validates the
    /// rest (username, email, password strength).
    ///
    /// # Errors
    ///
    /// Returns an error message when the two password fields differ.
    pub fn check_passwords_match(&self) -> Result<(), String> {
        if self.password == self.password_confirm {
            Ok(())
        } else {
            Err("Passwords do not match".to_string())
        }
    }
}
