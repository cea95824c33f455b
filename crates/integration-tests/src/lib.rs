//! Integration tests for Quill.
//!
//! # Running Tests
//!
//! ```bash
//! # Start PostgreSQL and apply migrations
//! cargo run -p quill-cli -- migrate
//!
//! # Seed demo content
//! cargo run -p quill-cli -- seed
//!
//! # Start the web server
//! cargo run -p quill-web
//!
//! # Run integration tests
//! cargo test -p quill-integration-tests -- --ignored
//! ```
//!
//! # Test Categories
//!
//! - `blog_feed` - Feed visibility and pagination tests
//! - `blog_authorship` - Registration, login, and authorship gating tests

use reqwest::Client;

/// Base URL for the web server (configurable via environment).
#[must_use]
pub fn base_url() -> String {
    std::env::var("QUILL_BASE_URL").unwrap_or_else(|_| "http://localhost:3000".to_string())
}

/// Create an HTTP client with a cookie store for session handling.
///
/// Redirects are not followed so tests can assert on `Location` headers.
///
/// # Panics
///
/// Panics if the client cannot be constructed.
#[must_use]
pub fn client() -> Client {
    Client::builder()
        .cookie_store(true)
        .redirect(reqwest::redirect::Policy::none())
        .build()
        .expect("Failed to create HTTP client")
}
