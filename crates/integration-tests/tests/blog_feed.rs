//! Integration tests for public feed visibility and pagination.
//!
//! These tests require:
//! - A running `PostgreSQL` database with migrations applied
//! - Demo content seeded (cargo run -p quill-cli -- seed)
//! - The web server running (cargo run -p quill-web)
//!
//! Run with: cargo test -p quill-integration-tests -- --ignored

use quill_integration_tests::{base_url, client};
use reqwest::StatusCode;

// ============================================================================
// Health Tests
// ============================================================================

#[tokio::test]
#[ignore = "Requires a running quill-web server"]
async fn test_health_endpoint() {
    let client = client();
    let resp = client
        .get(format!("{}/health", base_url()))
        .send()
        .await
        .expect("Failed to reach health endpoint");

    assert_eq!(resp.status(), StatusCode::OK);
    let body = resp.text().await.expect("Failed to read response");
    assert_eq!(body, "ok");
}

#[tokio::test]
#[ignore = "Requires a running quill-web server and PostgreSQL"]
async fn test_readiness_endpoint() {
    let client = client();
    let resp = client
        .get(format!("{}/health/ready", base_url()))
        .send()
        .await
        .expect("Failed to reach readiness endpoint");

    assert_eq!(resp.status(), StatusCode::OK);
}

// ============================================================================
// Feed Visibility Tests
// ============================================================================

#[tokio::test]
#[ignore = "Requires a running quill-web server and seeded data"]
async fn test_index_shows_only_public_posts() {
    let client = client();
    let resp = client
        .get(base_url())
        .send()
        .await
        .expect("Failed to get index");

    assert_eq!(resp.status(), StatusCode::OK);
    let body = resp.text().await.expect("Failed to read response");

    // Seeded visible post
    assert!(body.contains("Hello from Lisbon"));
    // Seeded draft and future-dated post must stay hidden
    assert!(!body.contains("Unfinished thoughts"));
    assert!(!body.contains("Scheduled: next week"));
}

#[tokio::test]
#[ignore = "Requires a running quill-web server and seeded data"]
async fn test_category_page_lists_posts() {
    let client = client();
    let resp = client
        .get(format!("{}/category/travel", base_url()))
        .send()
        .await
        .expect("Failed to get category page");

    assert_eq!(resp.status(), StatusCode::OK);
    let body = resp.text().await.expect("Failed to read response");
    assert!(body.contains("Travel"));
    assert!(body.contains("Hello from Lisbon"));
}

#[tokio::test]
#[ignore = "Requires a running quill-web server"]
async fn test_unknown_category_returns_not_found() {
    let client = client();
    let resp = client
        .get(format!("{}/category/no-such-category", base_url()))
        .send()
        .await
        .expect("Failed to get category page");

    assert_eq!(resp.status(), StatusCode::NOT_FOUND);
}

#[tokio::test]
#[ignore = "Requires a running quill-web server and seeded data"]
async fn test_hidden_category_is_not_browsable() {
    let client = client();
    let resp = client
        .get(format!("{}/category/drafts-corner", base_url()))
        .send()
        .await
        .expect("Failed to get category page");

    assert_eq!(resp.status(), StatusCode::NOT_FOUND);
}

#[tokio::test]
#[ignore = "Requires a running quill-web server"]
async fn test_unknown_post_returns_not_found() {
    let client = client();
    let resp = client
        .get(format!("{}/posts/999999", base_url()))
        .send()
        .await
        .expect("Failed to get post page");

    assert_eq!(resp.status(), StatusCode::NOT_FOUND);
}

// ============================================================================
// Pagination Tests
// ============================================================================

#[tokio::test]
#[ignore = "Requires a running quill-web server and seeded data"]
async fn test_non_numeric_page_falls_back_to_first() {
    let client = client();
    let resp = client
        .get(format!("{}/?page=abc", base_url()))
        .send()
        .await
        .expect("Failed to get index");

    assert_eq!(resp.status(), StatusCode::OK);
    let body = resp.text().await.expect("Failed to read response");
    assert!(body.contains("Hello from Lisbon"));
}

#[tokio::test]
#[ignore = "Requires a running quill-web server and seeded data"]
async fn test_overflowing_page_clamps_to_last() {
    let client = client();
    let resp = client
        .get(format!("{}/?page=99999", base_url()))
        .send()
        .await
        .expect("Failed to get index");

    // Out-of-range pages clamp rather than 404
    assert_eq!(resp.status(), StatusCode::OK);
}

#[tokio::test]
#[ignore = "Requires a running quill-web server and seeded data"]
async fn test_zero_page_falls_back_to_first() {
    let client = client();
    let resp = client
        .get(format!("{}/?page=0", base_url()))
        .send()
        .await
        .expect("Failed to get index");

    assert_eq!(resp.status(), StatusCode::OK);
    let body = resp.text().await.expect("Failed to read response");
    assert!(body.contains("Hello from Lisbon"));
}

// ============================================================================
// Profile Feed Tests
// ============================================================================

#[tokio::test]
#[ignore = "Requires a running quill-web server and seeded data"]
async fn test_visitor_sees_only_public_posts_on_profile() {
    let client = client();
    let resp = client
        .get(format!("{}/profile/demo", base_url()))
        .send()
        .await
        .expect("Failed to get profile page");

    assert_eq!(resp.status(), StatusCode::OK);
    let body = resp.text().await.expect("Failed to read response");
    assert!(body.contains("Hello from Lisbon"));
    assert!(!body.contains("Unfinished thoughts"));
}

#[tokio::test]
#[ignore = "Requires a running quill-web server"]
async fn test_unknown_profile_returns_not_found() {
    let client = client();
    let resp = client
        .get(format!("{}/profile/no-such-user", base_url()))
        .send()
        .await
        .expect("Failed to get profile page");

    assert_eq!(resp.status(), StatusCode::NOT_FOUND);
}
