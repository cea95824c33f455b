//! Integration tests for registration, login, and authorship gating.
//!
//! These tests require:
//! - A running `PostgreSQL` database with migrations applied
//! - The web server running (cargo run -p quill-web)
//!
//! Run with: cargo test -p quill-integration-tests -- --ignored
//!
//! Foreign-key behavior on user and post deletion (cascading comments,
//! nullified author references) is enforced by the schema migration and
//! is not exercised at the HTTP level here.

use quill_integration_tests::{base_url, client};
use reqwest::{Client, StatusCode, multipart};
use uuid::Uuid;

const TEST_PASSWORD: &str = "hunter2hunter2";

/// Test helper: Register a fresh user and leave the client logged in.
async fn register_user(client: &Client, username: &str) {
    let email = format!("{username}@example.com");
    let resp = client
        .post(format!("{}/auth/register", base_url()))
        .form(&[
            ("username", username),
            ("first_name", "Test"),
            ("last_name", "Author"),
            ("email", email.as_str()),
            ("password", TEST_PASSWORD),
            ("password_confirm", TEST_PASSWORD),
        ])
        .send()
        .await
        .expect("Failed to register user");

    assert_eq!(resp.status(), StatusCode::SEE_OTHER);
    let location = location_header(&resp);
    assert_eq!(location, format!("/profile/{username}"));
}

/// Test helper: Create a published post and return its id.
async fn create_post(client: &Client, username: &str, title: &str) -> i32 {
    let form = multipart::Form::new()
        .text("title", title.to_string())
        .text("text", "Body text for an integration test post.")
        .text("pub_date", "2024-01-15T12:30")
        .text("is_published", "on");

    let resp = client
        .post(format!("{}/posts/new", base_url()))
        .multipart(form)
        .send()
        .await
        .expect("Failed to create post");

    assert_eq!(resp.status(), StatusCode::SEE_OTHER);

    // The post appears on the author's profile; pull its id out of the link
    let profile = author_profile_body(client, username).await;
    extract_post_id(&profile, title)
}

async fn author_profile_body(client: &Client, username: &str) -> String {
    client
        .get(format!("{}/profile/{username}", base_url()))
        .send()
        .await
        .expect("Failed to get profile page")
        .text()
        .await
        .expect("Failed to read response")
}

/// Find the `/posts/{id}` link that wraps the given title.
fn extract_post_id(body: &str, title: &str) -> i32 {
    let title_at = body.find(title).expect("Post title not found in profile");
    let head = &body[..title_at];
    let link_at = head.rfind("/posts/").expect("Post link not found");
    let digits: String = body[link_at + "/posts/".len()..]
        .chars()
        .take_while(char::is_ascii_digit)
        .collect();
    digits.parse().expect("Post id is not numeric")
}

fn location_header(resp: &reqwest::Response) -> String {
    resp.headers()
        .get("location")
        .expect("Missing Location header")
        .to_str()
        .expect("Non-UTF8 Location header")
        .to_string()
}

fn unique_username(prefix: &str) -> String {
    format!("{prefix}-{}", Uuid::new_v4().simple())
}

// ============================================================================
// Registration & Login Tests
// ============================================================================

#[tokio::test]
#[ignore = "Requires a running quill-web server and PostgreSQL"]
async fn test_register_logs_user_in() {
    let client = client();
    let username = unique_username("reg");
    register_user(&client, &username).await;

    // The session cookie should now identify the user in the nav
    let resp = client
        .get(base_url())
        .send()
        .await
        .expect("Failed to get index");
    let body = resp.text().await.expect("Failed to read response");
    assert!(body.contains(&username));
}

#[tokio::test]
#[ignore = "Requires a running quill-web server and PostgreSQL"]
async fn test_register_rejects_mismatched_passwords() {
    let client = client();
    let resp = client
        .post(format!("{}/auth/register", base_url()))
        .form(&[
            ("username", unique_username("mismatch").as_str()),
            ("first_name", ""),
            ("last_name", ""),
            ("email", "mismatch@example.com"),
            ("password", TEST_PASSWORD),
            ("password_confirm", "something else"),
        ])
        .send()
        .await
        .expect("Failed to post registration");

    assert_eq!(resp.status(), StatusCode::SEE_OTHER);
    assert!(location_header(&resp).contains("error=password_mismatch"));
}

#[tokio::test]
#[ignore = "Requires a running quill-web server and PostgreSQL"]
async fn test_login_with_bad_credentials_is_rejected() {
    let client = client();
    let resp = client
        .post(format!("{}/auth/login", base_url()))
        .form(&[("username", "no-such-user"), ("password", "wrong")])
        .send()
        .await
        .expect("Failed to post login");

    assert_eq!(resp.status(), StatusCode::SEE_OTHER);
    assert!(location_header(&resp).contains("error=credentials"));
}

#[tokio::test]
#[ignore = "Requires a running quill-web server and PostgreSQL"]
async fn test_logout_clears_session() {
    let client = client();
    let username = unique_username("out");
    register_user(&client, &username).await;

    let resp = client
        .post(format!("{}/auth/logout", base_url()))
        .send()
        .await
        .expect("Failed to post logout");
    assert_eq!(resp.status(), StatusCode::SEE_OTHER);

    let resp = client
        .get(format!("{}/posts/new", base_url()))
        .send()
        .await
        .expect("Failed to get editor");
    assert_eq!(resp.status(), StatusCode::SEE_OTHER);
    assert_eq!(location_header(&resp), "/auth/login");
}

// ============================================================================
// Authorship Gating Tests
// ============================================================================

#[tokio::test]
#[ignore = "Requires a running quill-web server and PostgreSQL"]
async fn test_anonymous_user_is_redirected_from_editor() {
    let client = client();
    let resp = client
        .get(format!("{}/posts/new", base_url()))
        .send()
        .await
        .expect("Failed to get editor");

    assert_eq!(resp.status(), StatusCode::SEE_OTHER);
    assert_eq!(location_header(&resp), "/auth/login");
}

#[tokio::test]
#[ignore = "Requires a running quill-web server and PostgreSQL"]
async fn test_non_author_cannot_edit_post() {
    let author = client();
    let author_name = unique_username("owner");
    register_user(&author, &author_name).await;
    let title = format!("Gated post {}", Uuid::new_v4().simple());
    let post_id = create_post(&author, &author_name, &title).await;

    // A different user is bounced back to the post, not shown the editor
    let intruder = client();
    let intruder_name = unique_username("other");
    register_user(&intruder, &intruder_name).await;

    let resp = intruder
        .get(format!("{}/posts/{post_id}/edit", base_url()))
        .send()
        .await
        .expect("Failed to get edit page");

    assert_eq!(resp.status(), StatusCode::SEE_OTHER);
    assert_eq!(location_header(&resp), format!("/posts/{post_id}"));
}

#[tokio::test]
#[ignore = "Requires a running quill-web server and PostgreSQL"]
async fn test_non_author_cannot_delete_post() {
    let author = client();
    let author_name = unique_username("owner");
    register_user(&author, &author_name).await;
    let title = format!("Undeletable post {}", Uuid::new_v4().simple());
    let post_id = create_post(&author, &author_name, &title).await;

    let intruder = client();
    let intruder_name = unique_username("other");
    register_user(&intruder, &intruder_name).await;

    let resp = intruder
        .post(format!("{}/posts/{post_id}/delete", base_url()))
        .send()
        .await
        .expect("Failed to post delete");

    assert_eq!(resp.status(), StatusCode::SEE_OTHER);
    assert_eq!(location_header(&resp), format!("/posts/{post_id}"));

    // The post is still there
    let resp = author
        .get(format!("{}/posts/{post_id}", base_url()))
        .send()
        .await
        .expect("Failed to get post");
    assert_eq!(resp.status(), StatusCode::OK);
}

#[tokio::test]
#[ignore = "Requires a running quill-web server and PostgreSQL"]
async fn test_author_sees_own_draft() {
    let author = client();
    let author_name = unique_username("draft");
    register_user(&author, &author_name).await;

    let title = format!("Draft post {}", Uuid::new_v4().simple());
    let form = multipart::Form::new()
        .text("title", title.clone())
        .text("text", "Only the author should see this.")
        .text("pub_date", "2024-01-15T12:30");

    let resp = author
        .post(format!("{}/posts/new", base_url()))
        .multipart(form)
        .send()
        .await
        .expect("Failed to create draft");
    assert_eq!(resp.status(), StatusCode::SEE_OTHER);

    // Visible on the author's own profile
    let body = author
        .get(format!("{}/profile/{author_name}", base_url()))
        .send()
        .await
        .expect("Failed to get profile")
        .text()
        .await
        .expect("Failed to read response");
    assert!(body.contains(&title));

    // Hidden from everyone else
    let post_id = extract_post_id(&body, &title);
    let visitor = client();
    let resp = visitor
        .get(format!("{}/posts/{post_id}", base_url()))
        .send()
        .await
        .expect("Failed to get post");
    assert_eq!(resp.status(), StatusCode::NOT_FOUND);
}

// ============================================================================
// Comment Tests
// ============================================================================

#[tokio::test]
#[ignore = "Requires a running quill-web server and PostgreSQL"]
async fn test_comment_flow() {
    let author = client();
    let author_name = unique_username("poster");
    register_user(&author, &author_name).await;
    let title = format!("Commented post {}", Uuid::new_v4().simple());
    let post_id = create_post(&author, &author_name, &title).await;

    // A fresh post renders with a zero comment count on its card
    let profile = author_profile_body(&author, &author_name).await;
    assert!(profile.contains("0 comments"));

    let commenter = client();
    let commenter_name = unique_username("reader");
    register_user(&commenter, &commenter_name).await;

    let texts = ["First impression", "Second thought", "Third opinion"];
    for text in texts {
        let resp = commenter
            .post(format!("{}/posts/{post_id}/comment", base_url()))
            .form(&[("text", text)])
            .send()
            .await
            .expect("Failed to post comment");
        assert_eq!(resp.status(), StatusCode::SEE_OTHER);
    }

    // Uncategorized posts are only visible to their author, so verify there
    let body = author
        .get(format!("{}/posts/{post_id}", base_url()))
        .send()
        .await
        .expect("Failed to get post")
        .text()
        .await
        .expect("Failed to read response");
    assert!(body.contains(&commenter_name));

    // Comments render oldest first
    let positions: Vec<usize> = texts
        .iter()
        .map(|t| body.find(t).expect("Comment not found on detail page"))
        .collect();
    assert!(positions[0] < positions[1]);
    assert!(positions[1] < positions[2]);

    // The card's comment count reflects the new comments
    let profile = author_profile_body(&author, &author_name).await;
    assert!(profile.contains("3 comments"));
}

#[tokio::test]
#[ignore = "Requires a running quill-web server and PostgreSQL"]
async fn test_blank_comment_is_rejected() {
    let author = client();
    let author_name = unique_username("poster");
    register_user(&author, &author_name).await;
    let title = format!("Quiet post {}", Uuid::new_v4().simple());
    let post_id = create_post(&author, &author_name, &title).await;

    let resp = author
        .post(format!("{}/posts/{post_id}/comment", base_url()))
        .form(&[("text", "   ")])
        .send()
        .await
        .expect("Failed to post comment");

    assert_eq!(resp.status(), StatusCode::SEE_OTHER);
    let location = location_header(&resp);
    assert!(location.contains("error=empty_comment"));

    // The redirect target renders a readable message, not the raw code
    let body = author
        .get(format!("{}{location}", base_url()))
        .send()
        .await
        .expect("Failed to get post")
        .text()
        .await
        .expect("Failed to read response");
    assert!(body.contains("Comment text is required."));
    assert!(!body.contains("empty_comment"));
}
