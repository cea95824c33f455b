//! Demo content seeding command.
//!
//! Creates a demo account, a couple of categories and locations, and a
//! handful of posts in various visibility states. Re-running is safe: rows
//! are inserted with `ON CONFLICT DO NOTHING` keyed on their natural keys.

use argon2::{
    Argon2,
    password_hash::{PasswordHasher, SaltString, rand_core::OsRng},
};
use chrono::{Duration, Utc};
use sqlx::PgPool;

use super::{CommandError, database_url};

const DEMO_USERNAME: &str = "demo";

/// Seed the database with demo content.
///
/// # Errors
///
/// Returns `CommandError` if the database is unreachable or an insert fails.
pub async fn run(password: &str) -> Result<(), CommandError> {
    let database_url = database_url()?;

    tracing::info!("Connecting to database...");
    let pool = PgPool::connect(&database_url).await?;

    let user_id = seed_user(&pool, password).await?;
    let category_id = seed_categories(&pool).await?;
    let location_id = seed_locations(&pool).await?;
    seed_posts(&pool, user_id, category_id, location_id).await?;

    tracing::info!(username = DEMO_USERNAME, "Seeding complete");
    Ok(())
}

async fn seed_user(pool: &PgPool, password: &str) -> Result<i32, CommandError> {
    let salt = SaltString::generate(&mut OsRng);
    let password_hash = Argon2::default()
        .hash_password(password.as_bytes(), &salt)
        .map_err(|e| CommandError::PasswordHash(e.to_string()))?
        .to_string();

    sqlx::query(
        r"
        INSERT INTO blog.users (username, first_name, last_name, email, password_hash)
        VALUES ($1, 'Demo', 'Author', 'demo@example.com', $2)
        ON CONFLICT (username) DO NOTHING
        ",
    )
    .bind(DEMO_USERNAME)
    .bind(&password_hash)
    .execute(pool)
    .await?;

    let id = sqlx::query_scalar::<_, i32>("SELECT id FROM blog.users WHERE username = $1")
        .bind(DEMO_USERNAME)
        .fetch_one(pool)
        .await?;

    tracing::info!(username = DEMO_USERNAME, "Demo user ready");
    Ok(id)
}

async fn seed_categories(pool: &PgPool) -> Result<i32, CommandError> {
    sqlx::query(
        r"
        INSERT INTO blog.categories (title, description, slug, is_published)
        VALUES
            ('Travel', 'Places worth writing home about.', 'travel', TRUE),
            ('Drafts corner', 'A hidden category for testing.', 'drafts-corner', FALSE)
        ON CONFLICT (slug) DO NOTHING
        ",
    )
    .execute(pool)
    .await?;

    let id = sqlx::query_scalar::<_, i32>("SELECT id FROM blog.categories WHERE slug = 'travel'")
        .fetch_one(pool)
        .await?;

    Ok(id)
}

async fn seed_locations(pool: &PgPool) -> Result<i32, CommandError> {
    // No unique constraint on name, so guard the insert ourselves
    sqlx::query(
        r"
        INSERT INTO blog.locations (name, is_published)
        SELECT 'Lisbon', TRUE
        WHERE NOT EXISTS (SELECT 1 FROM blog.locations WHERE name = 'Lisbon')
        ",
    )
    .execute(pool)
    .await?;

    let id = sqlx::query_scalar::<_, i32>(
        "SELECT id FROM blog.locations WHERE name = 'Lisbon' ORDER BY id LIMIT 1",
    )
    .fetch_one(pool)
    .await?;

    Ok(id)
}

async fn seed_posts(
    pool: &PgPool,
    user_id: i32,
    category_id: i32,
    location_id: i32,
) -> Result<(), CommandError> {
    let existing = sqlx::query_scalar::<_, i64>(
        "SELECT COUNT(*) FROM blog.posts WHERE author_id = $1",
    )
    .bind(user_id)
    .fetch_one(pool)
    .await?;

    if existing > 0 {
        tracing::info!("Demo posts already present, skipping");
        return Ok(());
    }

    let now = Utc::now();

    // A visible post, a scheduled post, and an unpublished draft
    let posts = [
        (
            "Hello from Lisbon",
            "The trams really are that yellow.",
            now - Duration::days(1),
            true,
        ),
        (
            "Scheduled: next week's plans",
            "This should not appear in public feeds yet.",
            now + Duration::days(7),
            true,
        ),
        (
            "Unfinished thoughts",
            "A draft only the author can see.",
            now - Duration::days(2),
            false,
        ),
    ];

    for (title, text, pub_date, is_published) in posts {
        sqlx::query(
            r"
            INSERT INTO blog.posts
                (title, text, pub_date, is_published, author_id, category_id, location_id)
            VALUES ($1, $2, $3, $4, $5, $6, $7)
            ",
        )
        .bind(title)
        .bind(text)
        .bind(pub_date)
        .bind(is_published)
        .bind(user_id)
        .bind(category_id)
        .bind(location_id)
        .execute(pool)
        .await?;
    }

    tracing::info!("Demo posts created");
    Ok(())
}
