#![allow(dead_code)]

pub mod ws_helpers;

use archlink_server::{config::Config, db, models::{AuthUser, Role}, routes, AppState};
use axum::http::{HeaderName, HeaderValue};
use axum::Router;
use sqlx::sqlite::{SqlitePool, SqlitePoolOptions};
use std::sync::Arc;

use argon2::PasswordHasher;

pub const TEST_PASSWORD: &str = "password123";

/// Create an in-memory SQLite pool with schema and triggers applied.
pub async fn setup_test_db() -> SqlitePool {
    let pool = SqlitePoolOptions::new()
        .max_connections(1)
        .connect("sqlite::memory:")
        .await
        .expect("Failed to create in-memory SQLite pool");

    db::migrate(&pool).await.expect("Failed to apply schema");
    pool
}

pub fn test_config() -> Config {
    Config {
        host: "127.0.0.1".into(),
        port: 0,
        database_path: ":memory:".into(),
        session_ttl_days: 30,
        message_page_size: 50,
    }
}

pub fn create_test_state(pool: SqlitePool) -> Arc<AppState> {
    Arc::new(AppState::new(pool, test_config()))
}

/// Build a test Axum app with the given pool.
pub fn create_test_app(pool: SqlitePool) -> Router {
    routes::build_router(create_test_state(pool))
}

/// Build a test app sharing an existing state, so tests can inspect the gateway.
pub fn create_test_app_with_state(state: Arc<AppState>) -> Router {
    routes::build_router(state)
}

/// Create a test user directly in the database. Returns (user_id, session_token).
pub async fn create_test_user(
    pool: &SqlitePool,
    email: &str,
    name: &str,
    role: Role,
) -> (String, String) {
    let user_id = uuid::Uuid::new_v4().to_string();
    let now = db::now();

    sqlx::query(
        r#"INSERT INTO "user" (id, name, email, role, created_at, updated_at)
           VALUES (?, ?, ?, ?, ?, ?)"#,
    )
    .bind(&user_id)
    .bind(name)
    .bind(email)
    .bind(role)
    .bind(&now)
    .bind(&now)
    .execute(pool)
    .await
    .unwrap();

    let salt = argon2::password_hash::SaltString::generate(&mut rand::rngs::OsRng);
    let password_hash = argon2::Argon2::default()
        .hash_password(TEST_PASSWORD.as_bytes(), &salt)
        .unwrap()
        .to_string();

    sqlx::query(
        r#"INSERT INTO "account" (id, user_id, provider_id, password, created_at, updated_at)
           VALUES (?, ?, 'credential', ?, ?, ?)"#,
    )
    .bind(uuid::Uuid::new_v4().to_string())
    .bind(&user_id)
    .bind(&password_hash)
    .bind(&now)
    .bind(&now)
    .execute(pool)
    .await
    .unwrap();

    let session_token = uuid::Uuid::new_v4().to_string();
    let expires_at = (chrono::Utc::now() + chrono::Duration::days(30))
        .to_rfc3339_opts(chrono::SecondsFormat::Micros, true);

    sqlx::query(
        r#"INSERT INTO "session" (id, user_id, token, expires_at, created_at)
           VALUES (?, ?, ?, ?, ?)"#,
    )
    .bind(uuid::Uuid::new_v4().to_string())
    .bind(&user_id)
    .bind(&session_token)
    .bind(&expires_at)
    .bind(&now)
    .execute(pool)
    .await
    .unwrap();

    (user_id, session_token)
}

/// Same as [`create_test_user`] but also returns the resolved identity for
/// calling the social operations directly.
pub async fn create_auth_user(pool: &SqlitePool, email: &str, name: &str, role: Role) -> (AuthUser, String) {
    let (id, token) = create_test_user(pool, email, name, role).await;
    (
        AuthUser {
            id,
            name: name.to_string(),
            role,
        },
        token,
    )
}

/// Insert a post row owned by `author_id`.
pub async fn create_test_post(pool: &SqlitePool, author_id: &str, title: &str) -> String {
    let post_id = uuid::Uuid::new_v4().to_string();
    sqlx::query(
        "INSERT INTO posts (id, author_id, title, description, created_at) VALUES (?, ?, ?, '', ?)",
    )
    .bind(&post_id)
    .bind(author_id)
    .bind(title)
    .bind(db::now())
    .execute(pool)
    .await
    .unwrap();
    post_id
}

pub fn auth_header(token: &str) -> (HeaderName, HeaderValue) {
    (
        HeaderName::from_static("authorization"),
        format!("Bearer {}", token).parse().unwrap(),
    )
}
