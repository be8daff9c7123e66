mod common;

use archlink_server::models::Role;
use axum::http::StatusCode;
use axum_test::TestServer;
use common::auth_header;
use serde_json::json;

async fn setup() -> (TestServer, sqlx::SqlitePool) {
    let pool = common::setup_test_db().await;
    let app = common::create_test_app(pool.clone());
    let server = TestServer::new(app).unwrap();
    (server, pool)
}

#[tokio::test]
async fn get_me_returns_profile() {
    let (server, pool) = setup().await;
    let (user_id, token) = common::create_test_user(&pool, "arch@test.com", "Arnav", Role::Architect).await;

    let (h, v) = auth_header(&token);
    let res = server.get("/api/users/me").add_header(h, v).await;

    res.assert_status_ok();
    let body: serde_json::Value = res.json();
    assert_eq!(body["id"], user_id);
    assert_eq!(body["name"], "Arnav");
    assert_eq!(body["role"], "architect");
    assert_eq!(body["followerCount"], 0);
    assert_eq!(body["followingCount"], 0);
}

#[tokio::test]
async fn get_me_without_auth_returns_401() {
    let (server, _pool) = setup().await;

    let res = server.get("/api/users/me").await;
    res.assert_status(StatusCode::UNAUTHORIZED);
    assert_eq!(res.json::<serde_json::Value>()["code"], "UNAUTHORIZED");
}

#[tokio::test]
async fn update_profile_fields() {
    let (server, pool) = setup().await;
    let (_, token) = common::create_test_user(&pool, "owner@test.com", "Olivia", Role::Homeowner).await;

    let (h, v) = auth_header(&token);
    let res = server
        .patch("/api/users/me")
        .add_header(h, v)
        .json(&json!({ "name": "Olivia K", "location": "Lisbon", "image": "https://img/1.png" }))
        .await;
    res.assert_status_ok();
    let body: serde_json::Value = res.json();
    assert_eq!(body["name"], "Olivia K");
    assert_eq!(body["location"], "Lisbon");
    assert_eq!(body["image"], "https://img/1.png");

    let (h, v) = auth_header(&token);
    let body: serde_json::Value = server
        .patch("/api/users/me")
        .add_header(h, v)
        .json(&json!({ "location": null }))
        .await
        .json();
    assert!(body["location"].is_null());
    assert_eq!(body["image"], "https://img/1.png");
}

#[tokio::test]
async fn role_cannot_change() {
    let (server, pool) = setup().await;
    let (user_id, token) = common::create_test_user(&pool, "owner@test.com", "Olivia", Role::Homeowner).await;

    let (h, v) = auth_header(&token);
    server
        .patch("/api/users/me")
        .add_header(h, v)
        .json(&json!({ "role": "architect" }))
        .await
        .assert_status(StatusCode::CONFLICT);

    // Repeating the current role is fine
    let (h, v) = auth_header(&token);
    server
        .patch("/api/users/me")
        .add_header(h, v)
        .json(&json!({ "role": "homeowner" }))
        .await
        .assert_status_ok();

    // The store refuses too
    let direct = sqlx::query(r#"UPDATE "user" SET role = 'architect' WHERE id = ?"#)
        .bind(&user_id)
        .execute(&pool)
        .await;
    assert!(direct.is_err());
}

#[tokio::test]
async fn get_unknown_user_returns_404() {
    let (server, pool) = setup().await;
    let (_, token) = common::create_test_user(&pool, "owner@test.com", "Olivia", Role::Homeowner).await;

    let (h, v) = auth_header(&token);
    let res = server.get("/api/users/unknown").add_header(h, v).await;
    res.assert_status(StatusCode::NOT_FOUND);
    assert_eq!(res.json::<serde_json::Value>()["code"], "NOT_FOUND");
}
