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
async fn sign_up_creates_user_and_session() {
    let (server, pool) = setup().await;

    let res = server
        .post("/api/auth/sign-up/email")
        .json(&json!({
            "email": "Olivia@Test.com",
            "password": "password123",
            "name": "Olivia",
            "role": "homeowner"
        }))
        .await;
    res.assert_status_ok();
    let body: serde_json::Value = res.json();
    assert_eq!(body["user"]["email"], "olivia@test.com");
    assert_eq!(body["user"]["role"], "homeowner");
    assert!(body["token"].is_string());

    let cookie = res.header("set-cookie");
    assert!(cookie.to_str().unwrap().starts_with("archlink.session_token="));

    let sessions: i64 = sqlx::query_scalar(r#"SELECT COUNT(*) FROM "session""#)
        .fetch_one(&pool)
        .await
        .unwrap();
    assert_eq!(sessions, 1);
}

#[tokio::test]
async fn sign_up_rejects_bad_input() {
    let (server, _pool) = setup().await;

    let cases = [
        json!({ "email": "not-an-email", "password": "password123", "name": "Olivia", "role": "homeowner" }),
        json!({ "email": "o@test.com", "password": "short", "name": "Olivia", "role": "homeowner" }),
        json!({ "email": "o@test.com", "password": "password123", "name": "O", "role": "homeowner" }),
        json!({ "email": "o@test.com", "password": "password123", "name": "Olivia", "role": "admin" }),
    ];

    for body in cases {
        server
            .post("/api/auth/sign-up/email")
            .json(&body)
            .await
            .assert_status(StatusCode::BAD_REQUEST);
    }
}

#[tokio::test]
async fn duplicate_email_is_a_conflict() {
    let (server, pool) = setup().await;
    common::create_test_user(&pool, "olivia@test.com", "Olivia", Role::Homeowner).await;

    server
        .post("/api/auth/sign-up/email")
        .json(&json!({
            "email": "olivia@test.com",
            "password": "password123",
            "name": "Olivia",
            "role": "architect"
        }))
        .await
        .assert_status(StatusCode::CONFLICT);
}

#[tokio::test]
async fn sign_in_and_get_session() {
    let (server, pool) = setup().await;
    let (user_id, _) = common::create_test_user(&pool, "arch@test.com", "Arnav", Role::Architect).await;

    server
        .post("/api/auth/sign-in/email")
        .json(&json!({ "email": "arch@test.com", "password": "wrong-password" }))
        .await
        .assert_status(StatusCode::UNAUTHORIZED);

    let res = server
        .post("/api/auth/sign-in/email")
        .json(&json!({ "email": "arch@test.com", "password": common::TEST_PASSWORD }))
        .await;
    res.assert_status_ok();
    let token = res.json::<serde_json::Value>()["token"].as_str().unwrap().to_string();

    let (h, v) = auth_header(&token);
    let session: serde_json::Value = server.get("/api/auth/get-session").add_header(h, v).await.json();
    assert_eq!(session["user"]["id"], user_id);
    assert_eq!(session["user"]["role"], "architect");
}

#[tokio::test]
async fn sign_out_invalidates_the_token() {
    let (server, pool) = setup().await;
    let (_, token) = common::create_test_user(&pool, "arch@test.com", "Arnav", Role::Architect).await;

    let (h, v) = auth_header(&token);
    server.post("/api/auth/sign-out").add_header(h, v).await.assert_status_ok();

    let (h, v) = auth_header(&token);
    let session: serde_json::Value = server.get("/api/auth/get-session").add_header(h, v).await.json();
    assert!(session.is_null());

    let (h, v) = auth_header(&token);
    server.get("/api/users/me").add_header(h, v).await.assert_status(StatusCode::UNAUTHORIZED);
}

#[tokio::test]
async fn expired_session_is_rejected() {
    let (server, pool) = setup().await;
    let (_, token) = common::create_test_user(&pool, "arch@test.com", "Arnav", Role::Architect).await;

    sqlx::query(r#"UPDATE "session" SET expires_at = '2000-01-01T00:00:00.000000Z' WHERE token = ?"#)
        .bind(&token)
        .execute(&pool)
        .await
        .unwrap();

    let (h, v) = auth_header(&token);
    server.get("/api/users/me").add_header(h, v).await.assert_status(StatusCode::UNAUTHORIZED);
}

#[tokio::test]
async fn session_cookie_is_accepted() {
    let (server, pool) = setup().await;
    let (user_id, token) = common::create_test_user(&pool, "arch@test.com", "Arnav", Role::Architect).await;

    let res = server
        .get("/api/users/me")
        .add_header(
            axum::http::header::COOKIE,
            format!("archlink.session_token={token}").parse::<axum::http::HeaderValue>().unwrap(),
        )
        .await;
    res.assert_status_ok();
    assert_eq!(res.json::<serde_json::Value>()["id"], user_id);
}

#[tokio::test]
async fn failed_sign_up_leaves_no_partial_user() {
    let (server, pool) = setup().await;
    sqlx::query(
        r#"CREATE TRIGGER reject_accounts BEFORE INSERT ON "account"
           BEGIN SELECT RAISE(ABORT, 'accounts unavailable'); END"#,
    )
    .execute(&pool)
    .await
    .unwrap();

    let sign_up = json!({
        "email": "olivia@test.com",
        "password": "password123",
        "name": "Olivia",
        "role": "homeowner"
    });
    let res = server.post("/api/auth/sign-up/email").json(&sign_up).await;
    assert!(!res.status_code().is_success());

    let users: i64 = sqlx::query_scalar(r#"SELECT COUNT(*) FROM "user""#)
        .fetch_one(&pool)
        .await
        .unwrap();
    assert_eq!(users, 0);

    sqlx::query("DROP TRIGGER reject_accounts")
        .execute(&pool)
        .await
        .unwrap();
    server
        .post("/api/auth/sign-up/email")
        .json(&sign_up)
        .await
        .assert_status_ok();
}
