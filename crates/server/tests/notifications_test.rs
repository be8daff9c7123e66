mod common;

use archlink_server::models::{NotificationKind, Role};
use archlink_server::social::notifications;
use axum::http::StatusCode;
use axum_test::TestServer;
use common::auth_header;

async fn setup() -> (TestServer, sqlx::SqlitePool, archlink_server::models::AuthUser, String) {
    let pool = common::setup_test_db().await;
    let state = common::create_test_state(pool.clone());
    let (user, token) = common::create_auth_user(&pool, "arch@test.com", "Arnav", Role::Architect).await;

    for i in 0..12 {
        notifications::notify(&state, &user.id, NotificationKind::Like, &format!("like {i}"), None)
            .await
            .unwrap();
    }

    let server = TestServer::new(common::create_test_app_with_state(state)).unwrap();
    (server, pool, user, token)
}

#[tokio::test]
async fn recent_defaults_to_ten_newest_first() {
    let (server, _pool, _user, token) = setup().await;

    let (h, v) = auth_header(&token);
    let res = server.get("/api/notifications").add_header(h, v).await;
    res.assert_status_ok();
    let items: Vec<serde_json::Value> = res.json();
    assert_eq!(items.len(), 10);
    assert_eq!(items[0]["content"], "like 11");
    assert_eq!(items[9]["content"], "like 2");
}

#[tokio::test]
async fn limit_is_clamped() {
    let (server, _pool, _user, token) = setup().await;

    let (h, v) = auth_header(&token);
    let items: Vec<serde_json::Value> = server
        .get("/api/notifications")
        .add_query_param("limit", 0)
        .add_header(h, v)
        .await
        .json();
    assert_eq!(items.len(), 1);

    let (h, v) = auth_header(&token);
    let items: Vec<serde_json::Value> = server
        .get("/api/notifications")
        .add_query_param("limit", 500)
        .add_header(h, v)
        .await
        .json();
    assert_eq!(items.len(), 12);
}

#[tokio::test]
async fn mark_all_read_clears_unread_count() {
    let (server, _pool, _user, token) = setup().await;

    let (h, v) = auth_header(&token);
    let unread: serde_json::Value = server
        .get("/api/notifications/unread-count")
        .add_header(h, v)
        .await
        .json();
    assert_eq!(unread["unread"], 12);

    let (h, v) = auth_header(&token);
    let res = server.post("/api/notifications/read-all").add_header(h, v).await;
    res.assert_status_ok();
    assert_eq!(res.json::<serde_json::Value>()["updated"], 12);

    let (h, v) = auth_header(&token);
    let res = server.post("/api/notifications/read-all").add_header(h, v).await;
    assert_eq!(res.json::<serde_json::Value>()["updated"], 0);

    let (h, v) = auth_header(&token);
    let unread: serde_json::Value = server
        .get("/api/notifications/unread-count")
        .add_header(h, v)
        .await
        .json();
    assert_eq!(unread["unread"], 0);
}

#[tokio::test]
async fn single_read_is_owner_only_and_keeps_timestamp() {
    let (server, pool, user, token) = setup().await;
    let (_, other_token) = common::create_test_user(&pool, "x@test.com", "Xavier", Role::Homeowner).await;

    let id: String = sqlx::query_scalar("SELECT id FROM notifications WHERE user_id = ? LIMIT 1")
        .bind(&user.id)
        .fetch_one(&pool)
        .await
        .unwrap();

    let (h, v) = auth_header(&other_token);
    server
        .post(&format!("/api/notifications/{id}/read"))
        .add_header(h, v)
        .await
        .assert_status(StatusCode::FORBIDDEN);

    let (h, v) = auth_header(&token);
    let first: serde_json::Value = server
        .post(&format!("/api/notifications/{id}/read"))
        .add_header(h, v)
        .await
        .json();
    assert!(first["readAt"].is_string());

    let (h, v) = auth_header(&token);
    let second: serde_json::Value = server
        .post(&format!("/api/notifications/{id}/read"))
        .add_header(h, v)
        .await
        .json();
    assert_eq!(first["readAt"], second["readAt"]);

    let (h, v) = auth_header(&token);
    server
        .post("/api/notifications/missing/read")
        .add_header(h, v)
        .await
        .assert_status(StatusCode::NOT_FOUND);
}
