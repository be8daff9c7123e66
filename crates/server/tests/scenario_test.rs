mod common;

use archlink_server::models::{HireStatus, Role};
use archlink_server::social::{conversations, follows, hiring, interactions};

async fn notifications_of(pool: &sqlx::SqlitePool, user_id: &str, kind: &str) -> i64 {
    sqlx::query_scalar("SELECT COUNT(*) FROM notifications WHERE user_id = ? AND type = ?")
        .bind(user_id)
        .bind(kind)
        .fetch_one(pool)
        .await
        .unwrap()
}

#[tokio::test]
async fn follow_hire_then_talk() {
    let pool = common::setup_test_db().await;
    let state = common::create_test_state(pool.clone());
    let (h, _) = common::create_auth_user(&pool, "h@test.com", "Hana", Role::Homeowner).await;
    let (arc, _) = common::create_auth_user(&pool, "arc@test.com", "Arc Studio", Role::Architect).await;

    follows::follow(&state, &h, &arc.id).await.unwrap();
    assert!(follows::is_following(&pool, &h.id, &arc.id).await.unwrap());
    assert_eq!(notifications_of(&pool, &arc.id, "follow").await, 1);

    let request = hiring::hire(&state, &h, &arc.id, "Interested in a kitchen remodel", None)
        .await
        .unwrap();
    assert_eq!(request.status, HireStatus::Pending);
    let pending: i64 = sqlx::query_scalar(
        "SELECT COUNT(*) FROM hiring_requests WHERE homeowner_id = ? AND architect_id = ? AND status = 'pending'",
    )
    .bind(&h.id)
    .bind(&arc.id)
    .fetch_one(&pool)
    .await
    .unwrap();
    assert_eq!(pending, 1);

    let conversation = conversations::create_conversation(&state, &h, &arc.id, Some("Hi, let's talk"))
        .await
        .unwrap();

    let conversation_count: i64 = sqlx::query_scalar(
        "SELECT COUNT(*) FROM conversations WHERE homeowner_id = ? AND architect_id = ?",
    )
    .bind(&h.id)
    .bind(&arc.id)
    .fetch_one(&pool)
    .await
    .unwrap();
    assert_eq!(conversation_count, 1);

    let page = conversations::list_messages(&pool, &conversation.id, &arc.id, None, 50)
        .await
        .unwrap();
    assert_eq!(page.items.len(), 1);
    assert_eq!(page.items[0].content, "Hi, let's talk");
    assert!(page.items[0].read_at.is_none());

    assert_eq!(notifications_of(&pool, &arc.id, "message").await, 1);
    assert_eq!(notifications_of(&pool, &arc.id, "follow").await, 1);
    let total: i64 = sqlx::query_scalar("SELECT COUNT(*) FROM notifications WHERE user_id = ?")
        .bind(&arc.id)
        .fetch_one(&pool)
        .await
        .unwrap();
    assert_eq!(total, 2);
}

#[tokio::test]
async fn concurrent_likes_store_one_row() {
    let pool = common::setup_test_db().await;
    let state = common::create_test_state(pool.clone());
    let (arch, _) = common::create_auth_user(&pool, "arch@test.com", "Arnav", Role::Architect).await;
    let (user, _) = common::create_auth_user(&pool, "u@test.com", "Uma", Role::Homeowner).await;
    let post = common::create_test_post(&pool, &arch.id, "Glass pavilion").await;

    let (a, b) = tokio::join!(
        interactions::like(&state, &user, &post),
        interactions::like(&state, &user, &post),
    );
    let (a, b) = (a.unwrap(), b.unwrap());
    assert!(a.liked && b.liked);

    let rows: i64 = sqlx::query_scalar("SELECT COUNT(*) FROM likes WHERE user_id = ? AND post_id = ?")
        .bind(&user.id)
        .bind(&post)
        .fetch_one(&pool)
        .await
        .unwrap();
    assert_eq!(rows, 1);
    assert_eq!(notifications_of(&pool, &arch.id, "like").await, 1);
}
