use sqlx::SqlitePool;

use archlink_shared::constants::{MAX_NOTIFICATIONS_LIMIT, RECENT_NOTIFICATIONS_LIMIT};

use crate::error::{AppError, AppResult};
use crate::models::{Notification, NotificationKind};
use crate::ws::events::ServerEvent;
use crate::ws::gateway::Topic;
use crate::AppState;

/// Appends one inbox row and pushes it to the recipient's open sessions.
pub async fn notify(
    state: &AppState,
    user_id: &str,
    kind: NotificationKind,
    content: &str,
    related_id: Option<&str>,
) -> AppResult<Notification> {
    let notification = Notification {
        id: uuid::Uuid::new_v4().to_string(),
        user_id: user_id.to_string(),
        kind,
        content: content.to_string(),
        related_id: related_id.map(str::to_string),
        created_at: crate::db::now(),
        read_at: None,
    };

    sqlx::query(
        r#"INSERT INTO notifications (id, user_id, type, content, related_id, created_at)
           VALUES (?, ?, ?, ?, ?, ?)"#,
    )
    .bind(&notification.id)
    .bind(&notification.user_id)
    .bind(notification.kind)
    .bind(&notification.content)
    .bind(&notification.related_id)
    .bind(&notification.created_at)
    .execute(&state.db)
    .await?;

    state
        .gateway
        .publish(
            &Topic::notifications(user_id),
            &ServerEvent::NotificationCreated {
                notification: notification.clone(),
            },
        )
        .await;

    Ok(notification)
}

/// Newest first. `limit` defaults to 10 and is clamped to 1..=100.
pub async fn list_recent(
    db: &SqlitePool,
    user_id: &str,
    limit: Option<i64>,
) -> AppResult<Vec<Notification>> {
    let limit = limit
        .unwrap_or(RECENT_NOTIFICATIONS_LIMIT)
        .clamp(1, MAX_NOTIFICATIONS_LIMIT);

    let items = sqlx::query_as::<_, Notification>(
        "SELECT * FROM notifications WHERE user_id = ? ORDER BY created_at DESC, rowid DESC LIMIT ?",
    )
    .bind(user_id)
    .bind(limit)
    .fetch_all(db)
    .await?;

    Ok(items)
}

/// Marks everything unread at call time. Rows arriving concurrently may or may
/// not be included.
pub async fn mark_all_read(db: &SqlitePool, user_id: &str) -> AppResult<u64> {
    let result = sqlx::query(
        "UPDATE notifications SET read_at = ? WHERE user_id = ? AND read_at IS NULL",
    )
    .bind(crate::db::now())
    .bind(user_id)
    .execute(db)
    .await?;

    Ok(result.rows_affected())
}

pub async fn mark_read(
    db: &SqlitePool,
    notification_id: &str,
    user_id: &str,
) -> AppResult<Notification> {
    let owner = sqlx::query_scalar::<_, String>("SELECT user_id FROM notifications WHERE id = ?")
        .bind(notification_id)
        .fetch_optional(db)
        .await?
        .ok_or_else(|| AppError::not_found("Notification"))?;

    if owner != user_id {
        return Err(AppError::Forbidden("Not your notification".into()));
    }

    sqlx::query("UPDATE notifications SET read_at = ? WHERE id = ? AND read_at IS NULL")
        .bind(crate::db::now())
        .bind(notification_id)
        .execute(db)
        .await?;

    let notification = sqlx::query_as::<_, Notification>("SELECT * FROM notifications WHERE id = ?")
        .bind(notification_id)
        .fetch_one(db)
        .await?;

    Ok(notification)
}

pub async fn unread_count(db: &SqlitePool, user_id: &str) -> AppResult<i64> {
    let count = sqlx::query_scalar::<_, i64>(
        "SELECT COUNT(*) FROM notifications WHERE user_id = ? AND read_at IS NULL",
    )
    .bind(user_id)
    .fetch_one(db)
    .await?;

    Ok(count)
}
