use axum::{
    extract::{Path, Query, State},
    Json,
};
use serde::Deserialize;
use std::sync::Arc;

use crate::error::AppResult;
use crate::models::{AuthUser, Notification, UnreadCount};
use crate::social::notifications;
use crate::AppState;

#[derive(Deserialize)]
pub struct NotificationQuery {
    pub limit: Option<i64>,
}

/// GET /api/notifications
pub async fn list_notifications(
    State(state): State<Arc<AppState>>,
    user: AuthUser,
    Query(query): Query<NotificationQuery>,
) -> AppResult<Json<Vec<Notification>>> {
    Ok(Json(
        notifications::list_recent(&state.db, &user.id, query.limit).await?,
    ))
}

/// GET /api/notifications/unread-count
pub async fn unread_count(
    State(state): State<Arc<AppState>>,
    user: AuthUser,
) -> AppResult<Json<UnreadCount>> {
    let unread = notifications::unread_count(&state.db, &user.id).await?;
    Ok(Json(UnreadCount { unread }))
}

/// POST /api/notifications/read-all
pub async fn mark_all_read(
    State(state): State<Arc<AppState>>,
    user: AuthUser,
) -> AppResult<Json<serde_json::Value>> {
    let updated = notifications::mark_all_read(&state.db, &user.id).await?;
    Ok(Json(serde_json::json!({ "updated": updated })))
}

/// POST /api/notifications/{notificationId}/read
pub async fn mark_read(
    State(state): State<Arc<AppState>>,
    user: AuthUser,
    Path(notification_id): Path<String>,
) -> AppResult<Json<Notification>> {
    Ok(Json(
        notifications::mark_read(&state.db, &notification_id, &user.id).await?,
    ))
}
