use crate::AppState;
use crate::models::AuthUser;
use crate::social::{conversations, notifications};
use crate::ws::events::ServerEvent;
use crate::ws::gateway::{ClientId, Topic};

/// Subscribes the session to its own inboxes and sends the `ready` frame.
pub async fn on_connect(state: &AppState, client_id: ClientId, user: &AuthUser) {
    state
        .gateway
        .subscribe(client_id, Topic::notifications(&user.id))
        .await;
    state
        .gateway
        .subscribe(client_id, Topic::hiring(&user.id))
        .await;

    let unread_messages = conversations::unread_count(&state.db, &user.id)
        .await
        .unwrap_or_else(|e| {
            tracing::warn!(user = %user.id, error = %e, "Failed to count unread messages");
            0
        });
    let unread_notifications = notifications::unread_count(&state.db, &user.id)
        .await
        .unwrap_or_else(|e| {
            tracing::warn!(user = %user.id, error = %e, "Failed to count unread notifications");
            0
        });

    state
        .gateway
        .send_to(
            client_id,
            &ServerEvent::Ready {
                user_id: user.id.clone(),
                unread_messages,
                unread_notifications,
            },
        )
        .await;

    tracing::info!(client = client_id, user = %user.id, "Gateway session opened");
}

pub async fn on_disconnect(state: &AppState, client_id: ClientId, user: &AuthUser) {
    let topics = state
        .gateway
        .unregister(client_id)
        .await
        .map(|c| c.topics.len())
        .unwrap_or(0);

    tracing::info!(client = client_id, user = %user.id, topics, "Gateway session closed");
}
