use crate::AppState;
use crate::error::{AppError, AppResult};
use crate::models::AuthUser;
use crate::social::conversations;
use crate::ws::events::ServerEvent;
use crate::ws::gateway::{ClientId, Topic, TopicKind};

/// Message topics need conversation membership; inbox topics must be the
/// caller's own.
pub async fn handle_subscribe(
    state: &AppState,
    client_id: ClientId,
    user: &AuthUser,
    topic: Topic,
) -> AppResult<()> {
    match topic.kind {
        TopicKind::Message => {
            conversations::ensure_participant(&state.db, &topic.key, &user.id).await?;
        }
        TopicKind::Notification | TopicKind::Hiring => {
            if topic.key != user.id {
                return Err(AppError::Forbidden("Cannot subscribe to another user's events".into()));
            }
        }
    }

    if !state.gateway.subscribe(client_id, topic.clone()).await {
        return Err(AppError::Internal("Session is no longer registered".into()));
    }

    state
        .gateway
        .send_to(
            client_id,
            &ServerEvent::Subscribed {
                kind: topic.kind,
                key: topic.key,
            },
        )
        .await;
    Ok(())
}

pub async fn handle_unsubscribe(state: &AppState, client_id: ClientId, topic: Topic) -> AppResult<()> {
    state.gateway.unsubscribe(client_id, &topic).await;
    state
        .gateway
        .send_to(
            client_id,
            &ServerEvent::Unsubscribed {
                kind: topic.kind,
                key: topic.key,
            },
        )
        .await;
    Ok(())
}

/// The sender sees its own message through the conversation topic, the same
/// way the other participant does.
pub async fn handle_send_message(
    state: &AppState,
    user: &AuthUser,
    conversation_id: &str,
    content: &str,
) -> AppResult<()> {
    conversations::send_message(state, conversation_id, user, content).await?;
    Ok(())
}

pub async fn handle_mark_read(state: &AppState, user: &AuthUser, conversation_id: &str) -> AppResult<()> {
    conversations::mark_read(state, conversation_id, user.id.as_str()).await?;
    Ok(())
}
