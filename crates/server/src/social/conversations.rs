use sqlx::SqlitePool;

use archlink_shared::constants::MAX_MESSAGE_PAGE_SIZE;
use archlink_shared::validation;

use crate::error::{AppError, AppResult};
use crate::models::{
    AuthUser, Conversation, ConversationListItem, ConversationResponse, ConversationStatus,
    Message, NotificationKind, PaginatedResponse, Role,
};
use crate::ws::events::ServerEvent;
use crate::ws::gateway::Topic;
use crate::AppState;

use super::{notifications, users};

/// Finds or creates the single conversation between a homeowner and an
/// architect, optionally sending a first message.
///
/// The row is written with an upsert on the (homeowner, architect) unique pair
/// and then read back, so concurrent callers converge on the same id. An
/// archived conversation comes back active. The steps are not rolled back if
/// the initial message fails; the call reports the failure.
pub async fn create_conversation(
    state: &AppState,
    actor: &AuthUser,
    other_id: &str,
    initial_message: Option<&str>,
) -> AppResult<ConversationResponse> {
    let initial_message = match initial_message.map(str::trim).filter(|m| !m.is_empty()) {
        Some(m) => Some(validation::validate_message_content(m).map_err(AppError::Validation)?),
        None => None,
    };

    if actor.id == other_id {
        return Err(AppError::Validation("You cannot start a conversation with yourself".into()));
    }

    let other = users::fetch_summary(&state.db, other_id).await?;
    let (homeowner_id, architect_id) = match (actor.role, other.role) {
        (Role::Homeowner, Role::Architect) => (&actor.id, &other.id),
        (Role::Architect, Role::Homeowner) => (&other.id, &actor.id),
        _ => {
            return Err(AppError::Validation(
                "Conversations are between a homeowner and an architect".into(),
            ))
        }
    };

    let now = crate::db::now();
    let result = sqlx::query(
        r#"INSERT INTO conversations (id, homeowner_id, architect_id, status, created_at, updated_at)
           VALUES (?, ?, ?, 'active', ?, ?)
           ON CONFLICT(homeowner_id, architect_id) DO UPDATE
               SET status = 'active', updated_at = excluded.updated_at
               WHERE conversations.status <> 'active'"#,
    )
    .bind(uuid::Uuid::new_v4().to_string())
    .bind(homeowner_id)
    .bind(architect_id)
    .bind(&now)
    .bind(&now)
    .execute(&state.db)
    .await?;

    let conversation = sqlx::query_as::<_, Conversation>(
        "SELECT * FROM conversations WHERE homeowner_id = ? AND architect_id = ?",
    )
    .bind(homeowner_id)
    .bind(architect_id)
    .fetch_one(&state.db)
    .await?;

    tracing::debug!(
        conversation = %conversation.id,
        written = result.rows_affected(),
        "Conversation resolved"
    );

    let initial_message = match initial_message {
        Some(content) => Some(insert_message(state, &conversation, actor, content).await?),
        None => None,
    };

    let mut response = to_response(conversation, other);
    if let Some(ref message) = initial_message {
        response.updated_at = message.created_at.clone();
        response.status = ConversationStatus::Active;
    }
    response.initial_message = initial_message;
    Ok(response)
}

pub async fn get_conversation(db: &SqlitePool, conversation_id: &str) -> AppResult<Conversation> {
    sqlx::query_as::<_, Conversation>("SELECT * FROM conversations WHERE id = ?")
        .bind(conversation_id)
        .fetch_optional(db)
        .await?
        .ok_or_else(|| AppError::not_found("Conversation"))
}

/// Loads the conversation and checks `user_id` is one of its two participants.
pub async fn ensure_participant(
    db: &SqlitePool,
    conversation_id: &str,
    user_id: &str,
) -> AppResult<Conversation> {
    let conversation = get_conversation(db, conversation_id).await?;
    if !conversation.has_participant(user_id) {
        return Err(AppError::Forbidden("Not a participant".into()));
    }
    Ok(conversation)
}

pub async fn conversation_view(
    db: &SqlitePool,
    conversation_id: &str,
    viewer_id: &str,
) -> AppResult<ConversationResponse> {
    let conversation = ensure_participant(db, conversation_id, viewer_id).await?;
    let other = users::fetch_summary(db, conversation.other_participant(viewer_id)).await?;
    Ok(to_response(conversation, other))
}

fn to_response(conversation: Conversation, other_user: crate::models::UserSummary) -> ConversationResponse {
    ConversationResponse {
        id: conversation.id,
        status: conversation.status,
        other_user,
        created_at: conversation.created_at,
        updated_at: conversation.updated_at,
        initial_message: None,
    }
}

/// Appends a message, pushes it to the conversation's subscribers and
/// notifies the recipient. Blank content is rejected before any store call.
pub async fn send_message(
    state: &AppState,
    conversation_id: &str,
    sender: &AuthUser,
    content: &str,
) -> AppResult<Message> {
    let content = validation::validate_message_content(content).map_err(AppError::Validation)?;
    let conversation = ensure_participant(&state.db, conversation_id, &sender.id).await?;
    insert_message(state, &conversation, sender, content).await
}

async fn insert_message(
    state: &AppState,
    conversation: &Conversation,
    sender: &AuthUser,
    content: &str,
) -> AppResult<Message> {
    let message = Message {
        id: uuid::Uuid::new_v4().to_string(),
        conversation_id: conversation.id.clone(),
        sender_id: sender.id.clone(),
        content: content.to_string(),
        created_at: crate::db::now(),
        read_at: None,
    };

    sqlx::query(
        r#"INSERT INTO messages (id, conversation_id, sender_id, content, created_at)
           VALUES (?, ?, ?, ?, ?)"#,
    )
    .bind(&message.id)
    .bind(&message.conversation_id)
    .bind(&message.sender_id)
    .bind(&message.content)
    .bind(&message.created_at)
    .execute(&state.db)
    .await?;

    sqlx::query("UPDATE conversations SET updated_at = ?, status = 'active' WHERE id = ?")
        .bind(&message.created_at)
        .bind(&conversation.id)
        .execute(&state.db)
        .await?;

    state
        .gateway
        .publish(
            &Topic::conversation(&conversation.id),
            &ServerEvent::MessageCreated {
                message: message.clone(),
            },
        )
        .await;

    notifications::notify(
        state,
        conversation.other_participant(&sender.id),
        NotificationKind::Message,
        &format!("New message from {}", sender.name),
        Some(&conversation.id),
    )
    .await?;

    Ok(message)
}

/// Newest page of messages, returned oldest-first. `before` is the cursor from
/// a previous page: the id of its oldest message. Paging is keyed on
/// `(created_at, rowid)` so messages sharing a timestamp are never skipped.
pub async fn list_messages(
    db: &SqlitePool,
    conversation_id: &str,
    reader_id: &str,
    before: Option<&str>,
    limit: i64,
) -> AppResult<PaginatedResponse<Message>> {
    ensure_participant(db, conversation_id, reader_id).await?;

    let limit = limit.clamp(1, MAX_MESSAGE_PAGE_SIZE);

    let mut items = if let Some(cursor) = before {
        sqlx::query_as::<_, Message>(
            r#"SELECT * FROM messages
               WHERE conversation_id = ?1
                 AND (created_at, rowid) < (
                     SELECT created_at, rowid FROM messages
                     WHERE id = ?2 AND conversation_id = ?1
                 )
               ORDER BY created_at DESC, rowid DESC LIMIT ?3"#,
        )
        .bind(conversation_id)
        .bind(cursor)
        .bind(limit + 1)
        .fetch_all(db)
        .await?
    } else {
        sqlx::query_as::<_, Message>(
            r#"SELECT * FROM messages WHERE conversation_id = ?
               ORDER BY created_at DESC, rowid DESC LIMIT ?"#,
        )
        .bind(conversation_id)
        .bind(limit + 1)
        .fetch_all(db)
        .await?
    };

    let has_more = items.len() as i64 > limit;
    if has_more {
        items.pop();
    }
    items.reverse();

    let cursor = items.first().map(|m| m.id.clone());

    Ok(PaginatedResponse {
        items,
        cursor,
        has_more,
    })
}

/// Stamps every unread message from the other participant. Idempotent: rows
/// already read keep their original `read_at`.
pub async fn mark_read(state: &AppState, conversation_id: &str, reader_id: &str) -> AppResult<u64> {
    ensure_participant(&state.db, conversation_id, reader_id).await?;

    let read_at = crate::db::now();
    let result = sqlx::query(
        r#"UPDATE messages SET read_at = ?
           WHERE conversation_id = ? AND sender_id <> ? AND read_at IS NULL"#,
    )
    .bind(&read_at)
    .bind(conversation_id)
    .bind(reader_id)
    .execute(&state.db)
    .await?;

    let count = result.rows_affected();
    if count > 0 {
        state
            .gateway
            .publish(
                &Topic::conversation(conversation_id),
                &ServerEvent::MessagesRead {
                    conversation_id: conversation_id.to_string(),
                    reader_id: reader_id.to_string(),
                    read_at,
                    count,
                },
            )
            .await;
    }

    Ok(count)
}

/// Unread messages addressed to `user_id` across all of their conversations.
pub async fn unread_count(db: &SqlitePool, user_id: &str) -> AppResult<i64> {
    let count = sqlx::query_scalar::<_, i64>(
        r#"SELECT COUNT(*) FROM messages
           WHERE conversation_id IN (
               SELECT id FROM conversations WHERE homeowner_id = ? OR architect_id = ?
           )
           AND sender_id <> ? AND read_at IS NULL"#,
    )
    .bind(user_id)
    .bind(user_id)
    .bind(user_id)
    .fetch_one(db)
    .await?;

    Ok(count)
}

/// The caller's conversations, most recently active first.
pub async fn list_conversations(db: &SqlitePool, user_id: &str) -> AppResult<Vec<ConversationListItem>> {
    let conversations = sqlx::query_as::<_, Conversation>(
        r#"SELECT * FROM conversations
           WHERE homeowner_id = ? OR architect_id = ?
           ORDER BY updated_at DESC"#,
    )
    .bind(user_id)
    .bind(user_id)
    .fetch_all(db)
    .await?;

    let other_ids: Vec<String> = conversations
        .iter()
        .map(|c| c.other_participant(user_id).to_string())
        .collect();
    let others = users::fetch_summaries(db, &other_ids).await?;

    let mut result = Vec::with_capacity(conversations.len());
    for conversation in conversations {
        let other_id = conversation.other_participant(user_id);
        let Some(other_user) = others.iter().find(|u| u.id == other_id).cloned() else {
            continue;
        };

        let last_message = sqlx::query_as::<_, Message>(
            r#"SELECT * FROM messages WHERE conversation_id = ?
               ORDER BY created_at DESC, rowid DESC LIMIT 1"#,
        )
        .bind(&conversation.id)
        .fetch_optional(db)
        .await?;

        let unread_count = sqlx::query_scalar::<_, i64>(
            r#"SELECT COUNT(*) FROM messages
               WHERE conversation_id = ? AND sender_id <> ? AND read_at IS NULL"#,
        )
        .bind(&conversation.id)
        .bind(user_id)
        .fetch_one(db)
        .await?;

        result.push(ConversationListItem {
            id: conversation.id,
            status: conversation.status,
            other_user,
            last_message,
            unread_count,
            created_at: conversation.created_at,
            updated_at: conversation.updated_at,
        });
    }

    Ok(result)
}

pub async fn set_status(
    db: &SqlitePool,
    conversation_id: &str,
    actor_id: &str,
    status: ConversationStatus,
) -> AppResult<ConversationResponse> {
    ensure_participant(db, conversation_id, actor_id).await?;

    sqlx::query("UPDATE conversations SET status = ?, updated_at = ? WHERE id = ?")
        .bind(status)
        .bind(crate::db::now())
        .bind(conversation_id)
        .execute(db)
        .await?;

    conversation_view(db, conversation_id, actor_id).await
}
