use axum::{
    extract::{Path, Query, State},
    Json,
};
use serde::Deserialize;
use std::sync::Arc;

use crate::error::AppResult;
use crate::models::{
    AuthUser, ConversationListItem, ConversationResponse, CreateConversationRequest, Message,
    PaginatedResponse, SendMessageRequest, UnreadCount, UpdateConversationRequest,
};
use crate::social::conversations;
use crate::AppState;

#[derive(Deserialize)]
pub struct MessageQuery {
    pub before: Option<String>,
    pub limit: Option<i64>,
}

/// GET /api/conversations
pub async fn list_conversations(
    State(state): State<Arc<AppState>>,
    user: AuthUser,
) -> AppResult<Json<Vec<ConversationListItem>>> {
    Ok(Json(conversations::list_conversations(&state.db, &user.id).await?))
}

/// POST /api/conversations
pub async fn create_conversation(
    State(state): State<Arc<AppState>>,
    user: AuthUser,
    Json(body): Json<CreateConversationRequest>,
) -> AppResult<Json<ConversationResponse>> {
    let conversation = conversations::create_conversation(
        &state,
        &user,
        &body.user_id,
        body.initial_message.as_deref(),
    )
    .await?;
    Ok(Json(conversation))
}

/// GET /api/conversations/{conversationId}
pub async fn get_conversation(
    State(state): State<Arc<AppState>>,
    user: AuthUser,
    Path(conversation_id): Path<String>,
) -> AppResult<Json<ConversationResponse>> {
    Ok(Json(
        conversations::conversation_view(&state.db, &conversation_id, &user.id).await?,
    ))
}

/// PATCH /api/conversations/{conversationId}
pub async fn update_conversation(
    State(state): State<Arc<AppState>>,
    user: AuthUser,
    Path(conversation_id): Path<String>,
    Json(body): Json<UpdateConversationRequest>,
) -> AppResult<Json<ConversationResponse>> {
    Ok(Json(
        conversations::set_status(&state.db, &conversation_id, &user.id, body.status).await?,
    ))
}

/// GET /api/conversations/{conversationId}/messages
pub async fn list_messages(
    State(state): State<Arc<AppState>>,
    user: AuthUser,
    Path(conversation_id): Path<String>,
    Query(query): Query<MessageQuery>,
) -> AppResult<Json<PaginatedResponse<Message>>> {
    let page = conversations::list_messages(
        &state.db,
        &conversation_id,
        &user.id,
        query.before.as_deref(),
        query.limit.unwrap_or(state.config.message_page_size),
    )
    .await?;
    Ok(Json(page))
}

/// POST /api/conversations/{conversationId}/messages
pub async fn send_message(
    State(state): State<Arc<AppState>>,
    user: AuthUser,
    Path(conversation_id): Path<String>,
    Json(body): Json<SendMessageRequest>,
) -> AppResult<Json<Message>> {
    Ok(Json(
        conversations::send_message(&state, &conversation_id, &user, &body.content).await?,
    ))
}

/// POST /api/conversations/{conversationId}/read
pub async fn mark_read(
    State(state): State<Arc<AppState>>,
    user: AuthUser,
    Path(conversation_id): Path<String>,
) -> AppResult<Json<serde_json::Value>> {
    let updated = conversations::mark_read(&state, &conversation_id, &user.id).await?;
    Ok(Json(serde_json::json!({ "updated": updated })))
}

/// GET /api/conversations/unread-count
pub async fn unread_count(
    State(state): State<Arc<AppState>>,
    user: AuthUser,
) -> AppResult<Json<UnreadCount>> {
    let unread = conversations::unread_count(&state.db, &user.id).await?;
    Ok(Json(UnreadCount { unread }))
}
