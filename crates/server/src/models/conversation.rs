use serde::{Deserialize, Serialize};

use super::UserSummary;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, sqlx::Type)]
#[serde(rename_all = "lowercase")]
#[sqlx(rename_all = "lowercase")]
pub enum ConversationStatus {
    Active,
    Archived,
}

#[derive(Debug, Clone, Serialize, Deserialize, sqlx::FromRow)]
#[serde(rename_all = "camelCase")]
pub struct Conversation {
    pub id: String,
    pub homeowner_id: String,
    pub architect_id: String,
    pub status: ConversationStatus,
    pub created_at: String,
    pub updated_at: String,
}

impl Conversation {
    pub fn has_participant(&self, user_id: &str) -> bool {
        self.homeowner_id == user_id || self.architect_id == user_id
    }

    /// The participant that is not `user_id`.
    pub fn other_participant(&self, user_id: &str) -> &str {
        if self.homeowner_id == user_id {
            &self.architect_id
        } else {
            &self.homeowner_id
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize, sqlx::FromRow)]
#[serde(rename_all = "camelCase")]
pub struct Message {
    pub id: String,
    pub conversation_id: String,
    pub sender_id: String,
    pub content: String,
    pub created_at: String,
    pub read_at: Option<String>,
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ConversationResponse {
    pub id: String,
    pub status: ConversationStatus,
    pub other_user: UserSummary,
    pub created_at: String,
    pub updated_at: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub initial_message: Option<Message>,
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ConversationListItem {
    pub id: String,
    pub status: ConversationStatus,
    pub other_user: UserSummary,
    pub last_message: Option<Message>,
    pub unread_count: i64,
    pub created_at: String,
    pub updated_at: String,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CreateConversationRequest {
    pub user_id: String,
    pub initial_message: Option<String>,
}

#[derive(Debug, Deserialize)]
pub struct SendMessageRequest {
    pub content: String,
}

#[derive(Debug, Deserialize)]
pub struct UpdateConversationRequest {
    pub status: ConversationStatus,
}
