use serde::Serialize;

use crate::models::{HiringRequest, Message, Notification};
use crate::ws::gateway::TopicKind;

// ── Server → Client Events ──

#[derive(Debug, Clone, Serialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum ServerEvent {
    Ready {
        #[serde(rename = "userId")]
        user_id: String,
        #[serde(rename = "unreadMessages")]
        unread_messages: i64,
        #[serde(rename = "unreadNotifications")]
        unread_notifications: i64,
    },
    Subscribed {
        kind: TopicKind,
        key: String,
    },
    Unsubscribed {
        kind: TopicKind,
        key: String,
    },
    MessageCreated {
        message: Message,
    },
    MessagesRead {
        #[serde(rename = "conversationId")]
        conversation_id: String,
        #[serde(rename = "readerId")]
        reader_id: String,
        #[serde(rename = "readAt")]
        read_at: String,
        count: u64,
    },
    NotificationCreated {
        notification: Notification,
    },
    HiringRequestUpdated {
        request: HiringRequest,
    },
    Error {
        message: String,
    },
    Pong,
}
