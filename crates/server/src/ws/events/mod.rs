mod server_event;

pub use server_event::ServerEvent;

use serde::Deserialize;

use crate::ws::gateway::TopicKind;

// ── Client → Server Events ──

#[derive(Debug, Deserialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum ClientEvent {
    Subscribe {
        kind: TopicKind,
        key: String,
    },
    Unsubscribe {
        kind: TopicKind,
        key: String,
    },
    SendMessage {
        #[serde(rename = "conversationId")]
        conversation_id: String,
        content: String,
    },
    MarkRead {
        #[serde(rename = "conversationId")]
        conversation_id: String,
    },
    Ping,
}
