mod broadcast;

use serde::{Deserialize, Serialize};
use std::collections::{HashMap, HashSet};
use tokio::sync::{mpsc, RwLock};

pub type ClientId = u64;

/// Entity kind a subscription is keyed on.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum TopicKind {
    /// Message inserts/updates, keyed by conversation id.
    Message,
    /// Notification inserts, keyed by recipient user id.
    Notification,
    /// Hiring request changes, keyed by participant user id.
    Hiring,
}

/// "Change events for entity kind X filtered by key Y".
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct Topic {
    pub kind: TopicKind,
    pub key: String,
}

impl Topic {
    pub fn new(kind: TopicKind, key: impl Into<String>) -> Self {
        Self {
            kind,
            key: key.into(),
        }
    }

    pub fn conversation(conversation_id: &str) -> Self {
        Self::new(TopicKind::Message, conversation_id)
    }

    pub fn notifications(user_id: &str) -> Self {
        Self::new(TopicKind::Notification, user_id)
    }

    pub fn hiring(user_id: &str) -> Self {
        Self::new(TopicKind::Hiring, user_id)
    }
}

pub struct ConnectedClient {
    pub user_id: String,
    pub tx: mpsc::UnboundedSender<String>,
    pub topics: HashSet<Topic>,
}

/// In-process pub/sub hub between the store mutations and open sessions.
///
/// Delivery is fire-and-forget: there is no acknowledgement, no replay and no
/// backpressure. A session that misses events re-fetches on its next mount.
pub struct GatewayState {
    next_id: RwLock<u64>,
    pub clients: RwLock<HashMap<ClientId, ConnectedClient>>,
    pub subscriptions: RwLock<HashMap<Topic, HashSet<ClientId>>>,
}

impl Default for GatewayState {
    fn default() -> Self {
        Self::new()
    }
}

impl GatewayState {
    pub fn new() -> Self {
        Self {
            next_id: RwLock::new(1),
            clients: RwLock::new(HashMap::new()),
            subscriptions: RwLock::new(HashMap::new()),
        }
    }

    pub async fn next_client_id(&self) -> ClientId {
        let mut id = self.next_id.write().await;
        let current = *id;
        *id += 1;
        current
    }

    pub async fn register(
        &self,
        client_id: ClientId,
        user_id: String,
        tx: mpsc::UnboundedSender<String>,
    ) {
        let client = ConnectedClient {
            user_id,
            tx,
            topics: HashSet::new(),
        };
        self.clients.write().await.insert(client_id, client);
    }

    /// Removes the client and every subscription it held.
    ///
    /// Lock order everywhere is `clients` then `subscriptions`, held together
    /// so a concurrent subscribe cannot leave a stale id behind.
    pub async fn unregister(&self, client_id: ClientId) -> Option<ConnectedClient> {
        let mut clients = self.clients.write().await;
        let client = clients.remove(&client_id)?;

        let mut subs = self.subscriptions.write().await;
        for topic in &client.topics {
            if let Some(set) = subs.get_mut(topic) {
                set.remove(&client_id);
                if set.is_empty() {
                    subs.remove(topic);
                }
            }
        }

        Some(client)
    }

    /// Returns false if the client is not registered.
    pub async fn subscribe(&self, client_id: ClientId, topic: Topic) -> bool {
        let mut clients = self.clients.write().await;
        let Some(client) = clients.get_mut(&client_id) else {
            return false;
        };

        let mut subs = self.subscriptions.write().await;
        client.topics.insert(topic.clone());
        subs.entry(topic).or_default().insert(client_id);
        true
    }

    pub async fn unsubscribe(&self, client_id: ClientId, topic: &Topic) {
        let mut clients = self.clients.write().await;
        let mut subs = self.subscriptions.write().await;

        if let Some(set) = subs.get_mut(topic) {
            set.remove(&client_id);
            if set.is_empty() {
                subs.remove(topic);
            }
        }
        if let Some(client) = clients.get_mut(&client_id) {
            client.topics.remove(topic);
        }
    }

    pub async fn subscriber_count(&self, topic: &Topic) -> usize {
        self.subscriptions
            .read()
            .await
            .get(topic)
            .map(|set| set.len())
            .unwrap_or(0)
    }

    pub async fn is_user_subscribed(&self, user_id: &str, topic: &Topic) -> bool {
        let clients = self.clients.read().await;
        let subs = self.subscriptions.read().await;
        subs.get(topic)
            .map(|ids| {
                ids.iter()
                    .filter_map(|cid| clients.get(cid))
                    .any(|c| c.user_id == user_id)
            })
            .unwrap_or(false)
    }

    pub async fn connected_clients(&self) -> usize {
        self.clients.read().await.len()
    }
}
