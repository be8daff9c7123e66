use super::{ClientId, GatewayState, Topic};
use crate::ws::events::ServerEvent;

impl GatewayState {
    /// Pushes `event` to every session subscribed to `topic`.
    /// Returns how many sessions it was handed to.
    pub async fn publish(&self, topic: &Topic, event: &ServerEvent) -> usize {
        let msg = match serde_json::to_string(event) {
            Ok(m) => m,
            Err(e) => {
                tracing::error!(error = %e, "Failed to serialize gateway event");
                return 0;
            }
        };

        let clients = self.clients.read().await;
        let subs = self.subscriptions.read().await;

        let mut delivered = 0;
        if let Some(subscriber_ids) = subs.get(topic) {
            for cid in subscriber_ids {
                if let Some(client) = clients.get(cid) {
                    if client.tx.send(msg.clone()).is_ok() {
                        delivered += 1;
                    }
                }
            }
        }
        delivered
    }

    pub async fn send_to(&self, client_id: ClientId, event: &ServerEvent) {
        let msg = match serde_json::to_string(event) {
            Ok(m) => m,
            Err(_) => return,
        };

        let clients = self.clients.read().await;
        if let Some(client) = clients.get(&client_id) {
            let _ = client.tx.send(msg);
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tokio::sync::mpsc;

    #[tokio::test]
    async fn publish_reaches_only_subscribers_of_the_topic() {
        let gw = GatewayState::new();
        let (tx1, mut rx1) = mpsc::unbounded_channel();
        let (tx2, mut rx2) = mpsc::unbounded_channel();
        gw.register(1, "a".into(), tx1).await;
        gw.register(2, "b".into(), tx2).await;
        gw.subscribe(1, Topic::conversation("c1")).await;
        gw.subscribe(2, Topic::conversation("c2")).await;

        let n = gw.publish(&Topic::conversation("c1"), &ServerEvent::Pong).await;
        assert_eq!(n, 1);
        assert_eq!(rx1.try_recv().unwrap(), r#"{"type":"pong"}"#);
        assert!(rx2.try_recv().is_err());
    }

    #[tokio::test]
    async fn publish_with_dropped_receiver_is_ignored() {
        let gw = GatewayState::new();
        let (tx, rx) = mpsc::unbounded_channel();
        gw.register(1, "a".into(), tx).await;
        gw.subscribe(1, Topic::notifications("a")).await;
        drop(rx);

        assert_eq!(gw.publish(&Topic::notifications("a"), &ServerEvent::Pong).await, 0);
    }
}
