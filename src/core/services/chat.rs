// src/core/services/chat.rs
use chrono::Utc;
use std::sync::Arc;
use tokio::sync::broadcast;
use tracing::{info, warn};
use uuid::Uuid;

use crate::{
    core::alert::types::{AlertId, ChatMessage, UserId},
    realtime::{chat_channel, RealtimeEvent, RealtimeHub},
    storage::CommunityStore,
    utils::error::{NodeError, Result},
};

/// Per-alert chat: messages are persisted first, then broadcast to the
/// alert's channel. History is the source of truth; live delivery is
/// best-effort.
pub struct ChatService {
    store: Arc<CommunityStore>,
    hub: Arc<RealtimeHub>,
}

impl ChatService {
    pub fn new(store: Arc<CommunityStore>, hub: Arc<RealtimeHub>) -> Self {
        Self { store, hub }
    }

    pub async fn send(
        &self,
        alert_id: AlertId,
        sender: UserId,
        sender_name: &str,
        body: &str,
    ) -> Result<ChatMessage> {
        let body = body.trim();
        if body.is_empty() {
            return Err(NodeError::Chat("Message body is empty".into()));
        }

        self.store
            .get_alert(alert_id)
            .await?
            .ok_or_else(|| NodeError::Chat(format!("Unknown alert {alert_id}")))?;

        let message = ChatMessage {
            id: Uuid::new_v4(),
            alert_id,
            sender,
            sender_name: sender_name.to_string(),
            body: body.to_string(),
            created_at: Utc::now(),
        };

        self.store.append_chat_message(&message).await?;

        if let Err(e) = self
            .hub
            .publish(&chat_channel(alert_id), RealtimeEvent::Chat(message.clone()))
            .await
        {
            warn!(alert = %alert_id, error = %e, "Chat broadcast failed");
        }

        info!(alert = %alert_id, sender = %sender, "Chat message stored");
        Ok(message)
    }

    pub async fn history(&self, alert_id: AlertId) -> Result<Vec<ChatMessage>> {
        Ok(self.store.chat_history(alert_id).await?)
    }

    pub async fn subscribe(&self, alert_id: AlertId) -> broadcast::Receiver<RealtimeEvent> {
        self.hub.subscribe(&chat_channel(alert_id)).await
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::alert::types::{Alert, AlertCategory, GeoPoint};
    use tempfile::tempdir;

    async fn service_with_alert() -> (ChatService, AlertId, tempfile::TempDir) {
        let dir = tempdir().unwrap();
        let store = Arc::new(CommunityStore::open(dir.path()).unwrap());
        let hub = Arc::new(RealtimeHub::new(16));

        let alert = Alert::new(
            UserId::generate(),
            AlertCategory::Emergency,
            GeoPoint::new(0.0, 0.0),
        );
        store.put_alert(&alert).await.unwrap();

        (ChatService::new(store, hub), alert.id, dir)
    }

    #[tokio::test]
    async fn test_send_persists_and_broadcasts() {
        let (service, alert_id, _dir) = service_with_alert().await;
        let mut rx = service.subscribe(alert_id).await;

        let sender = UserId::generate();
        service
            .send(alert_id, sender, "sam", "anyone nearby?")
            .await
            .unwrap();

        let history = service.history(alert_id).await.unwrap();
        assert_eq!(history.len(), 1);
        assert_eq!(history[0].body, "anyone nearby?");

        match rx.recv().await.unwrap() {
            RealtimeEvent::Chat(message) => assert_eq!(message.sender, sender),
            other => panic!("unexpected event: {other:?}"),
        }
    }

    #[tokio::test]
    async fn test_whitespace_only_body_is_rejected() {
        let (service, alert_id, _dir) = service_with_alert().await;

        let result = service
            .send(alert_id, UserId::generate(), "sam", "   ")
            .await;
        assert!(matches!(result, Err(NodeError::Chat(_))));
        assert!(service.history(alert_id).await.unwrap().is_empty());
    }

    #[tokio::test]
    async fn test_unknown_alert_is_rejected() {
        let (service, _alert_id, _dir) = service_with_alert().await;

        let result = service
            .send(AlertId::generate(), UserId::generate(), "sam", "hello")
            .await;
        assert!(matches!(result, Err(NodeError::Chat(_))));
    }

    #[tokio::test]
    async fn test_body_is_trimmed() {
        let (service, alert_id, _dir) = service_with_alert().await;

        let message = service
            .send(alert_id, UserId::generate(), "sam", "  help on 5th ave  ")
            .await
            .unwrap();
        assert_eq!(message.body, "help on 5th ave");
    }
}
