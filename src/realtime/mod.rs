// src/realtime/mod.rs
//
// In-process stand-in for a hosted realtime channel service: named
// broadcast channels that services publish domain events onto and clients
// subscribe to by name.

pub mod dispatcher;
pub mod error;

use serde::{Deserialize, Serialize};
use std::collections::HashMap;
use std::sync::atomic::{AtomicBool, Ordering};
use tokio::sync::{broadcast, RwLock};
use tracing::debug;

use crate::core::alert::types::{AlertId, ChatMessage, GeoPoint, UserId};
use error::{RealtimeError, Result};

pub use dispatcher::HubDispatcher;

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(tag = "event", rename_all = "snake_case")]
pub enum RealtimeEvent {
    AlertRaised {
        alert_id: AlertId,
        location: GeoPoint,
    },
    AlertResolved {
        alert_id: AlertId,
    },
    ResponderNotification {
        alert_id: AlertId,
        location: GeoPoint,
    },
    Chat(ChatMessage),
}

/// Global alert feed channel.
pub const ALERTS_CHANNEL: &str = "alerts";

pub fn responder_channel(user: UserId) -> String {
    format!("responder:{user}")
}

pub fn chat_channel(alert: AlertId) -> String {
    format!("chat:{alert}")
}

pub struct RealtimeHub {
    channels: RwLock<HashMap<String, broadcast::Sender<RealtimeEvent>>>,
    capacity: usize,
    closed: AtomicBool,
}

impl RealtimeHub {
    pub fn new(capacity: usize) -> Self {
        Self {
            channels: RwLock::new(HashMap::new()),
            capacity,
            closed: AtomicBool::new(false),
        }
    }

    /// Subscribes to a channel, creating it on first use.
    pub async fn subscribe(&self, channel: &str) -> broadcast::Receiver<RealtimeEvent> {
        let mut channels = self.channels.write().await;
        channels
            .entry(channel.to_string())
            .or_insert_with(|| broadcast::channel(self.capacity).0)
            .subscribe()
    }

    /// Publishes an event, returning the number of subscribers it reached.
    /// A channel nobody listens on delivers to zero receivers; that is not
    /// an error.
    pub async fn publish(&self, channel: &str, event: RealtimeEvent) -> Result<usize> {
        if self.closed.load(Ordering::SeqCst) {
            return Err(RealtimeError::HubClosed);
        }

        let channels = self.channels.read().await;
        let delivered = match channels.get(channel) {
            Some(sender) => sender.send(event).unwrap_or(0),
            None => 0,
        };

        debug!(channel, delivered, "Published realtime event");
        Ok(delivered)
    }

    /// Stops accepting publishes and drops every channel, ending all
    /// subscriber streams.
    pub async fn close(&self) {
        self.closed.store(true, Ordering::SeqCst);
        self.channels.write().await.clear();
    }

    pub fn is_closed(&self) -> bool {
        self.closed.load(Ordering::SeqCst)
    }
}
