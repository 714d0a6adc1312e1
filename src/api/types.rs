// src/api/types.rs
use chrono::{DateTime, Utc};
use serde::Serialize;
use uuid::Uuid;

use crate::core::alert::types::{Alert, AlertCategory, AlertStatus, ChatMessage, GeoPoint};

#[derive(Debug, Serialize)]
pub struct AlertResponse {
    pub id: Uuid,
    pub status: AlertStatus,
    pub category: AlertCategory,
    pub description: String,
    pub location: GeoPoint,
    pub created_at: DateTime<Utc>,
    pub notified: usize,
}

impl From<&Alert> for AlertResponse {
    fn from(alert: &Alert) -> Self {
        Self {
            id: alert.id.0,
            status: alert.status,
            category: alert.category,
            description: alert.description.clone(),
            location: alert.location,
            created_at: alert.created_at,
            notified: alert.notified_responders.len(),
        }
    }
}

#[derive(Debug, Serialize)]
pub struct ChatMessageResponse {
    pub id: Uuid,
    pub sender: Uuid,
    pub sender_name: String,
    pub body: String,
    pub created_at: DateTime<Utc>,
}

impl From<&ChatMessage> for ChatMessageResponse {
    fn from(message: &ChatMessage) -> Self {
        Self {
            id: message.id,
            sender: message.sender.0,
            sender_name: message.sender_name.clone(),
            body: message.body.clone(),
            created_at: message.created_at,
        }
    }
}
