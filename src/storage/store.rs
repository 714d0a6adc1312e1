// src/storage/store.rs
use async_trait::async_trait;
use rocksdb::{Direction, IteratorMode, Options, DB};
use serde::{de::DeserializeOwned, Serialize};
use std::path::Path;

use super::errors::{Result, StorageError};
use crate::core::{
    alert::types::{Alert, AlertId, ChatMessage, GeoPoint, ResponderCandidate, UserId, UserRecord},
    providers::AlertRepository,
};

const ALERT_PREFIX: &str = "alert:";
const USER_PREFIX: &str = "user:";
const CHAT_PREFIX: &str = "chat:";

/// Single rocksdb keyspace holding alerts, user profiles, and per-alert
/// chat history. Keys are string-prefixed by record kind; chat keys embed
/// a zero-padded creation timestamp so prefix iteration yields history in
/// order.
pub struct CommunityStore {
    db: DB,
}

impl CommunityStore {
    pub fn open<P: AsRef<Path>>(path: P) -> Result<Self> {
        let mut opts = Options::default();
        opts.create_if_missing(true);

        let db = DB::open(&opts, path).map_err(|e| StorageError::DatabaseError(e.to_string()))?;

        Ok(Self { db })
    }

    fn put<T: Serialize>(&self, key: &str, value: &T) -> Result<()> {
        let serialized =
            serde_json::to_vec(value).map_err(|e| StorageError::InvalidFormat(e.to_string()))?;

        self.db
            .put(key.as_bytes(), serialized)
            .map_err(|e| StorageError::DatabaseError(e.to_string()))?;

        Ok(())
    }

    fn get<T: DeserializeOwned>(&self, key: &str) -> Result<Option<T>> {
        let raw = match self
            .db
            .get(key.as_bytes())
            .map_err(|e| StorageError::DatabaseError(e.to_string()))?
        {
            Some(data) => data,
            None => return Ok(None),
        };

        let value =
            serde_json::from_slice(&raw).map_err(|e| StorageError::InvalidFormat(e.to_string()))?;

        Ok(Some(value))
    }

    fn scan_prefix<T: DeserializeOwned>(&self, prefix: &str) -> Result<Vec<T>> {
        let mut records = Vec::new();
        let iter = self.db.iterator(IteratorMode::From(
            prefix.as_bytes(),
            Direction::Forward,
        ));

        for item in iter {
            let (key, raw) = item.map_err(|e| StorageError::DatabaseError(e.to_string()))?;
            if !key.starts_with(prefix.as_bytes()) {
                break;
            }
            let value = serde_json::from_slice(&raw)
                .map_err(|e| StorageError::InvalidFormat(e.to_string()))?;
            records.push(value);
        }

        Ok(records)
    }

    fn alert_key(id: AlertId) -> String {
        format!("{ALERT_PREFIX}{id}")
    }

    fn user_key(id: UserId) -> String {
        format!("{USER_PREFIX}{id}")
    }

    fn chat_key(message: &ChatMessage) -> String {
        // Millisecond timestamp, zero-padded so lexicographic order matches
        // chronological order.
        format!(
            "{CHAT_PREFIX}{}:{:016}:{}",
            message.alert_id,
            message.created_at.timestamp_millis().max(0),
            message.id
        )
    }

    pub async fn put_alert(&self, alert: &Alert) -> Result<()> {
        self.put(&Self::alert_key(alert.id), alert)
    }

    pub async fn get_alert(&self, id: AlertId) -> Result<Option<Alert>> {
        self.get(&Self::alert_key(id))
    }

    /// All alerts, newest first.
    pub async fn list_alerts(&self) -> Result<Vec<Alert>> {
        let mut alerts: Vec<Alert> = self.scan_prefix(ALERT_PREFIX)?;
        alerts.sort_by(|a, b| b.created_at.cmp(&a.created_at));
        Ok(alerts)
    }

    pub async fn set_notified(&self, id: AlertId, responders: &[UserId]) -> Result<()> {
        let mut alert = self
            .get_alert(id)
            .await?
            .ok_or_else(|| StorageError::NotFound(format!("alert {id}")))?;

        alert.set_notified(responders.to_vec());
        self.put_alert(&alert).await
    }

    pub async fn resolve_alert(&self, id: AlertId) -> Result<Alert> {
        let mut alert = self
            .get_alert(id)
            .await?
            .ok_or_else(|| StorageError::NotFound(format!("alert {id}")))?;

        alert.resolve();
        self.put_alert(&alert).await?;
        Ok(alert)
    }

    pub async fn upsert_user(&self, user: &UserRecord) -> Result<()> {
        self.put(&Self::user_key(user.id), user)
    }

    pub async fn get_user(&self, id: UserId) -> Result<Option<UserRecord>> {
        self.get(&Self::user_key(id))
    }

    /// Eligible responders within `radius_m` of `center`: flagged as
    /// responder, verified, and with a known location. Identity is the key,
    /// so the result set carries no duplicates.
    pub async fn find_responders(
        &self,
        center: GeoPoint,
        radius_m: f64,
    ) -> Result<Vec<ResponderCandidate>> {
        let users: Vec<UserRecord> = self.scan_prefix(USER_PREFIX)?;

        let candidates = users
            .into_iter()
            .filter(|u| u.eligible_responder())
            .filter_map(|u| {
                let location = u.location?;
                location
                    .within_radius(&center, radius_m)
                    .then_some(ResponderCandidate {
                        id: u.id,
                        location,
                    })
            })
            .collect();

        Ok(candidates)
    }

    pub async fn append_chat_message(&self, message: &ChatMessage) -> Result<()> {
        self.put(&Self::chat_key(message), message)
    }

    /// Chat history for one alert, ascending by creation time (key order).
    pub async fn chat_history(&self, alert_id: AlertId) -> Result<Vec<ChatMessage>> {
        self.scan_prefix(&format!("{CHAT_PREFIX}{alert_id}:"))
    }

    pub async fn close(&self) -> Result<()> {
        self.db
            .flush()
            .map_err(|e| StorageError::DatabaseError(e.to_string()))?;
        Ok(())
    }
}

#[async_trait]
impl AlertRepository for CommunityStore {
    async fn insert_alert(&self, alert: &Alert) -> Result<()> {
        self.put_alert(alert).await
    }

    async fn set_notified_responders(
        &self,
        alert_id: AlertId,
        responders: &[UserId],
    ) -> Result<()> {
        self.set_notified(alert_id, responders).await
    }

    async fn query_responders(
        &self,
        center: GeoPoint,
        radius_m: f64,
    ) -> Result<Vec<ResponderCandidate>> {
        self.find_responders(center, radius_m).await
    }
}
