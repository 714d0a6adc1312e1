// src/core/providers/mod.rs
//
// Capability objects the submission pipeline is handed explicitly, instead
// of reaching for a process-global client. Each has a production
// implementation (request-scoped location, rocksdb store, realtime hub
// dispatcher) and a mock for pipeline tests.

use async_trait::async_trait;
use std::time::Duration;

#[cfg(test)]
use mockall::automock;

use crate::core::alert::{
    error::{DispatchError, LocationError},
    types::{Alert, AlertId, GeoPoint, ResponderCandidate, UserId},
};
use crate::storage::errors::StorageError;

/// Best-effort source of the current coordinate.
#[cfg_attr(test, automock)]
#[async_trait]
pub trait LocationProvider: Send + Sync {
    async fn current_position(&self) -> Result<GeoPoint, LocationError>;
}

/// Persistence collaborator for the alert flow: one insert, one roster
/// update, one spatial read. The repository owns the geometry of the
/// radius query; the pipeline only consumes the result set.
#[cfg_attr(test, automock)]
#[async_trait]
pub trait AlertRepository: Send + Sync {
    async fn insert_alert(&self, alert: &Alert) -> Result<(), StorageError>;

    async fn set_notified_responders(
        &self,
        alert_id: AlertId,
        responders: &[UserId],
    ) -> Result<(), StorageError>;

    async fn query_responders(
        &self,
        center: GeoPoint,
        radius_m: f64,
    ) -> Result<Vec<ResponderCandidate>, StorageError>;
}

#[derive(Debug, Clone, Copy, Default)]
pub struct DispatchReceipt {
    pub delivered: usize,
    pub skipped: usize,
}

/// Remote invocation that fans notifications out to responders. Fan-out
/// targeting is entirely the dispatcher's responsibility.
#[cfg_attr(test, automock)]
#[async_trait]
pub trait NotificationDispatcher: Send + Sync {
    async fn dispatch(
        &self,
        alert_id: AlertId,
        location: GeoPoint,
    ) -> Result<DispatchReceipt, DispatchError>;
}

/// Coordinate carried on the triggering request itself. A request without
/// one behaves like a denied permission: the pipeline must not proceed.
pub struct ProvidedLocation {
    position: Option<GeoPoint>,
}

impl ProvidedLocation {
    pub fn new(position: Option<GeoPoint>) -> Self {
        Self { position }
    }
}

#[async_trait]
impl LocationProvider for ProvidedLocation {
    async fn current_position(&self) -> Result<GeoPoint, LocationError> {
        self.position.ok_or(LocationError::PermissionDenied)
    }
}

/// Applies an acquisition deadline to an inner provider. The pipeline
/// itself imposes no timeouts; the deadline lives here, with the
/// collaborator.
pub struct DeadlineLocation<P> {
    inner: P,
    timeout: Duration,
}

impl<P> DeadlineLocation<P> {
    pub fn new(inner: P, timeout: Duration) -> Self {
        Self { inner, timeout }
    }
}

#[async_trait]
impl<P: LocationProvider> LocationProvider for DeadlineLocation<P> {
    async fn current_position(&self) -> Result<GeoPoint, LocationError> {
        match tokio::time::timeout(self.timeout, self.inner.current_position()).await {
            Ok(result) => result,
            Err(_) => Err(LocationError::Timeout),
        }
    }
}
