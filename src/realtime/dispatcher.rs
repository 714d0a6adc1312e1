// src/realtime/dispatcher.rs
use async_trait::async_trait;
use std::sync::Arc;
use tracing::{info, warn};

use super::{responder_channel, RealtimeEvent, RealtimeHub, ALERTS_CHANNEL};
use crate::core::{
    alert::{
        error::DispatchError,
        types::{AlertId, GeoPoint},
    },
    providers::{DispatchReceipt, NotificationDispatcher},
};
use crate::storage::CommunityStore;

/// Notification fan-out over the realtime hub. Runs its own nearby query
/// against the store rather than trusting the caller's roster, skips the
/// alert creator, and treats per-target delivery failures as losses to
/// count, not reasons to abort.
pub struct HubDispatcher {
    store: Arc<CommunityStore>,
    hub: Arc<RealtimeHub>,
    radius_m: f64,
}

impl HubDispatcher {
    pub fn new(store: Arc<CommunityStore>, hub: Arc<RealtimeHub>, radius_m: f64) -> Self {
        Self {
            store,
            hub,
            radius_m,
        }
    }
}

#[async_trait]
impl NotificationDispatcher for HubDispatcher {
    async fn dispatch(
        &self,
        alert_id: AlertId,
        location: GeoPoint,
    ) -> Result<DispatchReceipt, DispatchError> {
        let alert = self
            .store
            .get_alert(alert_id)
            .await
            .map_err(|e| DispatchError::Unavailable(e.to_string()))?
            .ok_or_else(|| DispatchError::Rejected(format!("unknown alert {alert_id}")))?;

        let targets = self
            .store
            .find_responders(location, self.radius_m)
            .await
            .map_err(|e| DispatchError::Unavailable(e.to_string()))?;

        let mut receipt = DispatchReceipt::default();
        for target in targets {
            if target.id == alert.creator {
                receipt.skipped += 1;
                continue;
            }

            let event = RealtimeEvent::ResponderNotification { alert_id, location };
            match self.hub.publish(&responder_channel(target.id), event).await {
                Ok(_) => receipt.delivered += 1,
                Err(e) => {
                    warn!(responder = %target.id, error = %e, "Notification delivery failed");
                    receipt.skipped += 1;
                }
            }
        }

        self.hub
            .publish(
                ALERTS_CHANNEL,
                RealtimeEvent::AlertRaised { alert_id, location },
            )
            .await
            .map_err(|e| DispatchError::Unavailable(e.to_string()))?;

        info!(
            alert = %alert_id,
            delivered = receipt.delivered,
            skipped = receipt.skipped,
            "Alert notifications dispatched"
        );
        Ok(receipt)
    }
}
