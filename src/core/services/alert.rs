// src/core/services/alert.rs
use parking_lot::Mutex;
use std::sync::Arc;
use tokio::time::Instant;
use tracing::{debug, error, info, warn};

use crate::{
    core::{
        alert::{
            error::{SubmitError, SubmitWarning},
            types::{Alert, AlertCategory, AlertId, UserId},
        },
        providers::{AlertRepository, LocationProvider, NotificationDispatcher},
        trigger::HoldTrigger,
    },
    realtime::{RealtimeEvent, RealtimeHub, ALERTS_CHANNEL},
    storage::CommunityStore,
    utils::{
        config::Config,
        error::{NodeError, Result},
        metrics::Metrics,
    },
};

/// One submission attempt walks these stages in order. `Failed` is
/// reachable only from `AcquiringLocation` and `Persisting`; the two tail
/// stages always reach `Done`, carrying their failures as warnings.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SubmitStage {
    Idle,
    AcquiringLocation,
    Persisting,
    LocatingResponders,
    Dispatching,
    Done,
    Failed,
}

#[derive(Debug)]
pub struct SubmitOutcome {
    pub alert_id: AlertId,
    pub notified: usize,
    pub warnings: Vec<SubmitWarning>,
}

#[derive(Debug, Clone, Copy, Default)]
pub struct AlertStats {
    pub active: usize,
    pub resolved: usize,
}

/// The alert submission sequence over explicitly passed collaborators.
/// Hard-fail early (location, persistence), soft-fail late (lookup, roster,
/// dispatch).
pub struct SubmissionPipeline<'a> {
    location: &'a dyn LocationProvider,
    repository: &'a dyn AlertRepository,
    dispatcher: &'a dyn NotificationDispatcher,
    responder_radius_m: f64,
    stage: SubmitStage,
}

impl<'a> SubmissionPipeline<'a> {
    pub fn new(
        location: &'a dyn LocationProvider,
        repository: &'a dyn AlertRepository,
        dispatcher: &'a dyn NotificationDispatcher,
        responder_radius_m: f64,
    ) -> Self {
        Self {
            location,
            repository,
            dispatcher,
            responder_radius_m,
            stage: SubmitStage::Idle,
        }
    }

    pub fn stage(&self) -> SubmitStage {
        self.stage
    }

    fn advance(&mut self, next: SubmitStage) {
        debug!(from = ?self.stage, to = ?next, "Submission stage transition");
        self.stage = next;
    }

    pub async fn run(
        &mut self,
        creator: UserId,
        category: AlertCategory,
    ) -> std::result::Result<SubmitOutcome, SubmitError> {
        self.advance(SubmitStage::AcquiringLocation);
        let location = match self.location.current_position().await {
            Ok(position) => position,
            Err(e) => {
                self.advance(SubmitStage::Failed);
                return Err(SubmitError::LocationUnavailable(e));
            }
        };

        self.advance(SubmitStage::Persisting);
        let alert = Alert::new(creator, category, location);
        if let Err(e) = self.repository.insert_alert(&alert).await {
            self.advance(SubmitStage::Failed);
            return Err(SubmitError::Persistence(e.to_string()));
        }

        // The alert now exists; nothing past this point may roll it back.
        let mut warnings = Vec::new();
        let mut notified = 0;

        self.advance(SubmitStage::LocatingResponders);
        match self
            .repository
            .query_responders(location, self.responder_radius_m)
            .await
        {
            Ok(candidates) if candidates.is_empty() => {}
            Ok(candidates) => {
                let ids: Vec<UserId> = candidates.iter().map(|c| c.id).collect();
                notified = ids.len();
                if let Err(e) = self
                    .repository
                    .set_notified_responders(alert.id, &ids)
                    .await
                {
                    warnings.push(SubmitWarning::RosterUpdate(e.to_string()));
                }
            }
            Err(e) => warnings.push(SubmitWarning::ResponderLookup(e.to_string())),
        }

        self.advance(SubmitStage::Dispatching);
        match self.dispatcher.dispatch(alert.id, location).await {
            Ok(receipt) => {
                debug!(
                    alert = %alert.id,
                    delivered = receipt.delivered,
                    "Dispatch completed"
                )
            }
            Err(e) => warnings.push(SubmitWarning::Dispatch(e.to_string())),
        }

        self.advance(SubmitStage::Done);
        Ok(SubmitOutcome {
            alert_id: alert.id,
            notified,
            warnings,
        })
    }
}

pub struct AlertService {
    config: Arc<Config>,
    store: Arc<CommunityStore>,
    dispatcher: Arc<dyn NotificationDispatcher>,
    hub: Arc<RealtimeHub>,
    metrics: Arc<Metrics>,
    last_stage: Mutex<SubmitStage>,
}

impl AlertService {
    pub fn new(
        config: Arc<Config>,
        store: Arc<CommunityStore>,
        dispatcher: Arc<dyn NotificationDispatcher>,
        hub: Arc<RealtimeHub>,
        metrics: Arc<Metrics>,
    ) -> Self {
        Self {
            config,
            store,
            dispatcher,
            hub,
            metrics,
            last_stage: Mutex::new(SubmitStage::Idle),
        }
    }

    /// A press-and-hold trigger configured with this node's threshold, for
    /// embedding clients.
    pub fn hold_trigger(&self) -> HoldTrigger {
        HoldTrigger::new(self.config.alert.hold_threshold_ms)
    }

    pub async fn submit_alert(
        &self,
        creator: UserId,
        category: AlertCategory,
        location: &dyn LocationProvider,
    ) -> std::result::Result<SubmitOutcome, SubmitError> {
        let started = Instant::now();
        let mut pipeline = SubmissionPipeline::new(
            location,
            self.store.as_ref(),
            self.dispatcher.as_ref(),
            self.config.alert.responder_radius_m,
        );

        let result = pipeline.run(creator, category).await;
        *self.last_stage.lock() = pipeline.stage();
        self.metrics
            .record_submission(started.elapsed(), result.is_ok());

        match &result {
            Ok(outcome) => {
                info!(
                    alert = %outcome.alert_id,
                    notified = outcome.notified,
                    "Alert created"
                );
                for warning in &outcome.warnings {
                    warn!(alert = %outcome.alert_id, %warning, "Submission warning");
                    if matches!(warning, SubmitWarning::Dispatch(_)) {
                        self.metrics.record_dispatch_failure();
                    }
                }
            }
            Err(e) => error!(creator = %creator, error = %e, "Alert submission failed"),
        }

        result
    }

    pub async fn get_alert(&self, id: AlertId) -> Result<Option<Alert>> {
        Ok(self.store.get_alert(id).await?)
    }

    pub async fn list_alerts(&self) -> Result<(Vec<Alert>, AlertStats)> {
        let alerts = self.store.list_alerts().await?;
        let stats = alerts.iter().fold(AlertStats::default(), |mut stats, a| {
            if a.is_active() {
                stats.active += 1;
            } else {
                stats.resolved += 1;
            }
            stats
        });
        Ok((alerts, stats))
    }

    /// Marks an alert resolved. Idempotent on an already-resolved alert;
    /// unknown ids are an error.
    pub async fn resolve_alert(&self, id: AlertId) -> Result<Alert> {
        let alert = self.store.resolve_alert(id).await.map_err(|e| match e {
            crate::storage::errors::StorageError::NotFound(m) => NodeError::Alert(m),
            other => NodeError::Storage(other.to_string()),
        })?;

        if let Err(e) = self
            .hub
            .publish(ALERTS_CHANNEL, RealtimeEvent::AlertResolved { alert_id: id })
            .await
        {
            warn!(alert = %id, error = %e, "Failed to announce resolution");
        }

        info!(alert = %id, "Alert resolved");
        Ok(alert)
    }

    pub fn last_stage(&self) -> SubmitStage {
        *self.last_stage.lock()
    }
}
