// tests/common/mod.rs
use std::sync::Arc;
use tempfile::TempDir;

use beacon_node::{
    core::{
        alert::types::{GeoPoint, UserId, UserRecord},
        providers::NotificationDispatcher,
        services::{alert::AlertService, chat::ChatService},
    },
    realtime::{HubDispatcher, RealtimeHub},
    storage::CommunityStore,
    utils::{
        config::{
            AlertConfig, Config, LocationConfig, NodeConfig, RealtimeConfig, StorageConfig,
        },
        metrics::Metrics,
    },
};

pub struct TestContext {
    pub config: Arc<Config>,
    pub store: Arc<CommunityStore>,
    pub hub: Arc<RealtimeHub>,
    pub alert_service: AlertService,
    pub chat_service: ChatService,
    pub metrics: Arc<Metrics>,
    _data_dir: TempDir,
}

impl TestContext {
    pub fn new() -> Self {
        let data_dir = TempDir::new().expect("Failed to create temp dir");

        let config = Arc::new(Config {
            node: NodeConfig {
                id: "beacon-test".into(),
                host: "127.0.0.1".into(),
                port: 8080,
                log_level: "debug".into(),
                data_dir: data_dir.path().display().to_string(),
            },
            alert: AlertConfig {
                hold_threshold_ms: 2000,
                responder_radius_m: 5000.0,
            },
            location: LocationConfig {
                acquire_timeout_ms: 1000,
            },
            storage: StorageConfig {
                path: data_dir.path().join("store").display().to_string(),
            },
            realtime: RealtimeConfig {
                channel_capacity: 64,
                dispatch_radius_m: 2000.0,
                metrics_log_interval: 60,
            },
        });

        let store = Arc::new(
            CommunityStore::open(&config.storage.path).expect("Failed to open store"),
        );
        let hub = Arc::new(RealtimeHub::new(config.realtime.channel_capacity));
        let metrics = Arc::new(Metrics::new());

        let dispatcher: Arc<dyn NotificationDispatcher> = Arc::new(HubDispatcher::new(
            store.clone(),
            hub.clone(),
            config.realtime.dispatch_radius_m,
        ));

        let alert_service = AlertService::new(
            config.clone(),
            store.clone(),
            dispatcher,
            hub.clone(),
            metrics.clone(),
        );
        let chat_service = ChatService::new(store.clone(), hub.clone());

        Self {
            config,
            store,
            hub,
            alert_service,
            chat_service,
            metrics,
            _data_dir: data_dir,
        }
    }

    /// Registers an eligible responder roughly `offset_m` meters north of
    /// `center`.
    pub async fn register_responder(&self, center: GeoPoint, offset_m: f64) -> UserId {
        // One degree of latitude is close to 111.3 km everywhere.
        let offset_deg = offset_m / 111_320.0;
        let mut user = UserRecord::new(UserId::generate(), "responder");
        user.location = Some(GeoPoint::new(center.latitude + offset_deg, center.longitude));
        user.is_responder = true;
        user.verified = true;

        self.store
            .upsert_user(&user)
            .await
            .expect("Failed to store responder");
        user.id
    }
}
