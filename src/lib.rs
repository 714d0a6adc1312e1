pub mod api;
pub mod core;
pub mod realtime;
pub mod storage;
pub mod utils;

use std::sync::Arc;
use tracing::info;

use crate::{
    core::{
        providers::NotificationDispatcher,
        services::{alert::AlertService, chat::ChatService},
    },
    realtime::{HubDispatcher, RealtimeHub},
    storage::CommunityStore,
    utils::{
        config::Config,
        error::{NodeError, Result},
        metrics::{Metrics, Monitor},
    },
};

pub struct Application {
    config: Arc<Config>,
    store: Arc<CommunityStore>,
    hub: Arc<RealtimeHub>,
    alert_service: Arc<AlertService>,
    chat_service: Arc<ChatService>,
    metrics: Arc<Metrics>,
}

impl Application {
    pub async fn new(config: Config) -> Result<Self> {
        let config = Arc::new(config);

        info!("Initializing storage...");
        let store = Arc::new(
            CommunityStore::open(&config.storage.path)
                .map_err(|e| NodeError::Storage(e.to_string()))?,
        );

        info!("Initializing realtime hub...");
        let hub = Arc::new(RealtimeHub::new(config.realtime.channel_capacity));
        let metrics = Arc::new(Metrics::new());

        info!("Initializing services...");
        let dispatcher: Arc<dyn NotificationDispatcher> = Arc::new(HubDispatcher::new(
            store.clone(),
            hub.clone(),
            config.realtime.dispatch_radius_m,
        ));
        let alert_service = Arc::new(AlertService::new(
            config.clone(),
            store.clone(),
            dispatcher,
            hub.clone(),
            metrics.clone(),
        ));
        let chat_service = Arc::new(ChatService::new(store.clone(), hub.clone()));

        Ok(Self {
            config,
            store,
            hub,
            alert_service,
            chat_service,
            metrics,
        })
    }

    pub async fn start(&self) -> Result<()> {
        info!("Starting metrics monitor...");
        Monitor::new(self.metrics.clone(), self.config.metrics_log_interval()).start();

        info!("Starting API server...");
        self.start_api_server()?;

        info!("Node successfully started");
        Ok(())
    }

    fn start_api_server(&self) -> Result<()> {
        use crate::api::handlers;
        use actix_cors::Cors;
        use actix_web::{web, App, HttpServer};

        let alert_service = self.alert_service.clone();
        let chat_service = self.chat_service.clone();
        let store = self.store.clone();
        let metrics = self.metrics.clone();
        let config = self.config.clone();

        let server = HttpServer::new(move || {
            App::new()
                .wrap(Cors::permissive())
                .app_data(web::Data::from(alert_service.clone()))
                .app_data(web::Data::from(chat_service.clone()))
                .app_data(web::Data::new(store.clone()))
                .app_data(web::Data::new(metrics.clone()))
                .app_data(web::Data::new(config.as_ref().clone()))
                .service(handlers::alerts::scope())
                .service(handlers::users::scope())
                .service(handlers::health::resource())
        })
        .bind((self.config.node.host.as_str(), self.config.node.port))
        .map_err(|e| NodeError::Init(format!("Failed to bind API server: {}", e)))?
        .run();

        tokio::spawn(server);
        Ok(())
    }

    pub async fn shutdown(&self) -> Result<()> {
        info!("Shutting down node...");

        info!("Closing realtime hub...");
        self.hub.close().await;

        info!("Closing storage...");
        self.store
            .close()
            .await
            .map_err(|e| NodeError::Storage(e.to_string()))?;

        info!("Node shutdown complete");
        Ok(())
    }
}
