use actix_web::{
    web::{self, Data, Json, Path},
    HttpResponse, Scope,
};
use serde::{Deserialize, Serialize};
use tracing::{error, info, warn};
use uuid::Uuid;

use super::chat;
use crate::{
    api::types::AlertResponse,
    core::{
        alert::{
            error::{SubmitError, SubmitWarning},
            types::{AlertCategory, AlertId, GeoPoint, UserId},
        },
        providers::{DeadlineLocation, ProvidedLocation},
        services::alert::AlertService,
    },
    utils::{config::Config, error::NodeError},
};

#[derive(Debug, Deserialize)]
pub struct TriggerAlertRequest {
    pub user_id: Uuid,
    pub category: AlertCategory,
    pub location: Option<GeoPoint>,
}

#[derive(Debug, Serialize)]
pub struct TriggerAlertResponse {
    pub alert_id: Uuid,
    pub notified: usize,
    pub warnings: Vec<SubmitWarning>,
}

#[derive(Debug, Serialize)]
pub struct AlertListResponse {
    pub alerts: Vec<AlertResponse>,
    pub stats: AlertStatsResponse,
}

#[derive(Debug, Serialize)]
pub struct AlertStatsResponse {
    pub active: usize,
    pub resolved: usize,
}

pub fn scope() -> Scope {
    web::scope("/alerts")
        .service(
            web::resource("")
                .route(web::post().to(trigger_alert))
                .route(web::get().to(list_alerts)),
        )
        .service(web::resource("/{id}").route(web::get().to(get_alert)))
        .service(web::resource("/{id}/resolve").route(web::post().to(resolve_alert)))
        .service(
            web::resource("/{id}/chat")
                .route(web::get().to(chat::chat_history))
                .route(web::post().to(chat::send_message)),
        )
}

async fn trigger_alert(
    service: Data<AlertService>,
    config: Data<Config>,
    request: Json<TriggerAlertRequest>,
) -> Result<HttpResponse, actix_web::Error> {
    info!(user = %request.user_id, category = ?request.category, "Received alert trigger");

    let provider = DeadlineLocation::new(
        ProvidedLocation::new(request.location),
        config.location_timeout(),
    );

    let outcome = service
        .submit_alert(UserId(request.user_id), request.category, &provider)
        .await
        .map_err(|e| match e {
            SubmitError::LocationUnavailable(_) => {
                warn!(user = %request.user_id, error = %e, "Alert rejected");
                actix_web::error::ErrorUnprocessableEntity(e)
            }
            SubmitError::Persistence(_) => {
                error!(user = %request.user_id, error = %e, "Alert submission failed");
                actix_web::error::ErrorInternalServerError(e)
            }
        })?;

    Ok(HttpResponse::Created().json(TriggerAlertResponse {
        alert_id: outcome.alert_id.0,
        notified: outcome.notified,
        warnings: outcome.warnings,
    }))
}

async fn list_alerts(service: Data<AlertService>) -> Result<HttpResponse, actix_web::Error> {
    let (alerts, stats) = service.list_alerts().await.map_err(|e| {
        error!("Failed to list alerts: {}", e);
        actix_web::error::ErrorInternalServerError(e)
    })?;

    Ok(HttpResponse::Ok().json(AlertListResponse {
        alerts: alerts.iter().map(AlertResponse::from).collect(),
        stats: AlertStatsResponse {
            active: stats.active,
            resolved: stats.resolved,
        },
    }))
}

async fn get_alert(
    service: Data<AlertService>,
    id: Path<Uuid>,
) -> Result<HttpResponse, actix_web::Error> {
    let alert = service
        .get_alert(AlertId(*id))
        .await
        .map_err(|e| {
            error!("Failed to retrieve alert {}: {}", id, e);
            actix_web::error::ErrorInternalServerError(e)
        })?
        .ok_or_else(|| {
            warn!("Alert {} not found", id);
            actix_web::error::ErrorNotFound(NodeError::Alert("Alert not found".into()))
        })?;

    Ok(HttpResponse::Ok().json(AlertResponse::from(&alert)))
}

async fn resolve_alert(
    service: Data<AlertService>,
    id: Path<Uuid>,
) -> Result<HttpResponse, actix_web::Error> {
    info!("Resolving alert: {}", id);

    let alert = service.resolve_alert(AlertId(*id)).await.map_err(|e| {
        error!("Failed to resolve alert {}: {}", id, e);
        match e {
            NodeError::Alert(_) => actix_web::error::ErrorNotFound(e),
            other => actix_web::error::ErrorInternalServerError(other),
        }
    })?;

    Ok(HttpResponse::Ok().json(AlertResponse::from(&alert)))
}
