use actix_web::{
    web::{self, Data},
    HttpResponse, Resource,
};
use serde::Serialize;
use std::sync::Arc;

use crate::utils::metrics::Metrics;

#[derive(Debug, Serialize)]
pub struct HealthResponse {
    pub status: &'static str,
    pub uptime_s: u64,
    pub alerts_triggered: u64,
}

pub fn resource() -> Resource {
    web::resource("/health").route(web::get().to(health))
}

async fn health(metrics: Data<Arc<Metrics>>) -> HttpResponse {
    HttpResponse::Ok().json(HealthResponse {
        status: "ok",
        uptime_s: metrics.uptime().as_secs(),
        alerts_triggered: metrics.alerts_triggered(),
    })
}
